//! Configuration, session selection, tick dispatch and population control
//! for the Colony controller.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `colony-config.yaml` into
//!   strongly-typed structs.
//! - [`dispatcher`] -- [`Dispatcher`], the per-tick entrypoint.
//! - [`population`] -- Spawn planning and body tables.
//! - [`session`] -- [`select_world`], the one-time Live/Replay choice.
//! - [`error`] -- Error types for the above.
//!
//! [`Dispatcher`]: dispatcher::Dispatcher
//! [`select_world`]: session::select_world

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod population;
pub mod session;

pub use config::{ColonyConfig, DispatcherConfig, LogFormat, LoggingConfig, ReplayConfig};
pub use dispatcher::{Dispatcher, TickSummary};
pub use error::{ConfigError, DispatchError, SessionError};
pub use population::{PopulationConfig, PopulationManager, SpawnDecision, SpawnRequest};
pub use session::select_world;
