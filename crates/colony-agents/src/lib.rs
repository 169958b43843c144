//! Per-creep finite state machine and role strategies for the Colony
//! controller.
//!
//! This crate holds the decision logic. It reads and writes one creep's
//! memory entry and talks to the world only through
//! [`WorldState`](colony_world::WorldState), so the same code runs against
//! the live host and against a replayed snapshot.
//!
//! # Modules
//!
//! - [`agent`] -- The state machine ([`Agent`]): guards, shared handlers,
//!   outcome policy.
//! - [`roles`] -- Role strategy table and the four roles.
//! - [`config`] -- Thresholds ([`AgentConfig`]).
//! - [`error`] -- Error types ([`AgentError`]).

pub mod agent;
pub mod config;
pub mod error;
pub mod roles;

pub use agent::Agent;
pub use config::{AgentConfig, FsmConfig, RoleConfig};
pub use error::AgentError;
pub use roles::{RoleStrategy, strategy_for};
