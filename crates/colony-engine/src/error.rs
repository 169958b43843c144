//! Error types for the replay debugger binary.

/// Top-level error for the replay debugger.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: colony_core::ConfigError,
    },

    /// The session could not start.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: colony_core::SessionError,
    },

    /// A tick was aborted.
    #[error("dispatch error: {source}")]
    Dispatch {
        /// The underlying dispatch error.
        #[from]
        source: colony_core::DispatchError,
    },

    /// Memory could not be read back for the final report.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: colony_world::WorldError,
    },

    /// The action journal could not be serialized.
    #[error("journal error: {source}")]
    Journal {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
