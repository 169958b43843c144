//! Error types for configuration, session setup and tick dispatch.

use std::path::PathBuf;

use colony_world::WorldError;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Errors that stop a session from starting.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Replay was requested but the snapshot could not be used, and no host
    /// was available to fall back to.
    #[error("replay snapshot {path} unusable and no live host to fall back to: {source}")]
    Snapshot {
        /// Snapshot the session tried to load.
        path: PathBuf,
        /// Why it could not be loaded.
        source: WorldError,
    },

    /// Live mode was requested without a host binding.
    #[error("live mode requested without a host")]
    NoHost,
}

/// Errors that abort a whole tick.
///
/// Per-creep failures never surface here; the dispatcher logs and skips
/// them.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The memory blob could not be read.
    #[error("failed to load memory: {source}")]
    LoadMemory {
        /// The underlying world error.
        source: WorldError,
    },

    /// The memory blob could not be written back.
    #[error("failed to store memory: {source}")]
    StoreMemory {
        /// The underlying world error.
        source: WorldError,
    },
}
