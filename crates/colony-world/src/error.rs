//! Error types for the `colony-world` crate.
//!
//! Lookups never fail with an error: an unknown id is `None` and an
//! unsupported query is an empty result. Only the memory boundary and
//! snapshot loading return [`WorldError`].

/// Errors raised while moving data across the world boundary.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The host's memory blob is not valid JSON, or could not be written.
    #[error("memory blob is malformed: {0}")]
    Memory(#[from] serde_json::Error),

    /// The snapshot file could not be read.
    #[error("cannot read snapshot {path}: {source}")]
    SnapshotRead {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file was read but does not parse.
    #[error("snapshot {path} is malformed: {source}")]
    SnapshotFormat {
        /// Path of the offending file, or `<inline>`.
        path: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}
