//! Error types for the colony-agents crate.
//!
//! Target resolution failures and action outcomes are never errors; the
//! state machine absorbs them. An [`AgentError`] means the creep cannot be
//! driven at all this tick, and the dispatcher logs it and moves on.

use colony_types::EntityId;

/// Reasons a creep cannot be stepped.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The creep's memory carries no role.
    #[error("creep {creep} has no role in memory")]
    MissingRole {
        /// Creep name.
        creep: String,
    },

    /// The creep's memory names a role this build does not drive.
    #[error("creep {creep} has an unrecognized role")]
    UnrecognizedRole {
        /// Creep name.
        creep: String,
    },

    /// The entity handed to the agent is not a creep.
    #[error("object {0} is not a creep")]
    NotACreep(EntityId),
}
