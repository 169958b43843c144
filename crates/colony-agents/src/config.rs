//! Tunable thresholds for the creep state machine and role strategies.
//!
//! These values correspond to the `fsm` and `roles` keys of
//! `colony-config.yaml`. The [`AgentConfig`] struct bundles both so callers
//! (dispatcher, tests) can override defaults without touching role code.

use serde::{Deserialize, Serialize};

/// Lifetime thresholds and the re-dispatch budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Below this many ticks to live a creep gives up and enters dying
    /// (default: 50).
    pub low_lifetime_threshold: u32,

    /// Below this many ticks to live a creep flagged `needsRenew` heads for
    /// a spawn (default: 1400).
    pub renew_threshold: u32,

    /// Renewal stops once ticks to live reaches this value (default: 1400).
    pub renew_complete_threshold: u32,

    /// Maximum handler invocations per creep per tick (default: 4).
    ///
    /// Idle, moving and working can chain within one tick. The budget stops
    /// a backend that disagrees with itself (adjacent by position, out of
    /// range by outcome) from bouncing forever.
    pub max_hops: u32,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            low_lifetime_threshold: 50,
            renew_threshold: 1400,
            renew_complete_threshold: 1400,
            max_hops: 4,
        }
    }
}

/// Target-selection thresholds used by the role strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    /// Carriers only top up towers with more free space than this
    /// (default: 200).
    pub tower_reserve: u32,

    /// Carriers ignore dropped energy piles at or below this size
    /// (default: 50).
    pub dropped_energy_min: u32,

    /// Carriers ignore containers holding this much energy or less
    /// (default: 100).
    pub container_energy_min: u32,

    /// Builders ignore containers and storage holding this much energy or
    /// less (default: 50).
    pub builder_source_min: u32,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            tower_reserve: 200,
            dropped_energy_min: 50,
            container_energy_min: 100,
            builder_source_min: 50,
        }
    }
}

/// Everything an [`Agent`](crate::agent::Agent) needs to decide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// State machine thresholds.
    pub fsm: FsmConfig,
    /// Role target-selection thresholds.
    pub roles: RoleConfig,
}
