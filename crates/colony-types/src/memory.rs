//! The persisted memory blob: the only state that survives between ticks.
//!
//! The host owns the blob and hands it over as raw JSON. Every field the
//! controller does not model is kept in a flattened `extra` map so a
//! load/store cycle never drops data written by somebody else.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{CreepState, Role};
use crate::ids::EntityId;

/// Key the host's movement resolver uses for its cached path.
pub const PATH_CACHE_KEY: &str = "_move";

/// Per-creep memory, keyed by creep name under `Memory.creeps`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreepMemory {
    /// Behavioral role; assigned once at spawn time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub role: Option<Role>,
    /// FSM state. Values this build does not know read as absent.
    #[serde(
        default,
        deserialize_with = "lenient_state",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(optional)]
    pub state: Option<CreepState>,
    /// The one object the creep is currently working toward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub target: Option<EntityId>,
    /// Harvester and carrier mode: carrying energy home.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub delivering: Option<bool>,
    /// Builder mode: spending energy on sites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub working: Option<bool>,
    /// Harvester's preferred source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub assigned_source: Option<EntityId>,
    /// Set when the creep should top up its lifetime at a spawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub needs_renew: Option<bool>,
    /// Host-side fields this build does not model, preserved verbatim.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CreepMemory {
    /// Fresh memory for a newly spawned creep: `{role, state: idle}`.
    pub fn spawned(role: Role) -> Self {
        Self {
            role: Some(role),
            state: Some(CreepState::Idle),
            ..Self::default()
        }
    }

    /// Current state, defaulting to idle.
    pub fn state(&self) -> CreepState {
        self.state.unwrap_or_default()
    }

    /// Drop the host's cached movement path.
    pub fn clear_path_cache(&mut self) {
        self.extra.remove(PATH_CACHE_KEY);
    }
}

/// Reads a `state` value, mapping anything unrecognized to `None`.
fn lenient_state<'de, D>(deserializer: D) -> Result<Option<CreepState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Root memory object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Per-creep memory by creep name.
    #[serde(default)]
    pub creeps: BTreeMap<String, CreepMemory>,
    /// Every other top-level key, preserved verbatim.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Memory {
    /// Parse the host's raw memory string. An empty string is empty memory.
    pub fn from_raw(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    /// Serialize to the host's raw memory string.
    pub fn to_raw(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
