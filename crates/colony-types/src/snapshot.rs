//! Captured game-state snapshot used by the replay backend.
//!
//! The host-side script prints one line per capture:
//! `DEBUG_STATE_JSON: {"tick": ..., "memory": ..., "game": ...}`. The
//! records below mirror that JSON. Every section except `tick` is optional
//! and defaults to empty, so partial captures still load.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{BodyPart, ResourceKind, StructureType};
use crate::ids::{EntityId, RoomName};
use crate::memory::Memory;
use crate::structs::{Owner, Position, Store};

/// Prefix of a captured console line.
pub const CAPTURE_PREFIX: &str = "DEBUG_STATE_JSON: ";

/// A frozen capture of the game at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Game tick of the capture.
    pub tick: u64,
    /// Wall-clock capture time, when recorded.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// The memory blob at capture time.
    #[serde(default)]
    pub memory: Memory,
    /// The observed game objects.
    #[serde(default)]
    pub game: GameSnapshot,
}

impl Snapshot {
    /// Parse raw JSON or a captured console line carrying [`CAPTURE_PREFIX`].
    pub fn parse(input: &str) -> Result<Self, serde_json::Error> {
        let body = input
            .find(CAPTURE_PREFIX)
            .and_then(|at| input.get(at.saturating_add(CAPTURE_PREFIX.len())..))
            .unwrap_or(input);
        serde_json::from_str(body.trim())
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// The `game` section of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// `Game.time`, when captured separately from `tick`.
    #[serde(default)]
    pub time: Option<u64>,
    /// Own creeps by name.
    #[serde(default)]
    pub creeps: BTreeMap<String, CreepRecord>,
    /// Own structures by id.
    #[serde(default)]
    pub structures: BTreeMap<String, StructureRecord>,
    /// Own spawns by name.
    #[serde(default)]
    pub spawns: BTreeMap<String, SpawnRecord>,
    /// Visible rooms by name.
    #[serde(default)]
    pub rooms: BTreeMap<String, RoomRecord>,
}

/// A body part as captured: either a bare type or `{type, hits}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyEntry {
    /// `"work"`.
    Bare(BodyPart),
    /// `{"type": "work", "hits": 100}`.
    Detailed {
        /// Part type.
        #[serde(rename = "type")]
        part: BodyPart,
        /// Remaining part hit points.
        #[serde(default)]
        hits: Option<u32>,
    },
}

impl BodyEntry {
    /// The part type.
    pub const fn part(self) -> BodyPart {
        match self {
            Self::Bare(part) | Self::Detailed { part, .. } => part,
        }
    }
}

/// A creep as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreepRecord {
    /// Object id.
    pub id: EntityId,
    /// Creep name; the map key is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Position.
    pub pos: Position,
    /// Carried resources.
    #[serde(default)]
    pub store: Store,
    /// Body parts.
    #[serde(default)]
    pub body: Vec<BodyEntry>,
    /// Remaining lifetime.
    #[serde(default)]
    pub ticks_to_live: Option<u32>,
    /// Hit points.
    #[serde(default)]
    pub hits: Option<u32>,
    /// Maximum hit points.
    #[serde(default)]
    pub hits_max: Option<u32>,
    /// Whether the creep is still spawning.
    #[serde(default)]
    pub spawning: bool,
    /// Ownership flag; own creeps default to true.
    #[serde(default)]
    pub my: Option<bool>,
    /// Owner, when captured.
    #[serde(default)]
    pub owner: Option<Owner>,
}

/// A structure as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRecord {
    /// Object id.
    pub id: EntityId,
    /// Structure type.
    pub structure_type: StructureType,
    /// Position.
    pub pos: Position,
    /// Store, for structures that have one.
    #[serde(default)]
    pub store: Option<Store>,
    /// Hit points.
    #[serde(default)]
    pub hits: Option<u32>,
    /// Maximum hit points.
    #[serde(default)]
    pub hits_max: Option<u32>,
    /// Ownership flag.
    #[serde(default)]
    pub my: Option<bool>,
}

/// A spawn as captured under `game.spawns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnRecord {
    /// Object id.
    pub id: EntityId,
    /// Spawn name; the map key is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Position.
    pub pos: Position,
    /// Energy store.
    #[serde(default)]
    pub store: Option<Store>,
    /// Whether a creep is being produced. Captures write either a flag or
    /// the host's spawning object.
    #[serde(default, deserialize_with = "truthy")]
    pub spawning: bool,
    /// Hit points.
    #[serde(default)]
    pub hits: Option<u32>,
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(flag)) => flag,
        Some(_) => true,
    })
}

/// A source as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    /// Object id.
    pub id: EntityId,
    /// Position.
    pub pos: Position,
    /// Energy left.
    #[serde(default)]
    pub energy: u32,
    /// Energy after regeneration.
    #[serde(default)]
    pub energy_capacity: u32,
}

/// A construction site as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    /// Object id.
    pub id: EntityId,
    /// Position.
    pub pos: Position,
    /// Structure the site will become.
    #[serde(default = "default_site_type")]
    pub structure_type: StructureType,
    /// Progress so far.
    #[serde(default)]
    pub progress: u32,
    /// Progress needed.
    #[serde(default)]
    pub progress_total: u32,
}

const fn default_site_type() -> StructureType {
    StructureType::Other
}

/// A dropped resource as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRecord {
    /// Object id.
    pub id: EntityId,
    /// Position.
    pub pos: Position,
    /// Resource lying there.
    #[serde(default = "default_resource")]
    pub resource_type: ResourceKind,
    /// Amount.
    #[serde(default)]
    pub amount: u32,
}

const fn default_resource() -> ResourceKind {
    ResourceKind::Energy
}

/// A room controller as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerRecord {
    /// Object id.
    pub id: EntityId,
    /// Position.
    pub pos: Position,
    /// Controller level.
    #[serde(default)]
    pub level: u32,
    /// Whether this player owns it.
    #[serde(default)]
    pub my: bool,
}

/// A room storage as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    /// Object id.
    pub id: EntityId,
    /// Position.
    pub pos: Position,
    /// Store contents.
    #[serde(default)]
    pub store: Option<Store>,
}

/// A room as captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    /// Room name, when captured; the map key is used otherwise.
    #[serde(default)]
    pub name: Option<RoomName>,
    /// Energy in spawns and extensions.
    #[serde(default)]
    pub energy_available: Option<u32>,
    /// Spawn and extension capacity.
    #[serde(default)]
    pub energy_capacity_available: Option<u32>,
    /// Sources.
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
    /// Construction sites.
    #[serde(default)]
    pub construction_sites: Vec<SiteRecord>,
    /// Hostile creeps.
    #[serde(default)]
    pub hostile_creeps: Vec<CreepRecord>,
    /// Resources on the floor.
    #[serde(default)]
    pub dropped_resources: Vec<DroppedRecord>,
    /// Unowned structures (containers, roads) seen in the room.
    #[serde(default)]
    pub structures: Vec<StructureRecord>,
    /// Controller.
    #[serde(default)]
    pub controller: Option<ControllerRecord>,
    /// Storage.
    #[serde(default)]
    pub storage: Option<StorageRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_console_capture_line() {
        let line = r#"[12:00:01] DEBUG_STATE_JSON: {"tick": 1234, "memory": {"creeps": {}}, "game": {}}"#;
        let snapshot = Snapshot::parse(line).ok();
        assert_eq!(snapshot.map(|s| s.tick), Some(1234));
    }

    #[test]
    fn parses_bare_json_with_missing_sections() {
        let snapshot = Snapshot::parse(r#"{"tick": 5}"#).ok();
        let snapshot = snapshot.unwrap_or_else(|| Snapshot {
            tick: 0,
            timestamp: None,
            memory: Memory::default(),
            game: GameSnapshot::default(),
        });
        assert_eq!(snapshot.tick, 5);
        assert!(snapshot.game.creeps.is_empty());
        assert!(snapshot.memory.creeps.is_empty());
    }

    #[test]
    fn body_accepts_both_shapes() {
        let body: Vec<BodyEntry> =
            serde_json::from_str(r#"["work", {"type": "carry", "hits": 100}]"#).unwrap_or_default();
        let parts: Vec<BodyPart> = body.into_iter().map(BodyEntry::part).collect();
        assert_eq!(parts, vec![BodyPart::Work, BodyPart::Carry]);
    }

    #[test]
    fn spawning_object_counts_as_busy() {
        let spawn: Result<SpawnRecord, _> = serde_json::from_str(
            r#"{"id": "sp", "pos": {"x": 1, "y": 1, "roomName": "W1N1"}, "spawning": {"name": "x", "remainingTime": 3}}"#,
        );
        assert_eq!(spawn.ok().map(|s| s.spawning), Some(true));
    }

    #[test]
    fn unparseable_timestamp_is_dropped() {
        let snapshot = Snapshot::parse(r#"{"tick": 1, "timestamp": 1700000000}"#).ok();
        assert_eq!(snapshot.and_then(|s| s.timestamp), None);
    }
}
