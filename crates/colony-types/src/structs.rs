//! Core entity structs: positions, stores, and the polymorphic game object.
//!
//! An [`Entity`] is rebuilt from host data every tick and never cached by the
//! controller. Anything that must survive between ticks lives in
//! [`CreepMemory`](crate::memory::CreepMemory) instead.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BodyPart, ResourceKind, StructureType};
use crate::ids::{EntityId, RoomName};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A tile inside a room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column, 0..=49.
    pub x: u32,
    /// Row, 0..=49.
    pub y: u32,
    /// Room the tile belongs to.
    pub room_name: RoomName,
}

impl Position {
    /// Build a position.
    pub fn new(x: u32, y: u32, room_name: impl Into<RoomName>) -> Self {
        Self {
            x,
            y,
            room_name: room_name.into(),
        }
    }

    /// Chebyshev distance to `other`, or `None` when the rooms differ.
    pub fn range_to(&self, other: &Self) -> Option<u32> {
        if self.room_name != other.room_name {
            return None;
        }
        Some(self.x.abs_diff(other.x).max(self.y.abs_diff(other.y)))
    }

    /// Whether `other` is on this tile or one of the eight around it.
    pub fn is_near_to(&self, other: &Self) -> bool {
        self.range_to(other).is_some_and(|range| range <= 1)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[room {} pos {},{}]", self.room_name, self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Resources held by a creep or structure.
///
/// Amounts are keyed by the host's resource key so unknown compounds survive
/// a round-trip. Capacity is optional because captured snapshots usually
/// omit it; see `colony_world::capacity` for the fallback rules.
///
/// On the wire a store is a flat object: `{"energy": 50, "capacity": 100}`.
/// The keys `capacity`, `energyCapacity` and `freeCapacity` are read as
/// metadata, every other numeric key as an amount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    amounts: BTreeMap<String, u32>,
    capacity: Option<u32>,
    free_hint: Option<u32>,
}

impl Store {
    /// An empty store with unknown capacity.
    pub const fn new() -> Self {
        Self {
            amounts: BTreeMap::new(),
            capacity: None,
            free_hint: None,
        }
    }

    /// An empty store with a known total capacity.
    pub const fn with_capacity(capacity: u32) -> Self {
        Self {
            amounts: BTreeMap::new(),
            capacity: Some(capacity),
            free_hint: None,
        }
    }

    /// Builder: set the amount held of `kind`.
    #[must_use]
    pub fn holding(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.set_amount(kind, amount);
        self
    }

    /// Set the amount held of `kind`; zero removes the entry.
    pub fn set_amount(&mut self, kind: ResourceKind, amount: u32) {
        if amount == 0 {
            self.amounts.remove(kind.as_str());
        } else {
            self.amounts.insert(String::from(kind.as_str()), amount);
        }
    }

    /// Amount held of `kind`.
    pub fn used(&self, kind: ResourceKind) -> u32 {
        self.amounts.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// Total amount held across all resources, saturating at `u32::MAX`.
    pub fn total_used(&self) -> u32 {
        self.amounts
            .values()
            .fold(0_u32, |total, amount| total.saturating_add(*amount))
    }

    /// Total capacity, if known.
    pub const fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Record the total capacity.
    pub const fn set_capacity(&mut self, capacity: u32) {
        self.capacity = Some(capacity);
    }

    /// The `freeCapacity` value carried in the raw data, if any.
    pub const fn free_hint(&self) -> Option<u32> {
        self.free_hint
    }

    /// Room left for `kind`. Unknown capacity counts as no room.
    pub fn free(&self, _kind: ResourceKind) -> u32 {
        self.capacity
            .map_or(0, |capacity| capacity.saturating_sub(self.total_used()))
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.total_used() == 0
    }

    /// Iterate over `(resource key, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.amounts.iter().map(|(key, amount)| (key.as_str(), *amount))
    }
}

impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.capacity.is_some());
        let mut map = serializer.serialize_map(Some(self.amounts.len().saturating_add(extra)))?;
        for (key, amount) in &self.amounts {
            map.serialize_entry(key, amount)?;
        }
        if let Some(capacity) = self.capacity {
            map.serialize_entry("capacity", &capacity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut store = Self::new();
        for (key, value) in raw {
            let Some(amount) = value.as_u64().and_then(|v| u32::try_from(v).ok()) else {
                continue;
            };
            match key.as_str() {
                "capacity" | "energyCapacity" => store.capacity = Some(amount),
                "freeCapacity" => store.free_hint = Some(amount),
                _ if amount > 0 => {
                    store.amounts.insert(key, amount);
                }
                _ => {}
            }
        }
        Ok(store)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Owner of a creep or structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Owner {
    /// Player name.
    pub username: String,
}

/// A creep, own or hostile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreepData {
    /// Unique creep name, the key of its memory entry.
    pub name: String,
    /// Whether this player owns the creep.
    pub my: bool,
    /// Owning player, when known.
    pub owner: Option<Owner>,
    /// Ticks left before the host removes the creep; absent while spawning.
    pub ticks_to_live: Option<u32>,
    /// Current hit points, when known.
    pub hits: Option<u32>,
    /// Maximum hit points, when known.
    pub hits_max: Option<u32>,
    /// Body parts in spawn order.
    pub body: Vec<BodyPart>,
    /// Carried resources.
    pub store: Store,
    /// Whether the creep is still being spawned.
    pub spawning: bool,
}

/// An energy source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
    /// Energy left until the next regeneration.
    pub energy: u32,
    /// Energy after regeneration.
    pub energy_capacity: u32,
}

/// A built structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureData {
    /// Structure type.
    pub structure_type: StructureType,
    /// Whether this player owns it (`None` for unownable structures).
    pub my: Option<bool>,
    /// Spawn name, for spawns.
    pub name: Option<String>,
    /// Current hit points, when known.
    pub hits: Option<u32>,
    /// Maximum hit points, when known.
    pub hits_max: Option<u32>,
    /// Resource store, for structures that have one.
    pub store: Option<Store>,
    /// Whether a spawn is busy producing a creep.
    pub spawning: bool,
}

/// A construction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    /// Structure the site will become.
    pub structure_type: StructureType,
    /// Build progress so far.
    pub progress: u32,
    /// Progress needed to finish.
    pub progress_total: u32,
}

/// A resource pile on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedResource {
    /// What is lying there.
    pub resource_type: ResourceKind,
    /// How much.
    pub amount: u32,
}

/// A room controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerData {
    /// Controller level, 0 when unowned.
    pub level: u32,
    /// Whether this player owns it.
    pub my: bool,
}

/// What kind of game object an [`Entity`] is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntityKind {
    /// A creep.
    Creep(CreepData),
    /// An energy source.
    Source(SourceData),
    /// A structure.
    Structure(StructureData),
    /// A construction site.
    ConstructionSite(SiteData),
    /// A dropped resource.
    Resource(DroppedResource),
    /// A room controller.
    Controller(ControllerData),
}

/// A game object as observed this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Host identifier.
    pub id: EntityId,
    /// Where it stands.
    pub pos: Position,
    /// What it is.
    pub kind: EntityKind,
}

impl Entity {
    /// The creep payload, if this is a creep.
    pub const fn as_creep(&self) -> Option<&CreepData> {
        match &self.kind {
            EntityKind::Creep(creep) => Some(creep),
            _ => None,
        }
    }

    /// The structure payload, if this is a structure.
    pub const fn as_structure(&self) -> Option<&StructureData> {
        match &self.kind {
            EntityKind::Structure(structure) => Some(structure),
            _ => None,
        }
    }

    /// The store of a creep or structure.
    pub const fn store(&self) -> Option<&Store> {
        match &self.kind {
            EntityKind::Creep(creep) => Some(&creep.store),
            EntityKind::Structure(structure) => structure.store.as_ref(),
            _ => None,
        }
    }

    /// Mutable store of a creep or structure.
    pub const fn store_mut(&mut self) -> Option<&mut Store> {
        match &mut self.kind {
            EntityKind::Creep(creep) => Some(&mut creep.store),
            EntityKind::Structure(structure) => structure.store.as_mut(),
            _ => None,
        }
    }

    /// Structure type of a structure or construction site.
    pub const fn structure_type(&self) -> Option<StructureType> {
        match &self.kind {
            EntityKind::Structure(structure) => Some(structure.structure_type),
            EntityKind::ConstructionSite(site) => Some(site.structure_type),
            EntityKind::Controller(_) => Some(StructureType::Controller),
            _ => None,
        }
    }

    /// Whether this is a built structure of one of `types`.
    pub fn is_structure_of(&self, types: &[StructureType]) -> bool {
        self.as_structure()
            .is_some_and(|structure| types.contains(&structure.structure_type))
    }

    /// Whether this is an energy source.
    pub const fn is_source(&self) -> bool {
        matches!(self.kind, EntityKind::Source(_))
    }

    /// Whether this is a construction site.
    pub const fn is_construction_site(&self) -> bool {
        matches!(self.kind, EntityKind::ConstructionSite(_))
    }

    /// Whether this is a resource pile.
    pub const fn is_dropped_resource(&self) -> bool {
        matches!(self.kind, EntityKind::Resource(_))
    }

    /// Energy this object holds: store contents, source reserve, or pile size.
    pub fn energy(&self) -> u32 {
        match &self.kind {
            EntityKind::Source(source) => source.energy,
            EntityKind::Resource(pile) if pile.resource_type == ResourceKind::Energy => pile.amount,
            _ => self.store().map_or(0, |store| store.used(ResourceKind::Energy)),
        }
    }

    /// Room left for energy in this object's store.
    pub fn free_energy(&self) -> u32 {
        self.store().map_or(0, |store| store.free(ResourceKind::Energy))
    }

    /// Current hit points of a creep or structure.
    pub const fn hits(&self) -> Option<u32> {
        match &self.kind {
            EntityKind::Creep(creep) => creep.hits,
            EntityKind::Structure(structure) => structure.hits,
            _ => None,
        }
    }

    /// Whether this player owns the object.
    pub fn is_mine(&self) -> bool {
        match &self.kind {
            EntityKind::Creep(creep) => creep.my,
            EntityKind::Structure(structure) => structure.my.unwrap_or(false),
            EntityKind::Controller(controller) => controller.my,
            _ => false,
        }
    }

    /// Short label for logs: structure type, or the object kind.
    pub fn label(&self) -> String {
        match &self.kind {
            EntityKind::Creep(creep) => format!("creep {}", creep.name),
            EntityKind::Source(_) => String::from("source"),
            EntityKind::Structure(structure) => format!("{:?}", structure.structure_type),
            EntityKind::ConstructionSite(site) => format!("site:{:?}", site.structure_type),
            EntityKind::Resource(pile) => format!("dropped {}", pile.resource_type.as_str()),
            EntityKind::Controller(_) => String::from("controller"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rooms and action parameters
// ---------------------------------------------------------------------------

/// Room-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    /// Room name.
    pub name: RoomName,
    /// Energy currently in spawns and extensions.
    pub energy_available: u32,
    /// Total spawn and extension capacity.
    pub energy_capacity_available: u32,
    /// The room controller, if any.
    pub controller: Option<EntityId>,
    /// The room storage, if built.
    pub storage: Option<EntityId>,
}

/// Extra arguments to an action primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams {
    /// Resource to move, for transfer and withdraw.
    pub resource: Option<ResourceKind>,
    /// Amount to move; everything possible when absent.
    pub amount: Option<u32>,
}

impl ActionParams {
    /// No extra arguments.
    pub const fn none() -> Self {
        Self {
            resource: None,
            amount: None,
        }
    }

    /// Move as much of `kind` as possible.
    pub const fn resource(kind: ResourceKind) -> Self {
        Self {
            resource: Some(kind),
            amount: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_range() {
        let a = Position::new(10, 10, "W1N1");
        let b = Position::new(13, 11, "W1N1");
        assert_eq!(a.range_to(&b), Some(3));
        assert!(!a.is_near_to(&b));
        assert!(a.is_near_to(&Position::new(11, 9, "W1N1")));
    }

    #[test]
    fn cross_room_range_is_undefined() {
        let a = Position::new(10, 10, "W1N1");
        let b = Position::new(10, 10, "W2N1");
        assert_eq!(a.range_to(&b), None);
        assert!(!a.is_near_to(&b));
    }

    #[test]
    fn store_reads_amounts_and_metadata() {
        let store: Store =
            serde_json::from_str(r#"{"energy": 40, "H": 5, "capacity": 100, "freeCapacity": 55}"#)
                .unwrap_or_default();
        assert_eq!(store.used(ResourceKind::Energy), 40);
        assert_eq!(store.used(ResourceKind::Hydrogen), 5);
        assert_eq!(store.capacity(), Some(100));
        assert_eq!(store.free_hint(), Some(55));
        assert_eq!(store.free(ResourceKind::Energy), 55);
    }

    #[test]
    fn store_without_capacity_has_no_room() {
        let store = Store::new().holding(ResourceKind::Energy, 10);
        assert_eq!(store.capacity(), None);
        assert_eq!(store.free(ResourceKind::Energy), 0);
    }

    #[test]
    fn store_ignores_non_numeric_keys() {
        let store: Store =
            serde_json::from_str(r#"{"energy": 7, "note": "x", "power": null}"#).unwrap_or_default();
        assert_eq!(store.total_used(), 7);
    }

    #[test]
    fn entity_energy_by_kind() {
        let source = Entity {
            id: EntityId::from("s1"),
            pos: Position::new(1, 1, "W1N1"),
            kind: EntityKind::Source(SourceData {
                energy: 3000,
                energy_capacity: 3000,
            }),
        };
        assert_eq!(source.energy(), 3000);
        assert!(source.is_source());
        assert_eq!(source.free_energy(), 0);
    }
}
