//! Shared type definitions for the Colony creep controller.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace: what a game object looks like this tick, what the memory
//! blob looks like between ticks, and what a captured snapshot looks like.
//! The memory schema flows to `TypeScript` via `ts-rs` for the host-side
//! script.
//!
//! # Modules
//!
//! - [`ids`] -- Newtype wrappers for host-issued identifiers
//! - [`enums`] -- Roles, FSM states, verbs, find categories, game vocabulary
//! - [`outcome`] -- Host outcome codes
//! - [`structs`] -- Positions, stores, entities, room metadata
//! - [`memory`] -- Persisted memory schema
//! - [`snapshot`] -- Captured snapshot format for replay

pub mod enums;
pub mod ids;
pub mod memory;
pub mod outcome;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    BodyPart, CreepState, FindCategory, ResourceKind, Role, StructureType, Verb, WorldMode,
};
pub use ids::{EntityId, RoomName};
pub use memory::{CreepMemory, Memory, PATH_CACHE_KEY};
pub use outcome::OutcomeCode;
pub use snapshot::{
    BodyEntry, CAPTURE_PREFIX, ControllerRecord, CreepRecord, DroppedRecord, GameSnapshot,
    RoomRecord, SiteRecord, Snapshot, SourceRecord, SpawnRecord, StorageRecord, StructureRecord,
};
pub use structs::{
    ActionParams, ControllerData, CreepData, DroppedResource, Entity, EntityKind, Owner, Position,
    RoomInfo, SiteData, SourceData, Store, StructureData,
};
