//! The observation/action contract every world backend implements.
//!
//! Role logic sees the world only through [`WorldState`]. The live and
//! replay backends answer the same calls with the same types, so a decision
//! taken against a snapshot is the decision the live game would produce.

use colony_types::{
    ActionParams, BodyPart, CreepMemory, Entity, EntityId, FindCategory, Memory, OutcomeCode,
    Position, RoomInfo, RoomName, Verb, WorldMode,
};

use crate::error::WorldError;
use crate::geometry;

/// Predicate applied to query results.
pub type Filter<'a> = &'a dyn Fn(&Entity) -> bool;

/// Accepts every candidate.
pub fn any(_: &Entity) -> bool {
    true
}

/// Uniform access to the game world for one tick.
pub trait WorldState {
    /// Which backend this is. For logging only.
    fn mode(&self) -> WorldMode;

    /// Current game tick.
    fn time(&self) -> u64;

    /// Look up an object by id. `None` means it is gone or never existed.
    fn resolve(&self, id: &EntityId) -> Option<Entity>;

    /// Every object of `category` in `room` accepted by `filter`.
    ///
    /// Categories the backend cannot answer yield an empty vector and a
    /// warning.
    fn find_all(&self, room: &RoomName, category: FindCategory, filter: Filter<'_>)
    -> Vec<Entity>;

    /// The object of `category` closest to `origin` in the same room.
    fn find_nearest(
        &self,
        origin: &Position,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Option<Entity> {
        geometry::nearest(origin, self.find_all(&origin.room_name, category, filter))
    }

    /// Issue `verb` from `agent` against `target`.
    fn act(
        &mut self,
        agent: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> OutcomeCode;

    /// Own creeps in name order.
    fn creeps(&self) -> Vec<Entity>;

    /// An own spawn by name.
    fn spawn(&self, name: &str) -> Option<Entity>;

    /// Room metadata.
    fn room(&self, name: &RoomName) -> Option<RoomInfo>;

    /// Ask `spawn` to produce a creep.
    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> OutcomeCode;

    /// Show a short message above a creep.
    fn say(&mut self, _agent: &EntityId, _message: &str) {}

    /// Read the memory blob.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Memory`] when the blob does not parse.
    fn load_memory(&self) -> Result<Memory, WorldError>;

    /// Write the memory blob back.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Memory`] when the blob cannot be serialized.
    fn store_memory(&mut self, memory: &Memory) -> Result<(), WorldError>;

    /// Called once after every tick.
    fn end_tick(&mut self) {}
}

impl<W: WorldState + ?Sized> WorldState for Box<W> {
    fn mode(&self) -> WorldMode {
        (**self).mode()
    }

    fn time(&self) -> u64 {
        (**self).time()
    }

    fn resolve(&self, id: &EntityId) -> Option<Entity> {
        (**self).resolve(id)
    }

    fn find_all(
        &self,
        room: &RoomName,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Vec<Entity> {
        (**self).find_all(room, category, filter)
    }

    fn find_nearest(
        &self,
        origin: &Position,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Option<Entity> {
        (**self).find_nearest(origin, category, filter)
    }

    fn act(
        &mut self,
        agent: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> OutcomeCode {
        (**self).act(agent, verb, target, params)
    }

    fn creeps(&self) -> Vec<Entity> {
        (**self).creeps()
    }

    fn spawn(&self, name: &str) -> Option<Entity> {
        (**self).spawn(name)
    }

    fn room(&self, name: &RoomName) -> Option<RoomInfo> {
        (**self).room(name)
    }

    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> OutcomeCode {
        (**self).spawn_creep(spawn, body, name, memory)
    }

    fn say(&mut self, agent: &EntityId, message: &str) {
        (**self).say(agent, message);
    }

    fn load_memory(&self) -> Result<Memory, WorldError> {
        (**self).load_memory()
    }

    fn store_memory(&mut self, memory: &Memory) -> Result<(), WorldError> {
        (**self).store_memory(memory)
    }

    fn end_tick(&mut self) {
        (**self).end_tick();
    }
}
