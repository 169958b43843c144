//! The live backend: a thin forwarder onto the authoritative host.
//!
//! [`Host`] is the raw API seam. It speaks in host terms: integer return
//! codes, the memory blob as a JSON string, and `None` from
//! [`Host::room_find`] for query kinds the binding does not expose.
//! [`LiveWorld`] translates that into the [`WorldState`] contract and keeps
//! nothing between calls.

use colony_types::{
    ActionParams, BodyPart, CreepMemory, Entity, EntityId, FindCategory, Memory, OutcomeCode,
    Position, RoomInfo, RoomName, Verb, WorldMode,
};
use tracing::warn;

use crate::error::WorldError;
use crate::geometry;
use crate::state::{Filter, WorldState};

/// The raw host API.
pub trait Host {
    /// `Game.time`.
    fn time(&self) -> u64;

    /// `Game.getObjectById`.
    fn get_object_by_id(&self, id: &EntityId) -> Option<Entity>;

    /// `Room.find`. `None` when the category is not exposed.
    fn room_find(&self, room: &RoomName, category: FindCategory) -> Option<Vec<Entity>>;

    /// `RoomPosition.findClosestByRange`.
    fn find_closest_by_range(
        &self,
        origin: &Position,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Option<Entity> {
        let found = self.room_find(&origin.room_name, category)?;
        geometry::nearest(origin, found.into_iter().filter(|entity| filter(entity)))
    }

    /// `Game.creeps`, in name order.
    fn creeps(&self) -> Vec<Entity>;

    /// `Game.spawns[name]`.
    fn spawn(&self, name: &str) -> Option<Entity>;

    /// `Game.rooms[name]`.
    fn room(&self, name: &RoomName) -> Option<RoomInfo>;

    /// A creep method call. Returns the raw return code.
    fn creep_action(
        &mut self,
        creep: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> i32;

    /// `StructureSpawn.spawnCreep`. Returns the raw return code.
    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> i32;

    /// `Creep.say`.
    fn say(&mut self, _creep: &EntityId, _message: &str) {}

    /// `RawMemory.get`.
    fn raw_memory(&self) -> String;

    /// `RawMemory.set`.
    fn set_raw_memory(&mut self, raw: String);
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn time(&self) -> u64 {
        (**self).time()
    }

    fn get_object_by_id(&self, id: &EntityId) -> Option<Entity> {
        (**self).get_object_by_id(id)
    }

    fn room_find(&self, room: &RoomName, category: FindCategory) -> Option<Vec<Entity>> {
        (**self).room_find(room, category)
    }

    fn find_closest_by_range(
        &self,
        origin: &Position,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Option<Entity> {
        (**self).find_closest_by_range(origin, category, filter)
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

    fn creep_action(
        &mut self,
        creep: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> i32 {
        (**self).creep_action(creep, verb, target, params)
    }

    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> i32 {
        (**self).spawn_creep(spawn, body, name, memory)
    }

    fn say(&mut self, creep: &EntityId, message: &str) {
        (**self).say(creep, message);
    }

    fn raw_memory(&self) -> String {
        (**self).raw_memory()
    }

    fn set_raw_memory(&mut self, raw: String) {
        (**self).set_raw_memory(raw);
    }
}

/// [`WorldState`] over a live [`Host`].
#[derive(Debug)]
pub struct LiveWorld<H> {
    host: H,
}

impl<H: Host> LiveWorld<H> {
    /// Wrap a host binding.
    pub const fn new(host: H) -> Self {
        Self { host }
    }

    /// Borrow the host binding.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Unwrap the host binding.
    pub fn into_host(self) -> H {
        self.host
    }
}

impl<H: Host> WorldState for LiveWorld<H> {
    fn mode(&self) -> WorldMode {
        WorldMode::Live
    }

    fn time(&self) -> u64 {
        self.host.time()
    }

    fn resolve(&self, id: &EntityId) -> Option<Entity> {
        self.host.get_object_by_id(id)
    }

    fn find_all(
        &self,
        room: &RoomName,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Vec<Entity> {
        match self.host.room_find(room, category) {
            Some(found) => found.into_iter().filter(|entity| filter(entity)).collect(),
            None => {
                warn!(room = %room, ?category, "host does not expose this find category");
                Vec::new()
            }
        }
    }

    fn find_nearest(
        &self,
        origin: &Position,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Option<Entity> {
        let nearest = self.host.find_closest_by_range(origin, category, filter);
        if nearest.is_none() && self.host.room_find(&origin.room_name, category).is_none() {
            warn!(room = %origin.room_name, ?category, "host does not expose this find category");
        }
        nearest
    }

    fn act(
        &mut self,
        agent: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> OutcomeCode {
        OutcomeCode::from_raw(self.host.creep_action(agent, verb, target, params))
    }

    fn creeps(&self) -> Vec<Entity> {
        self.host.creeps()
    }

    fn spawn(&self, name: &str) -> Option<Entity> {
        self.host.spawn(name)
    }

    fn room(&self, name: &RoomName) -> Option<RoomInfo> {
        self.host.room(name)
    }

    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> OutcomeCode {
        OutcomeCode::from_raw(self.host.spawn_creep(spawn, body, name, memory))
    }

    fn say(&mut self, agent: &EntityId, message: &str) {
        self.host.say(agent, message);
    }

    fn load_memory(&self) -> Result<Memory, WorldError> {
        Ok(Memory::from_raw(&self.host.raw_memory())?)
    }

    fn store_memory(&mut self, memory: &Memory) -> Result<(), WorldError> {
        let raw = memory.to_raw()?;
        self.host.set_raw_memory(raw);
        Ok(())
    }
}
