//! Recording wrapper around any [`WorldState`].
//!
//! [`ActionJournal`] forwards every call unchanged and appends one
//! [`JournalEntry`] per issued action. The replay debugger prints the
//! journal; the determinism tests compare journals from two backends.

use colony_types::{
    ActionParams, BodyPart, CreepMemory, Entity, EntityId, FindCategory, Memory, OutcomeCode,
    Position, RoomInfo, RoomName, Verb, WorldMode,
};
use serde::Serialize;

use crate::error::WorldError;
use crate::state::{Filter, WorldState};

/// One issued action and the code it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Tick the action was issued in.
    pub tick: u64,
    /// Acting creep.
    pub agent: EntityId,
    /// Verb issued.
    pub verb: Verb,
    /// Target object.
    pub target: EntityId,
    /// Code returned by the backend.
    pub outcome: OutcomeCode,
}

/// A [`WorldState`] that records the actions passing through it.
#[derive(Debug)]
pub struct ActionJournal<W> {
    inner: W,
    entries: Vec<JournalEntry>,
}

impl<W: WorldState> ActionJournal<W> {
    /// Start recording over `inner`.
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            entries: Vec::new(),
        }
    }

    /// Everything recorded so far.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Take the recorded entries, leaving the journal empty.
    pub fn drain(&mut self) -> Vec<JournalEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Borrow the wrapped world.
    pub const fn inner(&self) -> &W {
        &self.inner
    }

    /// Unwrap the world, discarding the journal.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: WorldState> WorldState for ActionJournal<W> {
    fn mode(&self) -> WorldMode {
        self.inner.mode()
    }

    fn time(&self) -> u64 {
        self.inner.time()
    }

    fn resolve(&self, id: &EntityId) -> Option<Entity> {
        self.inner.resolve(id)
    }

    fn find_all(
        &self,
        room: &RoomName,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Vec<Entity> {
        self.inner.find_all(room, category, filter)
    }

    fn find_nearest(
        &self,
        origin: &Position,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Option<Entity> {
        self.inner.find_nearest(origin, category, filter)
    }

    fn act(
        &mut self,
        agent: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> OutcomeCode {
        let outcome = self.inner.act(agent, verb, target, params);
        self.entries.push(JournalEntry {
            tick: self.inner.time(),
            agent: agent.clone(),
            verb,
            target: target.clone(),
            outcome,
        });
        outcome
    }

    fn creeps(&self) -> Vec<Entity> {
        self.inner.creeps()
    }

    fn spawn(&self, name: &str) -> Option<Entity> {
        self.inner.spawn(name)
    }

    fn room(&self, name: &RoomName) -> Option<RoomInfo> {
        self.inner.room(name)
    }

    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> OutcomeCode {
        self.inner.spawn_creep(spawn, body, name, memory)
    }

    fn say(&mut self, agent: &EntityId, message: &str) {
        self.inner.say(agent, message);
    }

    fn load_memory(&self) -> Result<Memory, WorldError> {
        self.inner.load_memory()
    }

    fn store_memory(&mut self, memory: &Memory) -> Result<(), WorldError> {
        self.inner.store_memory(memory)
    }

    fn end_tick(&mut self) {
        self.inner.end_tick();
    }
}
