//! The replay backend: the same contract answered from a frozen snapshot.
//!
//! The object graph is built once and never changes. Actions do not
//! simulate anything; they return the code the host would most plausibly
//! return given the captured state. Range is adjacency only, checked before
//! any resource plausibility, so movement decisions match the live game
//! exactly even where the resource outcome is a guess.
//!
//! Memory is a session copy seeded from the snapshot. Storing it replaces
//! the copy; the snapshot is never modified.

use std::path::Path;

use colony_types::{
    ActionParams, BodyPart, CreepData, CreepMemory, Entity, EntityId, EntityKind, FindCategory,
    Memory, OutcomeCode, ResourceKind, RoomInfo, RoomName, Snapshot, StructureType, Verb,
    WorldMode,
};
use tracing::{debug, warn};

use crate::error::WorldError;
use crate::geometry;
use crate::graph::ObjectGraph;
use crate::state::{Filter, WorldState};

/// [`WorldState`] over a captured snapshot.
#[derive(Debug, Clone)]
pub struct ReplayWorld {
    graph: ObjectGraph,
    memory: Memory,
    base_tick: u64,
    elapsed: u64,
}

impl ReplayWorld {
    /// Build a replay session from a parsed snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let graph = ObjectGraph::build(&snapshot);
        let base_tick = snapshot.game.time.unwrap_or(snapshot.tick);
        debug!(tick = base_tick, objects = graph.len(), "replay session ready");
        Self {
            graph,
            memory: snapshot.memory,
            base_tick,
            elapsed: 0,
        }
    }

    /// Parse raw snapshot JSON or a captured console line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SnapshotFormat`] when the input does not parse.
    pub fn parse(input: &str) -> Result<Self, WorldError> {
        let snapshot = Snapshot::parse(input).map_err(|source| WorldError::SnapshotFormat {
            path: String::from("<inline>"),
            source,
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SnapshotRead`] when the file cannot be read and
    /// [`WorldError::SnapshotFormat`] when it does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| WorldError::SnapshotRead {
            path: display.clone(),
            source,
        })?;
        let snapshot = Snapshot::parse(&contents).map_err(|source| WorldError::SnapshotFormat {
            path: display,
            source,
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// The underlying object graph.
    pub const fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    /// The session memory as last stored.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Ticks run since the session started.
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Synthesize the outcome of `verb` without touching any state.
    pub fn judge(
        &self,
        agent: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> OutcomeCode {
        let Some(actor) = self.graph.get(agent) else {
            return OutcomeCode::NotFound;
        };
        let Some(creep) = actor.as_creep() else {
            return OutcomeCode::NotFound;
        };
        if !creep.my {
            return OutcomeCode::NotOwner;
        }
        if creep.spawning {
            return OutcomeCode::Busy;
        }
        let Some(target) = self.graph.get(target) else {
            return OutcomeCode::InvalidTarget;
        };
        // An uncaptured body cannot be judged.
        if let Some(part) = required_part(verb)
            && !creep.body.is_empty()
            && !creep.body.contains(&part)
        {
            return OutcomeCode::NoBodypart;
        }
        let near = geometry::is_near(&actor.pos, &target.pos);
        match verb {
            Verb::Move => OutcomeCode::Ok,
            Verb::Harvest => judge_harvest(near, target),
            Verb::Build => judge_build(near, creep, target),
            Verb::Attack => judge_attack(near, target),
            Verb::Transfer => judge_transfer(near, creep, target, params),
            Verb::Withdraw => judge_withdraw(near, creep, target, params),
            Verb::Pickup => judge_pickup(near, creep, target),
            Verb::Renew => judge_renew(near, target),
        }
    }
}

const fn required_part(verb: Verb) -> Option<BodyPart> {
    match verb {
        Verb::Harvest | Verb::Build => Some(BodyPart::Work),
        Verb::Attack => Some(BodyPart::Attack),
        Verb::Move => Some(BodyPart::Move),
        Verb::Transfer | Verb::Withdraw | Verb::Pickup | Verb::Renew => None,
    }
}

fn judge_harvest(near: bool, target: &Entity) -> OutcomeCode {
    if !target.is_source() {
        return OutcomeCode::InvalidTarget;
    }
    if !near {
        return OutcomeCode::NotInRange;
    }
    if target.energy() == 0 {
        return OutcomeCode::NotEnoughResources;
    }
    OutcomeCode::Ok
}

fn judge_build(near: bool, creep: &CreepData, target: &Entity) -> OutcomeCode {
    if !target.is_construction_site() {
        return OutcomeCode::InvalidTarget;
    }
    if !near {
        return OutcomeCode::NotInRange;
    }
    if creep.store.used(ResourceKind::Energy) == 0 {
        return OutcomeCode::NotEnoughResources;
    }
    OutcomeCode::Ok
}

fn judge_attack(near: bool, target: &Entity) -> OutcomeCode {
    let attackable = match &target.kind {
        EntityKind::Creep(other) => !other.my,
        EntityKind::Structure(_) => true,
        _ => false,
    };
    if !attackable {
        return OutcomeCode::InvalidTarget;
    }
    if !near {
        return OutcomeCode::NotInRange;
    }
    OutcomeCode::Ok
}

fn judge_transfer(
    near: bool,
    creep: &CreepData,
    target: &Entity,
    params: ActionParams,
) -> OutcomeCode {
    let Some(store) = target.store() else {
        return OutcomeCode::InvalidTarget;
    };
    let Some(resource) = params.resource else {
        return OutcomeCode::InvalidArgs;
    };
    if !near {
        return OutcomeCode::NotInRange;
    }
    if creep.store.used(resource) == 0 {
        return OutcomeCode::NotEnoughResources;
    }
    if store.free(resource) == 0 {
        return OutcomeCode::Full;
    }
    OutcomeCode::Ok
}

fn judge_withdraw(
    near: bool,
    creep: &CreepData,
    target: &Entity,
    params: ActionParams,
) -> OutcomeCode {
    let Some(store) = target.as_structure().and_then(|s| s.store.as_ref()) else {
        return OutcomeCode::InvalidTarget;
    };
    let Some(resource) = params.resource else {
        return OutcomeCode::InvalidArgs;
    };
    if !near {
        return OutcomeCode::NotInRange;
    }
    if store.used(resource) == 0 {
        return OutcomeCode::NotEnoughResources;
    }
    if creep.store.free(resource) == 0 {
        return OutcomeCode::Full;
    }
    OutcomeCode::Ok
}

fn judge_pickup(near: bool, creep: &CreepData, target: &Entity) -> OutcomeCode {
    let EntityKind::Resource(pile) = &target.kind else {
        return OutcomeCode::InvalidTarget;
    };
    if !near {
        return OutcomeCode::NotInRange;
    }
    if creep.store.free(pile.resource_type) == 0 {
        return OutcomeCode::Full;
    }
    OutcomeCode::Ok
}

fn judge_renew(near: bool, target: &Entity) -> OutcomeCode {
    let Some(spawn) = target.as_structure() else {
        return OutcomeCode::InvalidTarget;
    };
    if spawn.structure_type != StructureType::Spawn || spawn.my != Some(true) {
        return OutcomeCode::InvalidTarget;
    }
    if spawn.spawning {
        return OutcomeCode::Busy;
    }
    if !near {
        return OutcomeCode::NotInRange;
    }
    if target.energy() == 0 {
        return OutcomeCode::NotEnoughResources;
    }
    OutcomeCode::Ok
}

impl WorldState for ReplayWorld {
    fn mode(&self) -> WorldMode {
        WorldMode::Replay
    }

    fn time(&self) -> u64 {
        self.base_tick.saturating_add(self.elapsed)
    }

    fn resolve(&self, id: &EntityId) -> Option<Entity> {
        self.graph.get(id).cloned()
    }

    fn find_all(
        &self,
        room: &RoomName,
        category: FindCategory,
        filter: Filter<'_>,
    ) -> Vec<Entity> {
        match self.graph.find(room, category) {
            Some(found) => found.into_iter().filter(|entity| filter(entity)).collect(),
            None => {
                warn!(room = %room, ?category, "snapshot does not capture this find category");
                Vec::new()
            }
        }
    }

    fn act(
        &mut self,
        agent: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> OutcomeCode {
        let outcome = self.judge(agent, verb, target, params);
        debug!(agent = %agent, ?verb, target = %target, code = %outcome, "replay action");
        outcome
    }

    fn creeps(&self) -> Vec<Entity> {
        self.graph.creeps().cloned().collect()
    }

    fn spawn(&self, name: &str) -> Option<Entity> {
        self.graph.spawn(name).cloned()
    }

    fn room(&self, name: &RoomName) -> Option<RoomInfo> {
        self.graph.room(name)
    }

    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        _memory: &CreepMemory,
    ) -> OutcomeCode {
        let Some(entity) = self.graph.get(spawn) else {
            return OutcomeCode::InvalidTarget;
        };
        let Some(structure) = entity.as_structure() else {
            return OutcomeCode::InvalidTarget;
        };
        if structure.structure_type != StructureType::Spawn {
            return OutcomeCode::InvalidTarget;
        }
        if body.is_empty() {
            return OutcomeCode::InvalidArgs;
        }
        if self.graph.has_creep(name) {
            return OutcomeCode::NameExists;
        }
        if structure.spawning {
            return OutcomeCode::Busy;
        }
        let cost = body
            .iter()
            .fold(0_u32, |total, part| total.saturating_add(part.cost()));
        if cost > entity.energy() {
            debug!(spawn = %spawn, cost, available = entity.energy(), "replay spawn short of energy");
            return OutcomeCode::NotEnoughResources;
        }
        debug!(spawn = %spawn, name, cost, "replay spawn accepted");
        OutcomeCode::Ok
    }

    fn say(&mut self, agent: &EntityId, message: &str) {
        debug!(agent = %agent, message, "say");
    }

    fn load_memory(&self) -> Result<Memory, WorldError> {
        Ok(self.memory.clone())
    }

    fn store_memory(&mut self, memory: &Memory) -> Result<(), WorldError> {
        self.memory = memory.clone();
        Ok(())
    }

    fn end_tick(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }
}
