//! The per-creep finite state machine.
//!
//! An [`Agent`] lives for one creep for one tick. It borrows the world and
//! the creep's memory entry, runs the global lifetime guards, then
//! dispatches on the stored state. Idle, Moving and Working may hand over
//! to each other within the same tick; every handover spends one hop of
//! [`FsmConfig::max_hops`](crate::config::FsmConfig::max_hops).
//!
//! Role strategies own Idle (what to do next) and Working (how to do it).
//! Moving, Renewing and Dying are shared. Every outcome code a role
//! receives goes through [`Agent::settle`] unless the role has a more
//! specific rule for it.

use colony_types::{
    ActionParams, CreepData, CreepMemory, CreepState, Entity, EntityId, FindCategory,
    OutcomeCode, ResourceKind, Role, RoomInfo, Store, Verb,
};
use colony_world::{Filter, WorldState, any};
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::roles::{self, RoleStrategy};

/// One creep's state machine for the current tick.
pub struct Agent<'a> {
    creep: Entity,
    name: String,
    world: &'a mut dyn WorldState,
    memory: &'a mut CreepMemory,
    config: &'a AgentConfig,
    strategy: &'static RoleStrategy,
    hops: u32,
}

impl core::fmt::Debug for Agent<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("state", &self.memory.state)
            .field("target", &self.memory.target)
            .field("hops", &self.hops)
            .finish_non_exhaustive()
    }
}

impl<'a> Agent<'a> {
    /// Bind a creep to its memory and the world for this tick.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotACreep`] when `creep` is some other object,
    /// [`AgentError::MissingRole`] when memory has no role and
    /// [`AgentError::UnrecognizedRole`] when the role is not one of the four
    /// driven roles.
    pub fn new(
        creep: Entity,
        world: &'a mut dyn WorldState,
        memory: &'a mut CreepMemory,
        config: &'a AgentConfig,
    ) -> Result<Self, AgentError> {
        let Some(data) = creep.as_creep() else {
            return Err(AgentError::NotACreep(creep.id));
        };
        let name = data.name.clone();
        let Some(role) = memory.role else {
            return Err(AgentError::MissingRole { creep: name });
        };
        let Some(strategy) = roles::strategy_for(role) else {
            return Err(AgentError::UnrecognizedRole { creep: name });
        };
        Ok(Self {
            creep,
            name,
            world,
            memory,
            config,
            strategy,
            hops: 0,
        })
    }

    /// Run one tick and return the state the creep ends in.
    pub fn step(&mut self) -> CreepState {
        if self.memory.state.is_none() {
            self.memory.state = Some(CreepState::Idle);
        }
        let state = self.state();
        let fsm = &self.config.fsm;
        let ttl = self.ticks_to_live();
        let dying = ttl.is_some_and(|ticks| ticks < fsm.low_lifetime_threshold);
        let due_renewal = self.memory.needs_renew == Some(true)
            && ttl.is_some_and(|ticks| ticks < fsm.renew_threshold);

        if dying && !matches!(state, CreepState::Dying | CreepState::Renewing) {
            self.set_state(CreepState::Dying);
        } else if due_renewal && state != CreepState::Renewing {
            self.set_state(CreepState::Renewing);
        }

        self.dispatch();
        self.state()
    }

    fn dispatch(&mut self) {
        if self.hops >= self.config.fsm.max_hops {
            warn!(
                creep = %self.name,
                state = ?self.state(),
                hops = self.hops,
                "hop budget spent, resuming next tick"
            );
            return;
        }
        self.hops = self.hops.saturating_add(1);
        match self.state() {
            CreepState::Idle => {
                let idle = self.strategy.idle;
                idle(self);
            }
            CreepState::Moving => self.handle_moving(),
            CreepState::Working => {
                let working = self.strategy.working;
                working(self);
            }
            CreepState::Renewing => self.handle_renewing(),
            CreepState::Dying => self.handle_dying(),
        }
    }

    // -------------------------------------------------------------------
    // Shared handlers
    // -------------------------------------------------------------------

    fn handle_moving(&mut self) {
        let Some(target) = self.resolve_target() else {
            return;
        };
        if self.creep.pos.is_near_to(&target.pos) {
            self.memory.clear_path_cache();
            self.set_state(CreepState::Working);
            self.dispatch();
            return;
        }
        match self.act(Verb::Move, &target.id, ActionParams::none()) {
            OutcomeCode::Ok | OutcomeCode::Tired => {}
            OutcomeCode::NoPath => {
                info!(creep = %self.name, target = %target.id, "no path to target");
                self.go_idle();
            }
            other => {
                warn!(creep = %self.name, target = %target.id, code = %other, "move failed");
            }
        }
    }

    fn handle_renewing(&mut self) {
        let Some(spawn) = self.find_nearest(FindCategory::MySpawns, &any) else {
            info!(creep = %self.name, "no spawn to renew at");
            self.finish_renewing();
            return;
        };
        match self.act(Verb::Renew, &spawn.id, ActionParams::none()) {
            OutcomeCode::Ok => {
                let complete = self.config.fsm.renew_complete_threshold;
                if self.ticks_to_live().is_some_and(|ticks| ticks >= complete) {
                    info!(creep = %self.name, "renewal complete");
                    self.finish_renewing();
                }
            }
            OutcomeCode::NotInRange => {
                let code = self.act(Verb::Move, &spawn.id, ActionParams::none());
                if !matches!(code, OutcomeCode::Ok | OutcomeCode::Tired) {
                    warn!(creep = %self.name, spawn = %spawn.id, code = %code, "cannot reach spawn");
                }
            }
            OutcomeCode::NotEnoughResources | OutcomeCode::Busy => {}
            other => {
                warn!(creep = %self.name, spawn = %spawn.id, code = %other, "renew failed");
                self.finish_renewing();
            }
        }
    }

    fn finish_renewing(&mut self) {
        self.memory.needs_renew = None;
        self.go_idle();
    }

    fn handle_dying(&mut self) {
        let low = self.config.fsm.low_lifetime_threshold;
        if self.ticks_to_live().is_some_and(|ticks| ticks >= low) {
            self.set_state(CreepState::Idle);
        }
    }

    // -------------------------------------------------------------------
    // Role-facing API
    // -------------------------------------------------------------------

    /// Creep name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The creep as observed this tick.
    pub const fn creep(&self) -> &Entity {
        &self.creep
    }

    fn creep_data(&self) -> Option<&CreepData> {
        self.creep.as_creep()
    }

    /// Remaining lifetime.
    pub fn ticks_to_live(&self) -> Option<u32> {
        self.creep_data().and_then(|data| data.ticks_to_live)
    }

    /// Role from memory.
    pub fn role(&self) -> Option<Role> {
        self.memory.role
    }

    /// Current state.
    pub fn state(&self) -> CreepState {
        self.memory.state()
    }

    /// Read the creep's memory.
    pub fn memory(&self) -> &CreepMemory {
        &*self.memory
    }

    /// Write the creep's memory.
    pub fn memory_mut(&mut self) -> &mut CreepMemory {
        &mut *self.memory
    }

    /// Thresholds in force.
    pub const fn config(&self) -> &AgentConfig {
        self.config
    }

    /// Carried resources.
    pub fn store(&self) -> Option<&Store> {
        self.creep.store()
    }

    /// Energy carried.
    pub fn energy_used(&self) -> u32 {
        self.store().map_or(0, |store| store.used(ResourceKind::Energy))
    }

    /// Room left for energy.
    pub fn energy_free(&self) -> u32 {
        self.store().map_or(0, |store| store.free(ResourceKind::Energy))
    }

    /// Metadata of the room the creep stands in.
    pub fn room(&self) -> Option<RoomInfo> {
        self.world.room(&self.creep.pos.room_name)
    }

    /// Look up any object.
    pub fn resolve(&self, id: &EntityId) -> Option<Entity> {
        self.world.resolve(id)
    }

    /// Closest matching object in the creep's room.
    pub fn find_nearest(&self, category: FindCategory, filter: Filter<'_>) -> Option<Entity> {
        self.world.find_nearest(&self.creep.pos, category, filter)
    }

    /// Issue an action from this creep.
    pub fn act(&mut self, verb: Verb, target: &EntityId, params: ActionParams) -> OutcomeCode {
        let code = self.world.act(&self.creep.id, verb, target, params);
        debug!(creep = %self.name, ?verb, target = %target, code = %code, "action");
        code
    }

    /// Show a short message above the creep.
    pub fn say(&mut self, message: &str) {
        self.world.say(&self.creep.id, message);
    }

    /// Enter `state`, announcing it when it differs from the current one.
    pub fn set_state(&mut self, state: CreepState) {
        let previous = self.state();
        self.memory.state = Some(state);
        if previous != state {
            debug!(creep = %self.name, from = ?previous, to = ?state, "transition");
            self.world.say(&self.creep.id, state.announcement());
        }
    }

    /// The remembered target, re-resolved. Clears it and goes idle when it
    /// is unset or gone.
    pub fn resolve_target(&mut self) -> Option<Entity> {
        let Some(id) = self.memory.target.clone() else {
            self.go_idle();
            return None;
        };
        let found = self.world.resolve(&id);
        if found.is_none() {
            info!(creep = %self.name, target = %id, "target gone");
            self.go_idle();
        }
        found
    }

    /// Remember `target` and start walking toward it this tick.
    pub fn begin_moving(&mut self, target: &Entity) {
        info!(creep = %self.name, target = %target.id, kind = %target.label(), "new target");
        self.memory.target = Some(target.id.clone());
        self.set_state(CreepState::Moving);
        self.dispatch();
    }

    /// Back to Moving toward the remembered target, this tick.
    pub fn revert_to_moving(&mut self) {
        self.set_state(CreepState::Moving);
        self.dispatch();
    }

    /// Drop the target and go idle. Planning resumes next tick.
    pub fn go_idle(&mut self) {
        self.memory.target = None;
        self.set_state(CreepState::Idle);
    }

    /// Apply the shared outcome policy to the result of `verb`.
    ///
    /// Success keeps a channelled verb working on the same target and
    /// completes a one-shot verb. Out of range walks back. Fatigue and a
    /// busy target wait. Exhausted, full, invalid or missing targets are
    /// dropped. Anything else is logged and dropped.
    pub fn settle(&mut self, verb: Verb, code: OutcomeCode) {
        match code {
            OutcomeCode::Ok => {
                if !verb.is_channelled() {
                    self.go_idle();
                }
            }
            OutcomeCode::NotInRange => self.revert_to_moving(),
            OutcomeCode::Tired | OutcomeCode::Busy => {}
            OutcomeCode::NotEnoughResources
            | OutcomeCode::Full
            | OutcomeCode::InvalidTarget
            | OutcomeCode::NotFound => {
                debug!(creep = %self.name, ?verb, code = %code, "task over");
                self.go_idle();
            }
            other => {
                warn!(creep = %self.name, ?verb, code = %other, "unexpected outcome");
                self.go_idle();
            }
        }
    }
}
