//! The per-tick entrypoint.
//!
//! Each tick the [`Dispatcher`]:
//!
//! 1. loads the memory blob from the world,
//! 2. reaps entries of creeps that no longer exist,
//! 3. steps every live creep's state machine in enumeration order,
//! 4. runs population control,
//! 5. writes memory back and closes the tick.
//!
//! A failing creep is logged and skipped; only memory I/O aborts a tick.

use std::collections::{BTreeMap, BTreeSet};

use colony_agents::{Agent, AgentConfig};
use colony_types::{CreepState, Memory, OutcomeCode, Role, WorldMode};
use colony_world::WorldState;
use tracing::{debug, error, info, warn};

use crate::config::{ColonyConfig, DispatcherConfig};
use crate::error::DispatchError;
use crate::population::{PopulationManager, SpawnDecision};

/// Summary of one dispatched tick.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// Game time of the tick.
    pub tick: u64,
    /// Backend the tick ran against.
    pub mode: WorldMode,
    /// Creeps whose state machine ran.
    pub processed: u32,
    /// Creeps skipped because their agent could not be built.
    pub failed: u32,
    /// Creeps still spawning.
    pub skipped: u32,
    /// Names whose memory was reaped.
    pub reaped: Vec<String>,
    /// Final state counts over processed creeps.
    pub states: BTreeMap<CreepState, u32>,
    /// What population control did.
    pub spawn: SpawnDecision,
}

/// Drives every creep once per tick against a single world.
#[derive(Debug)]
pub struct Dispatcher<W> {
    world: W,
    agents: AgentConfig,
    population: PopulationManager,
    settings: DispatcherConfig,
}

impl<W: WorldState> Dispatcher<W> {
    /// Own `world` for the session and take the relevant config sections.
    pub fn new(world: W, config: &ColonyConfig) -> Self {
        Self {
            world,
            agents: config.agent_config(),
            population: PopulationManager::new(config.population.clone()),
            settings: config.dispatcher.clone(),
        }
    }

    /// The world this dispatcher drives.
    pub const fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the world.
    pub const fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Give the world back.
    pub fn into_world(self) -> W {
        self.world
    }

    /// Run one tick. Errors are logged, never returned.
    pub fn tick(&mut self) {
        match self.run_tick() {
            Ok(summary) => info!(
                tick = summary.tick,
                mode = ?summary.mode,
                processed = summary.processed,
                failed = summary.failed,
                skipped = summary.skipped,
                reaped = summary.reaped.len(),
                "tick complete"
            ),
            Err(err) => error!(%err, "tick aborted"),
        }
    }

    /// Run one tick and report what happened.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when memory cannot be loaded or stored.
    pub fn run_tick(&mut self) -> Result<TickSummary, DispatchError> {
        let tick = self.world.time();
        let mode = self.world.mode();
        debug!(tick, ?mode, "tick started");

        let mut memory = self
            .world
            .load_memory()
            .map_err(|source| DispatchError::LoadMemory { source })?;
        let creeps = self.world.creeps();
        let live: BTreeSet<String> = creeps
            .iter()
            .filter_map(|creep| creep.as_creep().map(|data| data.name.clone()))
            .collect();

        let reaped = if self.settings.reap_memory {
            reap(&mut memory, &live)
        } else {
            Vec::new()
        };

        let mut processed = 0_u32;
        let mut failed = 0_u32;
        let mut skipped = 0_u32;
        let mut states: BTreeMap<CreepState, u32> = BTreeMap::new();

        for creep in creeps {
            let Some(data) = creep.as_creep() else {
                continue;
            };
            let name = data.name.clone();
            // Every live creep leaves the tick with a state, acted or not.
            let entry = memory.creeps.entry(name.clone()).or_default();
            entry.state.get_or_insert(CreepState::Idle);
            if data.spawning {
                debug!(creep = %name, "still spawning");
                skipped = skipped.saturating_add(1);
                continue;
            }

            if entry.role.is_none() {
                let role = self.settings.default_role;
                warn!(creep = %name, role = role.as_str(), "no role in memory, assigning default");
                entry.role = Some(role);
                entry.state = Some(CreepState::Idle);
            }

            match Agent::new(creep, &mut self.world, entry, &self.agents) {
                Ok(mut agent) => {
                    let state = agent.step();
                    processed = processed.saturating_add(1);
                    let count = states.entry(state).or_insert(0);
                    *count = count.saturating_add(1);
                }
                Err(err) => {
                    warn!(creep = %name, %err, "creep skipped");
                    failed = failed.saturating_add(1);
                }
            }
        }

        let counts = role_counts(&memory, &live);
        let spawn = self.population.run(&mut self.world, &counts);
        if let SpawnDecision::Attempted {
            request,
            outcome: OutcomeCode::Ok,
        } = &spawn
        {
            memory
                .creeps
                .insert(request.name.clone(), request.memory.clone());
        }

        self.world
            .store_memory(&memory)
            .map_err(|source| DispatchError::StoreMemory { source })?;
        self.world.end_tick();

        Ok(TickSummary {
            tick,
            mode,
            processed,
            failed,
            skipped,
            reaped,
            states,
            spawn,
        })
    }
}

/// Drop memory of creeps not in `live`, returning their names.
fn reap(memory: &mut Memory, live: &BTreeSet<String>) -> Vec<String> {
    let mut reaped = Vec::new();
    memory.creeps.retain(|name, _| {
        let alive = live.contains(name);
        if !alive {
            info!(creep = %name, "clearing memory of vanished creep");
            reaped.push(name.clone());
        }
        alive
    });
    reaped
}

/// Head count per role over live creeps, spawning ones included.
fn role_counts(memory: &Memory, live: &BTreeSet<String>) -> BTreeMap<Role, u32> {
    let mut counts = BTreeMap::new();
    for role in live
        .iter()
        .filter_map(|name| memory.creeps.get(name).and_then(|entry| entry.role))
    {
        let count = counts.entry(role).or_insert(0_u32);
        *count = count.saturating_add(1);
    }
    counts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use colony_types::CreepMemory;

    fn memory_with(names: &[(&str, Option<Role>)]) -> Memory {
        let mut memory = Memory::default();
        for (name, role) in names {
            let entry = CreepMemory {
                role: *role,
                ..CreepMemory::default()
            };
            memory.creeps.insert(String::from(*name), entry);
        }
        memory
    }

    fn live(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| String::from(*name)).collect()
    }

    #[test]
    fn reap_drops_only_the_missing() {
        let mut memory = memory_with(&[("a", None), ("b", None), ("c", None)]);
        let reaped = reap(&mut memory, &live(&["b"]));
        assert_eq!(reaped, vec![String::from("a"), String::from("c")]);
        assert_eq!(memory.creeps.len(), 1);
        assert!(reap(&mut memory, &live(&["b"])).is_empty());
    }

    #[test]
    fn counts_ignore_dead_and_roleless() {
        let memory = memory_with(&[
            ("h1", Some(Role::Harvester)),
            ("h2", Some(Role::Harvester)),
            ("c1", Some(Role::Carrier)),
            ("x", None),
        ]);
        let counts = role_counts(&memory, &live(&["h1", "c1", "x"]));
        assert_eq!(counts.get(&Role::Harvester), Some(&1));
        assert_eq!(counts.get(&Role::Carrier), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
