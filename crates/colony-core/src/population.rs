//! Population control: keeps the desired number of creeps per role alive.
//!
//! Once per tick the manager looks at the current head count per role, walks
//! the configured priority order and asks the spawn for the first role that
//! is short. Bodies come from fixed tables tiered by the energy the room has
//! available. Nothing is queued: a short tick simply tries again next tick.

use std::collections::BTreeMap;

use colony_types::BodyPart::{Attack, Carry, Move, Tough, Work};
use colony_types::{BodyPart, CreepMemory, OutcomeCode, Role};
use colony_world::WorldState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Whether the manager runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Name of the spawn that produces new creeps.
    #[serde(default = "default_spawn_name")]
    pub spawn_name: String,

    /// Desired live count per role. Roles not listed are never spawned.
    #[serde(default = "default_desired")]
    pub desired: BTreeMap<Role, u32>,

    /// Order in which short roles are filled.
    #[serde(default = "default_priority")]
    pub priority: Vec<Role>,

    /// Energy assumed when the spawn's room reports nothing.
    #[serde(default = "default_fallback_energy")]
    pub fallback_energy: u32,

    /// Roles whose new creeps are marked for renewal at the spawn.
    #[serde(default)]
    pub renew_roles: Vec<Role>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_name: default_spawn_name(),
            desired: default_desired(),
            priority: default_priority(),
            fallback_energy: default_fallback_energy(),
            renew_roles: Vec::new(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_spawn_name() -> String {
    String::from("Spawn1")
}

fn default_desired() -> BTreeMap<Role, u32> {
    BTreeMap::from([
        (Role::Harvester, 2),
        (Role::Carrier, 2),
        (Role::Builder, 1),
        (Role::Attacker, 0),
    ])
}

fn default_priority() -> Vec<Role> {
    Role::ALL.to_vec()
}

const fn default_fallback_energy() -> u32 {
    300
}

/// A creep the manager wants built.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    /// Role of the new creep.
    pub role: Role,
    /// Body parts, in spawn order.
    pub body: Vec<BodyPart>,
    /// Creep name, `{role}-{tick}`.
    pub name: String,
    /// Initial memory entry.
    pub memory: CreepMemory,
}

impl SpawnRequest {
    /// Energy the body costs.
    pub fn cost(&self) -> u32 {
        body_cost(&self.body)
    }
}

/// What the manager did this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnDecision {
    /// Population control is switched off.
    Disabled,
    /// Every role has its desired count.
    Satisfied,
    /// The configured spawn does not exist.
    NoSpawn,
    /// The spawn is already producing a creep.
    SpawnBusy,
    /// The room cannot pay for the next body yet.
    ShortOfEnergy {
        /// Role that was due.
        role: Role,
        /// Body cost.
        cost: u32,
        /// Energy on hand.
        available: u32,
    },
    /// A spawn was requested; `outcome` is the host's answer.
    Attempted {
        /// The request sent to the spawn.
        request: SpawnRequest,
        /// The outcome code returned.
        outcome: OutcomeCode,
    },
}

/// Total energy cost of `body`.
pub fn body_cost(body: &[BodyPart]) -> u32 {
    body.iter()
        .fold(0_u32, |total, part| total.saturating_add(part.cost()))
}

/// Body for `role` given the energy on hand.
pub fn body_for(role: Role, energy: u32) -> Vec<BodyPart> {
    let parts: &[BodyPart] = match role {
        Role::Harvester if energy >= 550 => &[Work, Work, Work, Carry, Move, Move],
        Role::Harvester if energy >= 400 => &[Work, Work, Carry, Move, Move],
        Role::Harvester => &[Work, Work, Carry, Move],
        Role::Builder if energy >= 550 => &[Work, Work, Carry, Carry, Move, Move, Move],
        Role::Builder if energy >= 400 => &[Work, Work, Carry, Move, Move],
        Role::Builder => &[Work, Carry, Move, Move],
        Role::Carrier if energy >= 600 => &[Carry, Carry, Carry, Carry, Move, Move, Move, Move],
        Role::Carrier if energy >= 400 => &[Carry, Carry, Carry, Move, Move, Move],
        Role::Carrier => &[Carry, Carry, Move, Move],
        Role::Attacker if energy >= 390 => &[Tough, Tough, Attack, Attack, Move, Move],
        Role::Attacker if energy >= 260 => &[Attack, Attack, Move, Move],
        Role::Attacker => &[Attack, Move],
        Role::Unrecognized => &[Work, Carry, Move],
    };
    parts.to_vec()
}

/// Decides which creep to spawn next.
#[derive(Debug, Clone)]
pub struct PopulationManager {
    config: PopulationConfig,
}

impl PopulationManager {
    /// Create a manager over `config`.
    pub const fn new(config: PopulationConfig) -> Self {
        Self { config }
    }

    /// The configuration in force.
    pub const fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// First role in priority order that is below its desired count.
    pub fn next_role(&self, counts: &BTreeMap<Role, u32>) -> Option<Role> {
        self.config.priority.iter().copied().find(|role| {
            let desired = self.config.desired.get(role).copied().unwrap_or(0);
            counts.get(role).copied().unwrap_or(0) < desired
        })
    }

    /// Build the request for the next short role, if any.
    pub fn plan(&self, counts: &BTreeMap<Role, u32>, energy: u32, time: u64) -> Option<SpawnRequest> {
        let role = self.next_role(counts)?;
        let mut memory = CreepMemory::spawned(role);
        if self.config.renew_roles.contains(&role) {
            memory.needs_renew = Some(true);
        }
        Some(SpawnRequest {
            role,
            body: body_for(role, energy),
            name: format!("{}-{time}", role.as_str()),
            memory,
        })
    }

    /// Run population control against `world` for this tick.
    ///
    /// The caller records the new creep's memory when the outcome is
    /// [`OutcomeCode::Ok`].
    pub fn run(&self, world: &mut dyn WorldState, counts: &BTreeMap<Role, u32>) -> SpawnDecision {
        if !self.config.enabled {
            return SpawnDecision::Disabled;
        }
        let Some(spawn) = world.spawn(&self.config.spawn_name) else {
            debug!(spawn = %self.config.spawn_name, "spawn not found");
            return SpawnDecision::NoSpawn;
        };
        if spawn.as_structure().is_some_and(|s| s.spawning) {
            return SpawnDecision::SpawnBusy;
        }
        let available = world
            .room(&spawn.pos.room_name)
            .map_or(self.config.fallback_energy, |room| room.energy_available);
        let Some(request) = self.plan(counts, available, world.time()) else {
            return SpawnDecision::Satisfied;
        };

        let cost = request.cost();
        if available < cost {
            info!(role = %request.role.as_str(), cost, available, "waiting for energy to spawn");
            return SpawnDecision::ShortOfEnergy {
                role: request.role,
                cost,
                available,
            };
        }

        let outcome = world.spawn_creep(&spawn.id, &request.body, &request.name, &request.memory);
        match outcome {
            OutcomeCode::Ok => {
                info!(name = %request.name, role = %request.role.as_str(), cost, "spawning");
            }
            OutcomeCode::NotEnoughResources => {
                debug!(name = %request.name, cost, "spawn short of energy");
            }
            other => {
                warn!(name = %request.name, code = %other, "spawn failed");
            }
        }
        SpawnDecision::Attempted { request, outcome }
    }
}
