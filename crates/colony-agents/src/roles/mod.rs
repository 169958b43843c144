//! Role strategies: what a creep of each role does when idle and when
//! working.
//!
//! Roles are a closed set, so dispatch is a static table rather than a
//! trait object per creep. Harvesters and carriers alternate between
//! collecting and delivering on the `delivering` flag; builders alternate
//! on the `working` flag; attackers have no mode.

use colony_types::Role;

use crate::agent::Agent;

pub mod attacker;
pub mod builder;
pub mod carrier;
pub mod harvester;

/// Handler pair for one role. Moving, Renewing and Dying are shared.
#[derive(Debug)]
pub struct RoleStrategy {
    /// Pick the next target. Called in Idle.
    pub idle: fn(&mut Agent<'_>),
    /// Act on the current target. Called in Working.
    pub working: fn(&mut Agent<'_>),
}

static HARVESTER: RoleStrategy = RoleStrategy {
    idle: harvester::idle,
    working: harvester::working,
};

static CARRIER: RoleStrategy = RoleStrategy {
    idle: carrier::idle,
    working: carrier::working,
};

static BUILDER: RoleStrategy = RoleStrategy {
    idle: builder::idle,
    working: builder::working,
};

static ATTACKER: RoleStrategy = RoleStrategy {
    idle: attacker::idle,
    working: attacker::working,
};

/// The strategy driving `role`, `None` for roles this build does not know.
pub const fn strategy_for(role: Role) -> Option<&'static RoleStrategy> {
    match role {
        Role::Harvester => Some(&HARVESTER),
        Role::Carrier => Some(&CARRIER),
        Role::Builder => Some(&BUILDER),
        Role::Attacker => Some(&ATTACKER),
        Role::Unrecognized => None,
    }
}

/// Result of re-evaluating a role's mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    /// The flag after evaluation.
    pub active: bool,
    /// Whether the evaluation changed it.
    pub flipped: bool,
}

/// Harvester and carrier rule: an empty creep collects, a full creep
/// delivers, anything in between keeps its current mode.
pub fn evaluate_delivering(agent: &mut Agent<'_>) -> Mode {
    let current = agent.memory().delivering.unwrap_or(false);
    let active = if agent.energy_used() == 0 {
        false
    } else if agent.energy_free() == 0 {
        true
    } else {
        current
    };
    if agent.memory().delivering != Some(active) {
        agent.memory_mut().delivering = Some(active);
    }
    Mode {
        active,
        flipped: active != current,
    }
}

/// Builder rule: an empty creep seeks energy; a full creep that is not yet
/// working starts working.
pub fn evaluate_working(agent: &mut Agent<'_>) -> Mode {
    let current = agent.memory().working.unwrap_or(false);
    let active = if agent.energy_used() == 0 {
        false
    } else if !current && agent.energy_free() == 0 {
        true
    } else {
        current
    };
    if agent.memory().working != Some(active) {
        agent.memory_mut().working = Some(active);
    }
    Mode {
        active,
        flipped: active != current,
    }
}
