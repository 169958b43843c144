//! Carrier: moves energy from piles, containers and storage to the
//! structures that consume it. Never mines.

use colony_types::{
    ActionParams, Entity, FindCategory, OutcomeCode, ResourceKind, StructureType, Verb,
};
use tracing::warn;

use super::evaluate_delivering;
use crate::agent::Agent;

/// Pick a pickup point or a consumer to fill.
pub fn idle(agent: &mut Agent<'_>) {
    if evaluate_delivering(agent).active {
        match delivery_target(agent) {
            Some(target) => agent.begin_moving(&target),
            None => agent.say("❓ no delivery"),
        }
    } else {
        match pickup_target(agent) {
            Some(target) => agent.begin_moving(&target),
            None => agent.say("❓ no pickup"),
        }
    }
}

/// Transfer, withdraw or pick up, depending on mode and target.
pub fn working(agent: &mut Agent<'_>) {
    let mode = evaluate_delivering(agent);
    if mode.flipped {
        agent.go_idle();
        return;
    }
    let Some(target) = agent.resolve_target() else {
        return;
    };
    let energy = ActionParams::resource(ResourceKind::Energy);

    if mode.active {
        let code = agent.act(Verb::Transfer, &target.id, energy);
        if code == OutcomeCode::NotEnoughResources {
            agent.memory_mut().delivering = Some(false);
            agent.go_idle();
        } else {
            agent.settle(Verb::Transfer, code);
        }
        return;
    }

    if target.is_source() {
        warn!(creep = %agent.name(), target = %target.id, "carriers do not mine sources");
        agent.go_idle();
        return;
    }
    let (verb, params) = if target.is_dropped_resource() {
        (Verb::Pickup, ActionParams::none())
    } else {
        (Verb::Withdraw, energy)
    };
    let code = agent.act(verb, &target.id, params);
    if code == OutcomeCode::Full {
        agent.memory_mut().delivering = Some(true);
        agent.go_idle();
    } else {
        agent.settle(verb, code);
    }
}

/// Dropped energy, then well-stocked containers, then storage.
fn pickup_target(agent: &Agent<'_>) -> Option<Entity> {
    let roles = &agent.config().roles;
    let pile_min = roles.dropped_energy_min;
    let container_min = roles.container_energy_min;

    let pile = |entity: &Entity| entity.is_dropped_resource() && entity.energy() > pile_min;
    let container = |entity: &Entity| {
        entity.is_structure_of(&[StructureType::Container]) && entity.energy() > container_min
    };
    agent
        .find_nearest(FindCategory::DroppedResources, &pile)
        .or_else(|| agent.find_nearest(FindCategory::Structures, &container))
        .or_else(|| room_storage(agent).filter(|storage| storage.energy() > 0))
}

/// Spawns and extensions, then towers below their reserve, then storage.
fn delivery_target(agent: &Agent<'_>) -> Option<Entity> {
    let reserve = agent.config().roles.tower_reserve;
    let spawn_like = |entity: &Entity| {
        entity.is_structure_of(&[StructureType::Spawn, StructureType::Extension])
            && entity.free_energy() > 0
    };
    let tower = |entity: &Entity| {
        entity.is_structure_of(&[StructureType::Tower]) && entity.free_energy() > reserve
    };
    agent
        .find_nearest(FindCategory::Structures, &spawn_like)
        .or_else(|| agent.find_nearest(FindCategory::Structures, &tower))
        .or_else(|| room_storage(agent).filter(|storage| storage.free_energy() > 0))
}

fn room_storage(agent: &Agent<'_>) -> Option<Entity> {
    agent
        .room()
        .and_then(|room| room.storage)
        .and_then(|id| agent.resolve(&id))
}
