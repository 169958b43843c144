//! Harvester: mines sources and carries the energy home.

use colony_types::{ActionParams, Entity, FindCategory, ResourceKind, StructureType, Verb};
use colony_world::any;

use super::evaluate_delivering;
use crate::agent::Agent;

/// Pick a source to mine or a structure to fill.
pub fn idle(agent: &mut Agent<'_>) {
    if evaluate_delivering(agent).active {
        match delivery_target(agent) {
            Some(target) => agent.begin_moving(&target),
            None => agent.say("❓ no deposit"),
        }
    } else {
        match source_target(agent) {
            Some(source) => agent.begin_moving(&source),
            None => agent.say("💧 no sources"),
        }
    }
}

/// Harvest or transfer, depending on mode.
pub fn working(agent: &mut Agent<'_>) {
    let mode = evaluate_delivering(agent);
    if mode.flipped {
        agent.go_idle();
        return;
    }
    let Some(target) = agent.resolve_target() else {
        return;
    };
    let (verb, params) = if mode.active {
        (Verb::Transfer, ActionParams::resource(ResourceKind::Energy))
    } else {
        (Verb::Harvest, ActionParams::none())
    };
    let code = agent.act(verb, &target.id, params);
    agent.settle(verb, code);
}

/// The assigned source while it still has energy, else the closest active
/// source.
fn source_target(agent: &Agent<'_>) -> Option<Entity> {
    let assigned = agent
        .memory()
        .assigned_source
        .as_ref()
        .and_then(|id| agent.resolve(id))
        .filter(|source| source.is_source() && source.energy() > 0);
    assigned.or_else(|| agent.find_nearest(FindCategory::SourcesActive, &any))
}

/// Spawns and extensions first, then containers and storage.
fn delivery_target(agent: &Agent<'_>) -> Option<Entity> {
    let spawn_like = |entity: &Entity| {
        entity.is_structure_of(&[StructureType::Spawn, StructureType::Extension])
            && entity.free_energy() > 0
    };
    let bulk = |entity: &Entity| {
        entity.is_structure_of(&[StructureType::Container, StructureType::Storage])
            && entity.free_energy() > 0
    };
    agent
        .find_nearest(FindCategory::Structures, &spawn_like)
        .or_else(|| agent.find_nearest(FindCategory::Structures, &bulk))
}
