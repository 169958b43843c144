//! Builder: fetches energy from containers or storage and spends it on
//! construction sites.

use colony_types::{
    ActionParams, Entity, FindCategory, OutcomeCode, ResourceKind, StructureType, Verb,
};
use colony_world::any;
use tracing::warn;

use super::evaluate_working;
use crate::agent::Agent;

/// Pick an energy source or a construction site.
pub fn idle(agent: &mut Agent<'_>) {
    if !evaluate_working(agent).active {
        if let Some(source) = energy_source(agent) {
            agent.begin_moving(&source);
            return;
        }
        if agent.energy_used() == 0 {
            agent.say("❓ no energy");
            return;
        }
        // Nothing to refill from, but there is something to spend.
        agent.memory_mut().working = Some(true);
    }
    match agent.find_nearest(FindCategory::ConstructionSites, &any) {
        Some(site) => agent.begin_moving(&site),
        None => agent.say("🚧 no sites"),
    }
}

/// Build on a site or withdraw from a store, depending on the target.
pub fn working(agent: &mut Agent<'_>) {
    if evaluate_working(agent).flipped {
        agent.go_idle();
        return;
    }
    let Some(target) = agent.resolve_target() else {
        return;
    };

    if target.is_construction_site() {
        let code = agent.act(Verb::Build, &target.id, ActionParams::none());
        if code == OutcomeCode::NotEnoughResources {
            agent.memory_mut().working = Some(false);
            agent.go_idle();
        } else {
            agent.settle(Verb::Build, code);
        }
    } else if target.store().is_some() {
        let code = agent.act(
            Verb::Withdraw,
            &target.id,
            ActionParams::resource(ResourceKind::Energy),
        );
        if matches!(code, OutcomeCode::Ok | OutcomeCode::Full) {
            agent.memory_mut().working = Some(true);
            agent.go_idle();
        } else {
            agent.settle(Verb::Withdraw, code);
        }
    } else {
        warn!(creep = %agent.name(), target = %target.id, kind = %target.label(), "builder cannot use this target");
        agent.go_idle();
    }
}

fn energy_source(agent: &Agent<'_>) -> Option<Entity> {
    let minimum = agent.config().roles.builder_source_min;
    let stocked = |entity: &Entity| {
        entity.is_structure_of(&[StructureType::Container, StructureType::Storage])
            && entity.energy() > minimum
    };
    agent.find_nearest(FindCategory::Structures, &stocked)
}
