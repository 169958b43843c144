//! Attacker: closes in on the nearest hostile creep and fights it.

use colony_types::{ActionParams, FindCategory, Verb};
use colony_world::any;

use crate::agent::Agent;

/// Pick the closest hostile.
pub fn idle(agent: &mut Agent<'_>) {
    match agent.find_nearest(FindCategory::HostileCreeps, &any) {
        Some(enemy) => agent.begin_moving(&enemy),
        None => agent.say("🛡️ no targets"),
    }
}

/// Attack until the target is gone or out of reach.
pub fn working(agent: &mut Agent<'_>) {
    let Some(target) = agent.resolve_target() else {
        return;
    };
    if target.hits() == Some(0) {
        agent.go_idle();
        return;
    }
    let code = agent.act(Verb::Attack, &target.id, ActionParams::none());
    agent.settle(Verb::Attack, code);
}
