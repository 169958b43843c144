//! Live and Replay must drive creeps identically.
//!
//! [`MirrorHost`] answers every host call from the same snapshot the
//! replay backend reads, so the live path (raw codes, memory strings) and
//! the replay path see the same world. Both sessions run for several ticks
//! behind an [`ActionJournal`] and must issue the same actions with the
//! same outcomes.

#![allow(clippy::unwrap_used)]

use colony_core::{ColonyConfig, Dispatcher};
use colony_types::{
    ActionParams, BodyPart, CreepMemory, Entity, EntityId, FindCategory, Position, RoomInfo,
    RoomName, Snapshot, Verb,
};
use colony_world::{ActionJournal, Host, LiveWorld, ReplayWorld, WorldState};
use serde_json::json;

struct MirrorHost {
    replay: ReplayWorld,
    raw_memory: String,
}

impl MirrorHost {
    fn new(snapshot: Snapshot) -> Self {
        let replay = ReplayWorld::from_snapshot(snapshot);
        let raw_memory = replay.memory().to_raw().unwrap();
        Self { replay, raw_memory }
    }
}

impl Host for MirrorHost {
    fn time(&self) -> u64 {
        self.replay.time()
    }

    fn get_object_by_id(&self, id: &EntityId) -> Option<Entity> {
        self.replay.resolve(id)
    }

    fn room_find(&self, room: &RoomName, category: FindCategory) -> Option<Vec<Entity>> {
        self.replay.graph().find(room, category)
    }

    fn creeps(&self) -> Vec<Entity> {
        self.replay.creeps()
    }

    fn spawn(&self, name: &str) -> Option<Entity> {
        self.replay.spawn(name)
    }

    fn room(&self, name: &RoomName) -> Option<RoomInfo> {
        self.replay.room(name)
    }

    fn creep_action(
        &mut self,
        creep: &EntityId,
        verb: Verb,
        target: &EntityId,
        params: ActionParams,
    ) -> i32 {
        self.replay.judge(creep, verb, target, params).raw()
    }

    fn spawn_creep(
        &mut self,
        spawn: &EntityId,
        body: &[BodyPart],
        name: &str,
        memory: &CreepMemory,
    ) -> i32 {
        self.replay.spawn_creep(spawn, body, name, memory).raw()
    }

    fn raw_memory(&self) -> String {
        self.raw_memory.clone()
    }

    fn set_raw_memory(&mut self, raw: String) {
        self.raw_memory = raw;
    }
}

fn pos(x: u32, y: u32) -> serde_json::Value {
    json!({"x": x, "y": y, "roomName": "W1N1"})
}

fn snapshot() -> Snapshot {
    let creep = |id: &str, x: u32, y: u32, energy: u32, body: serde_json::Value| {
        json!({"id": id, "pos": pos(x, y), "store": {"energy": energy}, "body": body,
               "ticksToLive": 1300})
    };
    let raw = json!({
        "tick": 9000,
        "memory": {
            "creeps": {
                "h1": {"role": "harvester", "state": "idle"},
                "h2": {"role": "harvester", "state": "moving", "target": "s1"},
                "k1": {"role": "carrier", "state": "idle"},
                "b1": {"role": "builder"},
                "a1": {"role": "attacker", "state": "idle"},
                "r1": {"role": "carrier", "state": "idle", "needsRenew": true},
                "ghost": {"role": "builder", "state": "working"}
            },
            "rooms": {"W1N1": {"seen": true}}
        },
        "game": {
            "creeps": {
                "h1": creep("c-h1", 10, 10, 0, json!(["work", "carry", "move"])),
                "h2": creep("c-h2", 20, 21, 10, json!(["work", "carry", "move"])),
                "k1": creep("c-k1", 25, 25, 0, json!(["carry", "carry", "move"])),
                "b1": creep("c-b1", 30, 30, 30, json!(["work", "carry", "move"])),
                "a1": creep("c-a1", 5, 5, 0, json!(["attack", "move"])),
                "r1": {"id": "c-r1", "pos": pos(16, 15), "store": {},
                       "body": ["carry", "move"], "ticksToLive": 700},
                "u1": creep("c-u1", 40, 40, 0, json!(["work", "carry", "move"]))
            },
            "structures": {
                "sp1": {"id": "sp1", "structureType": "spawn", "my": true,
                        "pos": pos(15, 15), "store": {"energy": 250}},
                "ex1": {"id": "ex1", "structureType": "extension", "my": true,
                        "pos": pos(18, 15), "store": {"energy": 0}}
            },
            "spawns": {"Spawn1": {"id": "sp1", "pos": pos(15, 15)}},
            "rooms": {
                "W1N1": {
                    "energyAvailable": 250,
                    "energyCapacityAvailable": 350,
                    "sources": [
                        {"id": "s1", "pos": pos(20, 20), "energy": 3000},
                        {"id": "s2", "pos": pos(12, 12), "energy": 1500}
                    ],
                    "constructionSites": [{"id": "cs1", "pos": pos(31, 31),
                                           "structureType": "road", "progressTotal": 300}],
                    "hostileCreeps": [{"id": "x1", "pos": pos(40, 5), "hits": 100,
                                       "body": ["attack"]}],
                    "droppedResources": [{"id": "d1", "pos": pos(26, 26), "amount": 120}],
                    "structures": [{"id": "ct1", "structureType": "container",
                                    "pos": pos(22, 22), "store": {"energy": 400}}]
                }
            }
        }
    });
    serde_json::from_value(raw).unwrap()
}

/// The journal without tick numbers; the mirrored host's clock stands still.
fn actions<W: WorldState>(world: &ActionJournal<W>) -> Vec<(EntityId, Verb, EntityId, i32)> {
    world
        .entries()
        .iter()
        .map(|e| (e.agent.clone(), e.verb, e.target.clone(), e.outcome.raw()))
        .collect()
}

#[test]
fn live_and_replay_issue_the_same_actions() {
    let mut config = ColonyConfig::default();
    // u1 carries no role; both sessions must default it the same way.
    config.dispatcher.default_role = colony_types::Role::Builder;

    let live = ActionJournal::new(LiveWorld::new(MirrorHost::new(snapshot())));
    let replay = ActionJournal::new(ReplayWorld::from_snapshot(snapshot()));
    let mut live = Dispatcher::new(live, &config);
    let mut replay = Dispatcher::new(replay, &config);

    for _ in 0..5 {
        let a = live.run_tick().unwrap();
        let b = replay.run_tick().unwrap();
        assert_eq!(a.processed, b.processed);
        assert_eq!(a.failed, b.failed);
        assert_eq!(a.states, b.states);
        assert_eq!(a.reaped, b.reaped);
    }

    let live_actions = actions(live.world());
    let replay_actions = actions(replay.world());
    assert!(!live_actions.is_empty());
    assert_eq!(live_actions, replay_actions);

    let live_memory = live.world().load_memory().unwrap();
    let replay_memory = replay.world().load_memory().unwrap();
    for name in ["h1", "h2", "k1", "b1", "a1", "r1", "u1"] {
        assert_eq!(
            live_memory.creeps.get(name),
            replay_memory.creeps.get(name),
            "memory of {name} diverged"
        );
    }
    assert!(!live_memory.creeps.contains_key("ghost"));
    assert!(live_memory.other.contains_key("rooms"));
}

#[test]
fn replay_never_moves_anything() {
    let config = ColonyConfig::default();
    let mut replay = Dispatcher::new(ReplayWorld::from_snapshot(snapshot()), &config);
    for _ in 0..3 {
        replay.run_tick().unwrap();
    }
    let world = replay.into_world();
    let h1 = world.resolve(&EntityId::from("c-h1")).unwrap();
    assert_eq!(h1.pos, Position::new(10, 10, "W1N1"));
    assert_eq!(world.time(), 9003);
}
