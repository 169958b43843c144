//! Integration tests for the live backend.
//!
//! A scripted [`Host`] stands in for the game binding. The tests check that
//! [`LiveWorld`] passes raw codes through untouched, parses and writes the
//! memory blob, and degrades unsupported queries to empty results.

#![allow(clippy::unwrap_used)]

use std::cell::Cell;
use std::collections::BTreeMap;

use colony_types::{
    ActionParams, BodyPart, CreepData, CreepMemory, Entity, EntityId, EntityKind, FindCategory,
    OutcomeCode, Position, RoomInfo, RoomName, SourceData, Store, Verb, WorldMode,
};
use colony_world::{Host, LiveWorld, WorldState, any};

#[derive(Default)]
struct ScriptedHost {
    objects: BTreeMap<EntityId, Entity>,
    next_code: i32,
    raw_memory: String,
    said: Vec<String>,
    finds: Cell<u32>,
}

impl ScriptedHost {
    fn with_source(mut self, id: &str, x: u32, y: u32, energy: u32) -> Self {
        let entity = Entity {
            id: EntityId::from(id),
            pos: Position::new(x, y, "W1N1"),
            kind: EntityKind::Source(SourceData {
                energy,
                energy_capacity: 3000,
            }),
        };
        self.objects.insert(entity.id.clone(), entity);
        self
    }

    fn with_creep(mut self, id: &str, name: &str) -> Self {
        let entity = Entity {
            id: EntityId::from(id),
            pos: Position::new(10, 10, "W1N1"),
            kind: EntityKind::Creep(CreepData {
                name: String::from(name),
                my: true,
                owner: None,
                ticks_to_live: Some(1000),
                hits: Some(300),
                hits_max: Some(300),
                body: vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
                store: Store::with_capacity(50),
                spawning: false,
            }),
        };
        self.objects.insert(entity.id.clone(), entity);
        self
    }
}

impl Host for ScriptedHost {
    fn time(&self) -> u64 {
        42
    }

    fn get_object_by_id(&self, id: &EntityId) -> Option<Entity> {
        self.objects.get(id).cloned()
    }

    fn room_find(&self, room: &RoomName, category: FindCategory) -> Option<Vec<Entity>> {
        self.finds.set(self.finds.get().saturating_add(1));
        let in_room = self.objects.values().filter(|e| e.pos.room_name == *room);
        match category {
            FindCategory::Sources => Some(in_room.filter(|e| e.is_source()).cloned().collect()),
            FindCategory::SourcesActive => Some(
                in_room
                    .filter(|e| e.is_source() && e.energy() > 0)
                    .cloned()
                    .collect(),
            ),
            _ => None,
        }
    }

    fn creeps(&self) -> Vec<Entity> {
        self.objects
            .values()
            .filter(|e| e.as_creep().is_some())
            .cloned()
            .collect()
    }

    fn spawn(&self, _name: &str) -> Option<Entity> {
        None
    }

    fn room(&self, _name: &RoomName) -> Option<RoomInfo> {
        None
    }

    fn creep_action(
        &mut self,
        _creep: &EntityId,
        _verb: Verb,
        _target: &EntityId,
        _params: ActionParams,
    ) -> i32 {
        self.next_code
    }

    fn spawn_creep(
        &mut self,
        _spawn: &EntityId,
        _body: &[BodyPart],
        _name: &str,
        _memory: &CreepMemory,
    ) -> i32 {
        -4
    }

    fn say(&mut self, _creep: &EntityId, message: &str) {
        self.said.push(String::from(message));
    }

    fn raw_memory(&self) -> String {
        self.raw_memory.clone()
    }

    fn set_raw_memory(&mut self, raw: String) {
        self.raw_memory = raw;
    }
}

#[test]
fn raw_codes_pass_through() {
    let host = ScriptedHost {
        next_code: -9,
        ..ScriptedHost::default()
    };
    let mut world = LiveWorld::new(host);
    let code = world.act(
        &EntityId::from("c1"),
        Verb::Harvest,
        &EntityId::from("s1"),
        ActionParams::none(),
    );
    assert_eq!(code, OutcomeCode::NotInRange);
    assert_eq!(world.mode(), WorldMode::Live);
    assert_eq!(world.time(), 42);

    world.say(&EntityId::from("c1"), "⛏️");
    assert_eq!(world.host().said, vec![String::from("⛏️")]);
}

#[test]
fn unknown_codes_are_not_coerced() {
    let host = ScriptedHost {
        next_code: -14,
        ..ScriptedHost::default()
    };
    let mut world = LiveWorld::new(host);
    let code = world.act(
        &EntityId::from("c1"),
        Verb::Move,
        &EntityId::from("s1"),
        ActionParams::none(),
    );
    assert_eq!(code, OutcomeCode::Unrecognized(-14));
}

#[test]
fn empty_memory_blob_is_default() {
    let world = LiveWorld::new(ScriptedHost::default());
    let memory = world.load_memory().unwrap();
    assert!(memory.creeps.is_empty());
}

#[test]
fn memory_roundtrips_through_host() {
    let host = ScriptedHost {
        raw_memory: String::from(r#"{"creeps":{"h1":{"role":"harvester","hint":3}},"rooms":{}}"#),
        ..ScriptedHost::default()
    };
    let mut world = LiveWorld::new(host);
    let mut memory = world.load_memory().unwrap();
    if let Some(creep) = memory.creeps.get_mut("h1") {
        creep.target = Some(EntityId::from("s1"));
    }
    world.store_memory(&memory).unwrap();

    let raw = world.host().raw_memory();
    assert!(raw.contains(r#""target":"s1""#));
    assert!(raw.contains(r#""hint":3"#));
    assert!(raw.contains(r#""rooms""#));
}

#[test]
fn malformed_memory_is_an_error() {
    let host = ScriptedHost {
        raw_memory: String::from("{not json"),
        ..ScriptedHost::default()
    };
    let world = LiveWorld::new(host);
    assert!(world.load_memory().is_err());
}

#[test]
fn unsupported_category_degrades_to_empty() {
    let world = LiveWorld::new(ScriptedHost::default().with_source("s1", 5, 5, 100));
    let found = world.find_all(&RoomName::from("W1N1"), FindCategory::Minerals, &any);
    assert!(found.is_empty());
}

#[test]
fn nearest_uses_host_ordering_and_filter() {
    let host = ScriptedHost::default()
        .with_source("far", 40, 40, 100)
        .with_source("dry", 11, 11, 0)
        .with_source("near", 14, 10, 100);
    let world = LiveWorld::new(host);
    let origin = Position::new(10, 10, "W1N1");
    let found = world.find_nearest(&origin, FindCategory::SourcesActive, &any);
    assert_eq!(found.map(|e| e.id), Some(EntityId::from("near")));

    let big = |e: &Entity| e.energy() > 1000;
    assert!(world.find_nearest(&origin, FindCategory::Sources, &big).is_none());
}

#[test]
fn unsupported_category_has_no_nearest() {
    let world = LiveWorld::new(ScriptedHost::default().with_source("s1", 5, 5, 100));
    let origin = Position::new(10, 10, "W1N1");

    assert!(world.find_nearest(&origin, FindCategory::Minerals, &any).is_none());
    // The miss is checked against the room listing so it can be reported.
    assert_eq!(world.host().finds.get(), 2);

    let found = world.find_nearest(&origin, FindCategory::Sources, &any);
    assert_eq!(found.map(|e| e.id), Some(EntityId::from("s1")));
    assert_eq!(world.host().finds.get(), 3);
}

#[test]
fn boxed_host_is_a_host() {
    let host: Box<dyn Host> = Box::new(ScriptedHost::default().with_creep("c1", "h1"));
    let mut world = LiveWorld::new(host);
    assert_eq!(world.creeps().len(), 1);
    assert!(world.resolve(&EntityId::from("c1")).is_some());
    assert!(world.resolve(&EntityId::from("gone")).is_none());
    world.say(&EntityId::from("c1"), "hi");
    let code = world.spawn_creep(
        &EntityId::from("sp"),
        &[BodyPart::Move],
        "x",
        &CreepMemory::default(),
    );
    assert_eq!(code, OutcomeCode::Busy);
}
