//! Backend selection at session start.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use colony_core::{ReplayConfig, SessionError, select_world};
use colony_types::{
    ActionParams, BodyPart, CreepMemory, Entity, EntityId, FindCategory, RoomInfo, RoomName,
    Verb, WorldMode,
};
use colony_world::{Host, WorldState};

/// A host with nothing in it.
struct EmptyHost;

impl Host for EmptyHost {
    fn time(&self) -> u64 {
        7
    }

    fn get_object_by_id(&self, _id: &EntityId) -> Option<Entity> {
        None
    }

    fn room_find(&self, _room: &RoomName, _category: FindCategory) -> Option<Vec<Entity>> {
        Some(Vec::new())
    }

    fn creeps(&self) -> Vec<Entity> {
        Vec::new()
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
        0
    }

    fn spawn_creep(
        &mut self,
        _spawn: &EntityId,
        _body: &[BodyPart],
        _name: &str,
        _memory: &CreepMemory,
    ) -> i32 {
        0
    }

    fn raw_memory(&self) -> String {
        String::new()
    }

    fn set_raw_memory(&mut self, _raw: String) {}
}

fn replay_at(path: PathBuf) -> ReplayConfig {
    ReplayConfig {
        enabled: true,
        snapshot_path: path,
        ticks: 1,
    }
}

fn missing() -> PathBuf {
    PathBuf::from("/nonexistent/colony/debug_state.json")
}

#[test]
fn replay_loads_a_captured_line() {
    let path = std::env::temp_dir().join(format!("colony-session-{}.log", std::process::id()));
    std::fs::write(
        &path,
        r#"[tick] DEBUG_STATE_JSON: {"tick": 77, "memory": {"creeps": {}}, "game": {}}"#,
    )
    .unwrap();

    let world = select_world(&replay_at(path.clone()), None).unwrap();
    assert_eq!(world.mode(), WorldMode::Replay);
    assert_eq!(world.time(), 77);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn missing_snapshot_falls_back_to_live() {
    let world = select_world(&replay_at(missing()), Some(Box::new(EmptyHost))).unwrap();
    assert_eq!(world.mode(), WorldMode::Live);
    assert_eq!(world.time(), 7);
}

#[test]
fn missing_snapshot_without_host_halts() {
    let result = select_world(&replay_at(missing()), None);
    assert!(matches!(result, Err(SessionError::Snapshot { .. })));
}

#[test]
fn corrupt_snapshot_without_host_halts() {
    let path = std::env::temp_dir().join(format!("colony-corrupt-{}.json", std::process::id()));
    std::fs::write(&path, "{\"tick\": ").unwrap();
    let result = select_world(&replay_at(path.clone()), None);
    assert!(matches!(result, Err(SessionError::Snapshot { .. })));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn live_needs_a_host() {
    let config = ReplayConfig::default();
    assert!(matches!(select_world(&config, None), Err(SessionError::NoHost)));

    let world = select_world(&config, Some(Box::new(EmptyHost))).unwrap();
    assert_eq!(world.mode(), WorldMode::Live);
}
