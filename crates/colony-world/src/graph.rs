//! Immutable object graph reconstructed from a snapshot.
//!
//! Built once per replay session. Every object gets one [`Entity`] keyed by
//! id, with store capacity filled in by [`capacity`](crate::capacity).
//! Rooms index their contents so `find` answers without scanning the whole
//! graph. Enumeration order is fixed: creeps by name, structures by id,
//! room lists in capture order.

use std::collections::BTreeMap;

use colony_types::{
    BodyEntry, BodyPart, ControllerData, CreepData, CreepRecord, DroppedResource, Entity,
    EntityId, EntityKind, FindCategory, RoomInfo, RoomName, SiteData, Snapshot,
    SourceData, Store, StructureData, StructureRecord, StructureType,
};
use tracing::debug;

use crate::capacity;

#[derive(Debug, Clone, Default)]
struct RoomIndex {
    energy_available: Option<u32>,
    energy_capacity_available: Option<u32>,
    sources: Vec<EntityId>,
    construction_sites: Vec<EntityId>,
    hostile_creeps: Vec<EntityId>,
    dropped_resources: Vec<EntityId>,
    structures: Vec<EntityId>,
    controller: Option<EntityId>,
    storage: Option<EntityId>,
}

/// Every object of a snapshot, indexed for replay queries.
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    objects: BTreeMap<EntityId, Entity>,
    creeps: BTreeMap<String, EntityId>,
    spawns: BTreeMap<String, EntityId>,
    rooms: BTreeMap<RoomName, RoomIndex>,
}

impl ObjectGraph {
    /// Build the graph from a snapshot.
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut graph = Self::default();
        let game = &snapshot.game;

        for (name, record) in &game.creeps {
            let entity = creep_entity(name, record, true);
            graph.creeps.insert(name.clone(), entity.id.clone());
            graph.insert(entity);
        }

        for record in game.structures.values() {
            graph.insert(structure_entity(record));
        }

        for (name, record) in &game.spawns {
            let spawn_name = record.name.clone().unwrap_or_else(|| name.clone());
            if let Some(existing) = graph.objects.get_mut(&record.id) {
                if let EntityKind::Structure(structure) = &mut existing.kind {
                    // Game.spawns only lists own spawns.
                    structure.my = Some(true);
                    structure.name = Some(spawn_name.clone());
                    structure.spawning = record.spawning;
                    if structure.store.is_none() {
                        structure.store = record.store.clone().map(|mut store| {
                            capacity::fill_structure(&mut store, StructureType::Spawn);
                            store
                        });
                    }
                }
            } else {
                let mut store = record.store.clone().unwrap_or_default();
                capacity::fill_structure(&mut store, StructureType::Spawn);
                graph.insert(Entity {
                    id: record.id.clone(),
                    pos: record.pos.clone(),
                    kind: EntityKind::Structure(StructureData {
                        structure_type: StructureType::Spawn,
                        my: Some(true),
                        name: Some(spawn_name.clone()),
                        hits: record.hits,
                        hits_max: None,
                        store: Some(store),
                        spawning: record.spawning,
                    }),
                });
            }
            graph.spawns.insert(spawn_name, record.id.clone());
        }

        for (name, record) in &game.rooms {
            let room_name = record.name.clone().unwrap_or_else(|| RoomName::from(name.as_str()));
            let mut index = RoomIndex {
                energy_available: record.energy_available,
                energy_capacity_available: record.energy_capacity_available,
                ..RoomIndex::default()
            };

            for source in &record.sources {
                index.sources.push(source.id.clone());
                graph.insert(Entity {
                    id: source.id.clone(),
                    pos: source.pos.clone(),
                    kind: EntityKind::Source(SourceData {
                        energy: source.energy,
                        energy_capacity: source.energy_capacity,
                    }),
                });
            }
            for site in &record.construction_sites {
                index.construction_sites.push(site.id.clone());
                graph.insert(Entity {
                    id: site.id.clone(),
                    pos: site.pos.clone(),
                    kind: EntityKind::ConstructionSite(SiteData {
                        structure_type: site.structure_type,
                        progress: site.progress,
                        progress_total: site.progress_total,
                    }),
                });
            }
            for hostile in &record.hostile_creeps {
                let name = hostile.name.clone().unwrap_or_else(|| hostile.id.to_string());
                index.hostile_creeps.push(hostile.id.clone());
                graph.insert(creep_entity(&name, hostile, false));
            }
            for pile in &record.dropped_resources {
                index.dropped_resources.push(pile.id.clone());
                graph.insert(Entity {
                    id: pile.id.clone(),
                    pos: pile.pos.clone(),
                    kind: EntityKind::Resource(DroppedResource {
                        resource_type: pile.resource_type,
                        amount: pile.amount,
                    }),
                });
            }
            for structure in &record.structures {
                if !graph.objects.contains_key(&structure.id) {
                    graph.insert(structure_entity(structure));
                }
            }
            if let Some(controller) = &record.controller {
                index.controller = Some(controller.id.clone());
                graph.insert(Entity {
                    id: controller.id.clone(),
                    pos: controller.pos.clone(),
                    kind: EntityKind::Controller(ControllerData {
                        level: controller.level,
                        my: controller.my,
                    }),
                });
            }
            if let Some(storage) = &record.storage {
                index.storage = Some(storage.id.clone());
                if !graph.objects.contains_key(&storage.id) {
                    let mut store = storage.store.clone().unwrap_or_default();
                    capacity::fill_structure(&mut store, StructureType::Storage);
                    graph.insert(Entity {
                        id: storage.id.clone(),
                        pos: storage.pos.clone(),
                        kind: EntityKind::Structure(StructureData {
                            structure_type: StructureType::Storage,
                            my: Some(true),
                            name: None,
                            hits: None,
                            hits_max: None,
                            store: Some(store),
                            spawning: false,
                        }),
                    });
                }
            }
            graph.rooms.insert(room_name, index);
        }

        // Structures are indexed last so spawns, storage and room-level
        // containers are all present. BTreeMap iteration keeps id order.
        let structures: Vec<(RoomName, EntityId)> = graph
            .objects
            .values()
            .filter(|entity| entity.as_structure().is_some())
            .map(|entity| (entity.pos.room_name.clone(), entity.id.clone()))
            .collect();
        for (room, id) in structures {
            graph.rooms.entry(room).or_default().structures.push(id);
        }

        debug!(
            objects = graph.objects.len(),
            creeps = graph.creeps.len(),
            rooms = graph.rooms.len(),
            "object graph built"
        );
        graph
    }

    fn insert(&mut self, entity: Entity) {
        self.objects.insert(entity.id.clone(), entity);
    }

    /// Look up any object.
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.objects.get(id)
    }

    /// Own creeps in name order.
    pub fn creeps(&self) -> impl Iterator<Item = &Entity> {
        self.creeps.values().filter_map(|id| self.objects.get(id))
    }

    /// Whether an own creep with this name exists.
    pub fn has_creep(&self, name: &str) -> bool {
        self.creeps.contains_key(name)
    }

    /// An own spawn by name.
    pub fn spawn(&self, name: &str) -> Option<&Entity> {
        self.spawns.get(name).and_then(|id| self.objects.get(id))
    }

    /// Number of objects in the graph.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Room metadata. Energy totals fall back to the sum over spawns and
    /// extensions when the capture omitted them.
    pub fn room(&self, name: &RoomName) -> Option<RoomInfo> {
        let index = self.rooms.get(name)?;
        let energy_structures = || {
            index
                .structures
                .iter()
                .filter_map(|id| self.objects.get(id))
                .filter(|entity| {
                    entity.is_structure_of(&[StructureType::Spawn, StructureType::Extension])
                })
        };
        let energy_available = index.energy_available.unwrap_or_else(|| {
            energy_structures().fold(0_u32, |total, entity| total.saturating_add(entity.energy()))
        });
        let energy_capacity_available = index.energy_capacity_available.unwrap_or_else(|| {
            energy_structures().fold(0_u32, |total, entity| {
                let capacity = entity.store().and_then(Store::capacity).unwrap_or(0);
                total.saturating_add(capacity)
            })
        });
        Some(RoomInfo {
            name: name.clone(),
            energy_available,
            energy_capacity_available,
            controller: index.controller.clone(),
            storage: index.storage.clone(),
        })
    }

    /// Objects of `category` in `room`, `None` for categories a snapshot
    /// does not capture.
    pub fn find(&self, room: &RoomName, category: FindCategory) -> Option<Vec<Entity>> {
        let Some(index) = self.rooms.get(room) else {
            return match category {
                FindCategory::Minerals | FindCategory::Tombstones | FindCategory::Flags => None,
                _ => Some(self.creeps_in(room, category)),
            };
        };
        let ids: &[EntityId] = match category {
            FindCategory::MyCreeps => return Some(self.creeps_in(room, category)),
            FindCategory::HostileCreeps => &index.hostile_creeps,
            FindCategory::Sources | FindCategory::SourcesActive => &index.sources,
            FindCategory::DroppedResources => &index.dropped_resources,
            FindCategory::Structures | FindCategory::MySpawns => &index.structures,
            FindCategory::ConstructionSites => &index.construction_sites,
            FindCategory::Minerals | FindCategory::Tombstones | FindCategory::Flags => {
                return None;
            }
        };
        let found = ids
            .iter()
            .filter_map(|id| self.objects.get(id))
            .filter(|entity| match category {
                FindCategory::SourcesActive => entity.energy() > 0,
                FindCategory::MySpawns => {
                    entity.is_structure_of(&[StructureType::Spawn]) && entity.is_mine()
                }
                _ => true,
            })
            .cloned()
            .collect();
        Some(found)
    }

    fn creeps_in(&self, room: &RoomName, category: FindCategory) -> Vec<Entity> {
        if category != FindCategory::MyCreeps {
            return Vec::new();
        }
        self.creeps()
            .filter(|creep| creep.pos.room_name == *room)
            .cloned()
            .collect()
    }
}

fn creep_entity(name: &str, record: &CreepRecord, own: bool) -> Entity {
    let body: Vec<BodyPart> = record.body.iter().copied().map(BodyEntry::part).collect();
    let mut store = record.store.clone();
    capacity::fill_creep(&mut store, &body);
    Entity {
        id: record.id.clone(),
        pos: record.pos.clone(),
        kind: EntityKind::Creep(CreepData {
            name: record.name.clone().unwrap_or_else(|| String::from(name)),
            my: record.my.unwrap_or(own),
            owner: record.owner.clone(),
            ticks_to_live: record.ticks_to_live,
            hits: record.hits,
            hits_max: record.hits_max,
            body,
            store,
            spawning: record.spawning,
        }),
    }
}

fn structure_entity(record: &StructureRecord) -> Entity {
    let store = record.store.clone().map(|mut store| {
        capacity::fill_structure(&mut store, record.structure_type);
        store
    });
    // Energy-bearing structures without a captured store still get an
    // empty one so transfers into them can be judged.
    let store = store.or_else(|| {
        capacity::structure_default(record.structure_type).map(Store::with_capacity)
    });
    Entity {
        id: record.id.clone(),
        pos: record.pos.clone(),
        kind: EntityKind::Structure(StructureData {
            structure_type: record.structure_type,
            my: record.my,
            name: None,
            hits: record.hits,
            hits_max: record.hits_max,
            store,
            spawning: false,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::ResourceKind;

    use super::*;

    fn snapshot() -> Snapshot {
        let raw = serde_json::json!({
            "tick": 100,
            "memory": {},
            "game": {
                "creeps": {
                    "h1": {"id": "c1", "pos": {"x": 10, "y": 10, "roomName": "W1N1"},
                           "store": {"energy": 0}, "body": ["work", "carry", "move"],
                           "ticksToLive": 1200}
                },
                "structures": {
                    "sp1": {"id": "sp1", "structureType": "spawn",
                            "pos": {"x": 20, "y": 20, "roomName": "W1N1"},
                            "store": {"energy": 200}, "my": true},
                    "ex1": {"id": "ex1", "structureType": "extension",
                            "pos": {"x": 21, "y": 20, "roomName": "W1N1"},
                            "store": {"energy": 50}, "my": true}
                },
                "spawns": {
                    "Spawn1": {"id": "sp1", "pos": {"x": 20, "y": 20, "roomName": "W1N1"},
                               "store": {"energy": 200}, "spawning": null}
                },
                "rooms": {
                    "W1N1": {
                        "sources": [
                            {"id": "s1", "pos": {"x": 5, "y": 5, "roomName": "W1N1"}, "energy": 0, "energyCapacity": 3000},
                            {"id": "s2", "pos": {"x": 30, "y": 5, "roomName": "W1N1"}, "energy": 1500, "energyCapacity": 3000}
                        ],
                        "constructionSites": [],
                        "hostileCreeps": [],
                        "structures": [
                            {"id": "ct1", "structureType": "container",
                             "pos": {"x": 6, "y": 6, "roomName": "W1N1"}, "store": {"energy": 500}}
                        ]
                    }
                }
            }
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn spawns_merge_into_structures() {
        let graph = ObjectGraph::build(&snapshot());
        let spawn = graph.spawn("Spawn1").cloned();
        let spawn = spawn.and_then(|entity| entity.as_structure().cloned());
        assert_eq!(spawn.as_ref().and_then(|s| s.name.clone()).as_deref(), Some("Spawn1"));
        assert_eq!(spawn.and_then(|s| s.store).and_then(|s| s.capacity()), Some(300));
    }

    #[test]
    fn listed_spawn_is_owned_without_an_ownership_flag() {
        let raw = serde_json::json!({
            "tick": 1,
            "memory": {},
            "game": {
                "structures": {
                    "sp1": {"id": "sp1", "structureType": "spawn",
                            "pos": {"x": 20, "y": 20, "roomName": "W1N1"},
                            "store": {"energy": 200}}
                },
                "spawns": {
                    "Spawn1": {"id": "sp1", "pos": {"x": 20, "y": 20, "roomName": "W1N1"}}
                },
                "rooms": {"W1N1": {}}
            }
        });
        let graph = ObjectGraph::build(&serde_json::from_value(raw).unwrap());
        let spawns = graph
            .find(&RoomName::from("W1N1"), FindCategory::MySpawns)
            .unwrap_or_default();
        assert_eq!(spawns.len(), 1);
        assert!(spawns.iter().all(Entity::is_mine));
    }

    #[test]
    fn active_sources_skip_depleted() {
        let graph = ObjectGraph::build(&snapshot());
        let room = RoomName::from("W1N1");
        let all = graph.find(&room, FindCategory::Sources).unwrap_or_default();
        let active = graph.find(&room, FindCategory::SourcesActive).unwrap_or_default();
        assert_eq!(all.len(), 2);
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().map(|e| e.id.as_str()), Some("s2"));
    }

    #[test]
    fn structures_include_room_containers_in_id_order() {
        let graph = ObjectGraph::build(&snapshot());
        let found = graph
            .find(&RoomName::from("W1N1"), FindCategory::Structures)
            .unwrap_or_default();
        let ids: Vec<&str> = found.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ct1", "ex1", "sp1"]);
    }

    #[test]
    fn unsupported_categories_are_none() {
        let graph = ObjectGraph::build(&snapshot());
        assert!(graph.find(&RoomName::from("W1N1"), FindCategory::Minerals).is_none());
        assert!(graph.find(&RoomName::from("W1N1"), FindCategory::Flags).is_none());
    }

    #[test]
    fn room_energy_sums_when_missing() {
        let graph = ObjectGraph::build(&snapshot());
        let room = graph.room(&RoomName::from("W1N1"));
        assert_eq!(room.as_ref().map(|r| r.energy_available), Some(250));
        assert_eq!(room.map(|r| r.energy_capacity_available), Some(350));
    }

    #[test]
    fn creep_capacity_from_body() {
        let graph = ObjectGraph::build(&snapshot());
        let creep = graph.get(&EntityId::from("c1"));
        assert_eq!(creep.map(Entity::free_energy), Some(50));
        assert_eq!(
            creep.and_then(Entity::store).map(|s| s.used(ResourceKind::Energy)),
            Some(0)
        );
    }
}
