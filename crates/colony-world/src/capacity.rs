//! Store capacity fallback for captures that omit it.
//!
//! Snapshots taken from the console often carry only the amounts held. The
//! replay backend fills the gap once, at graph-build time, in this order:
//!
//! 1. explicit `capacity` / `energyCapacity`
//! 2. amount held plus the captured `freeCapacity`
//! 3. creep body: 50 per `CARRY` part
//! 4. structure-type default
//! 5. [`GENERIC_CAPACITY`]
//!
//! The result is a plausible guess. Replay outcomes that depend on it
//! (`Full`, the harvester's delivering flip) are only as good as the guess.

use colony_types::{BodyPart, Store, StructureType};

/// Capacity of one `CARRY` part.
pub const CARRY_CAPACITY: u32 = 50;

/// Last-resort capacity when nothing else is known.
pub const GENERIC_CAPACITY: u32 = 2000;

/// Default capacity for structure types whose size is fixed by the host.
pub const fn structure_default(structure_type: StructureType) -> Option<u32> {
    match structure_type {
        StructureType::Spawn => Some(300),
        StructureType::Extension => Some(50),
        StructureType::Tower => Some(1000),
        StructureType::Container => Some(2000),
        StructureType::Storage => Some(1_000_000),
        StructureType::Link => Some(800),
        StructureType::Terminal => Some(300_000),
        _ => None,
    }
}

/// Carry capacity implied by a body; `None` when the body is unknown.
pub fn body_capacity(body: &[BodyPart]) -> Option<u32> {
    if body.is_empty() {
        return None;
    }
    let carry_parts = body.iter().filter(|part| **part == BodyPart::Carry).count();
    let carry_parts = u32::try_from(carry_parts).unwrap_or(u32::MAX);
    Some(carry_parts.saturating_mul(CARRY_CAPACITY))
}

fn from_metadata(store: &Store) -> Option<u32> {
    store.capacity().or_else(|| {
        store
            .free_hint()
            .map(|free| free.saturating_add(store.total_used()))
    })
}

/// Fill in a creep store's capacity.
pub fn fill_creep(store: &mut Store, body: &[BodyPart]) {
    let capacity = from_metadata(store)
        .or_else(|| body_capacity(body))
        .unwrap_or(GENERIC_CAPACITY);
    store.set_capacity(capacity);
}

/// Fill in a structure store's capacity.
pub fn fill_structure(store: &mut Store, structure_type: StructureType) {
    let capacity = from_metadata(store)
        .or_else(|| structure_default(structure_type))
        .unwrap_or(GENERIC_CAPACITY);
    store.set_capacity(capacity);
}

#[cfg(test)]
mod tests {
    use colony_types::ResourceKind;

    use super::*;

    #[test]
    fn explicit_capacity_wins() {
        let mut store = Store::with_capacity(77);
        fill_structure(&mut store, StructureType::Spawn);
        assert_eq!(store.capacity(), Some(77));
    }

    #[test]
    fn free_hint_is_second() {
        let mut store: Store =
            serde_json::from_str(r#"{"energy": 30, "freeCapacity": 70}"#).unwrap_or_default();
        fill_creep(&mut store, &[BodyPart::Carry]);
        assert_eq!(store.capacity(), Some(100));
    }

    #[test]
    fn creep_capacity_from_carry_parts() {
        let mut store = Store::new().holding(ResourceKind::Energy, 10);
        fill_creep(
            &mut store,
            &[BodyPart::Work, BodyPart::Carry, BodyPart::Carry, BodyPart::Move],
        );
        assert_eq!(store.capacity(), Some(100));
        assert_eq!(store.free(ResourceKind::Energy), 90);
    }

    #[test]
    fn creep_without_body_uses_generic() {
        let mut store = Store::new();
        fill_creep(&mut store, &[]);
        assert_eq!(store.capacity(), Some(GENERIC_CAPACITY));
    }

    #[test]
    fn structure_defaults() {
        let mut store = Store::new();
        fill_structure(&mut store, StructureType::Extension);
        assert_eq!(store.capacity(), Some(50));

        let mut store = Store::new();
        fill_structure(&mut store, StructureType::Lab);
        assert_eq!(store.capacity(), Some(GENERIC_CAPACITY));
    }
}
