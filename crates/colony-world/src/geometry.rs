//! Chebyshev geometry shared by both world backends.
//!
//! Movement in the host is eight-directional, so the distance between two
//! tiles is `max(|dx|, |dy|)`. Positions in different rooms have no
//! defined distance and never count as nearest.

use colony_types::{Entity, Position};

/// Chebyshev distance, `None` across rooms.
pub fn range(a: &Position, b: &Position) -> Option<u32> {
    a.range_to(b)
}

/// Whether `b` is within one tile of `a`.
pub fn is_near(a: &Position, b: &Position) -> bool {
    a.is_near_to(b)
}

/// The candidate closest to `origin`.
///
/// Ties go to whichever candidate came first, so the result depends only on
/// the enumeration order of `candidates`.
pub fn nearest<I>(origin: &Position, candidates: I) -> Option<Entity>
where
    I: IntoIterator<Item = Entity>,
{
    let mut best: Option<(u32, Entity)> = None;
    for candidate in candidates {
        let Some(distance) = range(origin, &candidate.pos) else {
            continue;
        };
        let closer = best.as_ref().is_none_or(|(best_distance, _)| distance < *best_distance);
        if closer {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, entity)| entity)
}

#[cfg(test)]
mod tests {
    use colony_types::{EntityId, EntityKind, SourceData};

    use super::*;

    fn source(id: &str, x: u32, y: u32, room: &str) -> Entity {
        Entity {
            id: EntityId::from(id),
            pos: Position::new(x, y, room),
            kind: EntityKind::Source(SourceData {
                energy: 100,
                energy_capacity: 3000,
            }),
        }
    }

    #[test]
    fn picks_closest() {
        let origin = Position::new(10, 10, "W1N1");
        let found = nearest(
            &origin,
            vec![source("far", 20, 20, "W1N1"), source("near", 12, 11, "W1N1")],
        );
        assert_eq!(found.map(|e| e.id), Some(EntityId::from("near")));
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let origin = Position::new(10, 10, "W1N1");
        let found = nearest(
            &origin,
            vec![source("first", 13, 10, "W1N1"), source("second", 7, 10, "W1N1")],
        );
        assert_eq!(found.map(|e| e.id), Some(EntityId::from("first")));
    }

    #[test]
    fn other_rooms_are_ignored() {
        let origin = Position::new(10, 10, "W1N1");
        let found = nearest(&origin, vec![source("elsewhere", 10, 10, "W2N1")]);
        assert!(found.is_none());
    }

    #[test]
    fn diagonal_is_adjacent() {
        let a = Position::new(5, 5, "W1N1");
        assert!(is_near(&a, &Position::new(6, 6, "W1N1")));
        assert_eq!(range(&a, &Position::new(8, 1, "W1N1")), Some(4));
    }
}
