#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pairwise contact detection between two actor groups.
//!
//! The system only reports which actors touch; the world decides how contacts
//! translate into damage.

use sky_battle_core::{ActorId, ActorSnapshot};

/// Pair of actors whose bounds intersect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contact {
    /// Actor drawn from the first group.
    pub first: ActorId,
    /// Actor drawn from the second group.
    pub second: ActorId,
}

/// Stateless detector that reports every intersecting pair between two groups.
#[derive(Debug, Default)]
pub struct Collisions;

impl Collisions {
    /// Creates a new detector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits a contact for every pair `(a, b)` with `a` in `first`, `b` in
    /// `second`, and intersecting bounds.
    ///
    /// Pairs are emitted in order of the second group, then of the first.
    /// Destroyed actors still take part; applying damage to them is a no-op.
    pub fn detect(
        &self,
        first: &[ActorSnapshot],
        second: &[ActorSnapshot],
        out: &mut Vec<Contact>,
    ) {
        for other in second {
            for actor in first {
                if actor.bounds.intersects(&other.bounds) {
                    out.push(Contact {
                        first: actor.id,
                        second: other.id,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collisions, Contact};
    use sky_battle_core::{ActorId, ActorKind, ActorSnapshot, Bounds, Point, Size};

    fn snapshot(id: u32, kind: ActorKind, x: f32, y: f32) -> ActorSnapshot {
        ActorSnapshot {
            id: ActorId::new(id),
            kind,
            bounds: Bounds::from_origin_and_size(Point::new(x, y), Size::new(10.0, 10.0)),
            health: None,
            destroyed: false,
        }
    }

    #[test]
    fn reports_only_intersecting_pairs() {
        let shots = [
            snapshot(1, ActorKind::UserProjectile, 0.0, 0.0),
            snapshot(2, ActorKind::UserProjectile, 100.0, 100.0),
        ];
        let enemies = [snapshot(3, ActorKind::EnemyPlane, 5.0, 5.0)];

        let mut contacts = Vec::new();
        Collisions::new().detect(&shots, &enemies, &mut contacts);

        assert_eq!(
            contacts,
            vec![Contact {
                first: ActorId::new(1),
                second: ActorId::new(3),
            }]
        );
    }

    #[test]
    fn orders_contacts_by_second_group_first() {
        let shots = [
            snapshot(1, ActorKind::UserProjectile, 0.0, 0.0),
            snapshot(2, ActorKind::UserProjectile, 2.0, 2.0),
        ];
        let enemies = [
            snapshot(3, ActorKind::EnemyPlane, 4.0, 4.0),
            snapshot(4, ActorKind::EnemyPlane, 1.0, 1.0),
        ];

        let mut contacts = Vec::new();
        Collisions::new().detect(&shots, &enemies, &mut contacts);

        let pairs: Vec<(u32, u32)> = contacts
            .iter()
            .map(|contact| (contact.first.get(), contact.second.get()))
            .collect();
        assert_eq!(pairs, vec![(1, 3), (2, 3), (1, 4), (2, 4)]);
    }

    #[test]
    fn empty_groups_produce_no_contacts() {
        let mut contacts = Vec::new();
        Collisions::new().detect(&[], &[snapshot(1, ActorKind::Boss, 0.0, 0.0)], &mut contacts);
        assert!(contacts.is_empty());
    }
}
