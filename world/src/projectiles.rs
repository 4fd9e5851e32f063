//! Straight-line projectile model and swept contact detection.

use dusk_defence_core::{EnemyId, ProjectileId, ProjectileKind, StructureId, WorldPoint};
use glam::Vec2;

/// Projectile in flight.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) structure: StructureId,
    pub(crate) position: WorldPoint,
    pub(crate) velocity: Vec2,
    pub(crate) damage: u32,
    pub(crate) kind: ProjectileKind,
    pub(crate) remaining_lifespan: f32,
}

/// First enemy touched by a projectile during one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Contact {
    pub(crate) enemy: EnemyId,
    pub(crate) position: WorldPoint,
}

/// Finds the enemy reached first while travelling from `start` to `end`.
///
/// An enemy is in contact when its distance to the travelled segment is at
/// most `radius`. Earlier contacts along the segment win; equal contacts keep
/// the enemy seen first.
pub(crate) fn first_contact(
    start: WorldPoint,
    end: WorldPoint,
    radius: f32,
    enemies: impl IntoIterator<Item = (EnemyId, WorldPoint)>,
) -> Option<Contact> {
    let origin = start.as_vec2();
    let travel = end.as_vec2() - origin;
    let length_sq = travel.length_squared();

    let mut best: Option<(f32, Contact)> = None;
    for (enemy, position) in enemies {
        let offset = position.as_vec2() - origin;
        let along = if length_sq > 0.0 {
            (offset.dot(travel) / length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = origin + travel * along;
        if closest.distance(position.as_vec2()) > radius {
            continue;
        }

        if best.map_or(true, |(best_along, _)| along < best_along) {
            best = Some((
                along,
                Contact {
                    enemy,
                    position: WorldPoint::from(closest),
                },
            ));
        }
    }

    best.map(|(_, contact)| contact)
}
