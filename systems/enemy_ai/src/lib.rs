#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that drives the enemy seek/engage state machine.
//!
//! A seeking enemy looks for the nearest structure within its attack range and
//! engages it, or otherwise walks straight toward the base. An engaged enemy
//! strikes whenever its attack timer elapsed and falls back to seeking in the
//! same tick once its structure disappears. Without a base every enemy is
//! withdrawn.

use std::time::Duration;

use dusk_defence_core::{
    Command, EnemySnapshot, EnemyView, Event, StructureSnapshot, StructureView,
};
use dusk_defence_system_targeting::find_nearest;

/// Enemy AI system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct EnemyAi {
    scratch: Vec<Command>,
}

impl EnemyAi {
    /// Creates a new enemy AI system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits movement, engagement, strike and withdrawal commands.
    ///
    /// Enemies only act on ticks, so nothing is emitted unless `events`
    /// contains at least one `Event::TimeAdvanced`.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        structures: &StructureView,
        out: &mut Vec<Command>,
    ) {
        let Some(dt) = elapsed(events) else {
            return;
        };
        if enemies.is_empty() {
            return;
        }

        self.scratch.clear();
        match structures.base() {
            Some(base) => {
                let seconds = dt.as_secs_f32();
                self.scratch.extend(
                    enemies
                        .iter()
                        .filter_map(|enemy| decide(enemy, base, structures, seconds)),
                );
            }
            None => self.scratch.extend(
                enemies
                    .iter()
                    .map(|enemy| Command::WithdrawEnemy { enemy: enemy.id }),
            ),
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn decide(
    enemy: &EnemySnapshot,
    base: &StructureSnapshot,
    structures: &StructureView,
    seconds: f32,
) -> Option<Command> {
    if let Some(structure) = enemy.engaged {
        if structures.get(structure).is_some() {
            return enemy.attack_ready.then_some(Command::StrikeStructure {
                enemy: enemy.id,
                structure,
            });
        }
    }

    if let Some(structure) = find_nearest(
        enemy.position,
        structures.positions(),
        enemy.archetype.attack_range,
    ) {
        return Some(Command::EngageStructure {
            enemy: enemy.id,
            structure,
        });
    }

    let step = enemy.archetype.speed.max(0.0) * seconds;
    Some(Command::AdvanceEnemy {
        enemy: enemy.id,
        destination: enemy.position.step_toward(base.position, step),
    })
}

fn elapsed(events: &[Event]) -> Option<Duration> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TimeAdvanced { dt } => Some(*dt),
            _ => None,
        })
        .reduce(|total, dt| total.saturating_add(dt))
}
