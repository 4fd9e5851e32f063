#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that aims structures at enemies and fires on cooldown.

use dusk_defence_core::{Command, EnemyView, Event, StructureView};
use dusk_defence_system_targeting::find_nearest;

/// Tower combat system that queues aiming and firing commands.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AimStructure` for every armed structure with an enemy in
    /// range, followed by `Command::FireProjectile` when its cooldown elapsed.
    ///
    /// The main structure never fires. Nothing is emitted unless `events`
    /// contains an `Event::TimeAdvanced`.
    pub fn handle(
        &mut self,
        events: &[Event],
        structures: &StructureView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        if enemies.is_empty() {
            return;
        }

        self.scratch.clear();

        for structure in structures.iter().filter(|structure| !structure.is_main()) {
            let Some(target) = find_nearest(
                structure.position,
                enemies.positions(),
                structure.shooting_range,
            ) else {
                continue;
            };

            self.scratch.push(Command::AimStructure {
                structure: structure.id,
                target,
            });
            if structure.ready_to_fire {
                self.scratch.push(Command::FireProjectile {
                    structure: structure.id,
                    target,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
