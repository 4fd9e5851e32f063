#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Daytime resource-node spawning around the base.

use std::time::Duration;

use dusk_defence_core::{Command, Event, ResourceKind, WorldPoint};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

/// Configuration parameters required to construct the foraging system.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForagingConfig {
    /// Seconds between two spawn opportunities.
    pub spawn_interval: f32,
    /// Closest distance to the base a node may appear at.
    pub inner_radius: f32,
    /// Farthest distance from the base a node may appear at.
    pub outer_radius: f32,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 3.0,
            inner_radius: 6.0,
            outer_radius: 11.0,
        }
    }
}

/// Pure system that scatters resource nodes while the sun is up.
#[derive(Debug)]
pub struct Foraging {
    spawn_interval: Duration,
    inner_radius: f32,
    outer_radius: f32,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Foraging {
    /// Creates a new foraging system using the supplied configuration.
    #[must_use]
    pub fn new(config: ForagingConfig, seed: u64) -> Self {
        let spawn_interval = if config.spawn_interval.is_finite() && config.spawn_interval > 0.0 {
            Duration::from_secs_f32(config.spawn_interval)
        } else {
            Duration::ZERO
        };
        let inner_radius = config.inner_radius.max(0.0);
        Self {
            spawn_interval,
            inner_radius,
            outer_radius: config.outer_radius.max(inner_radius),
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits one `Command::SpawnResourceNode` per elapsed interval during the day.
    ///
    /// Intervals that elapse at night, or while there is no base, are consumed
    /// without spawning.
    pub fn handle(
        &mut self,
        events: &[Event],
        is_night: bool,
        base: Option<WorldPoint>,
        out: &mut Vec<Command>,
    ) {
        if self.spawn_interval.is_zero() {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            if is_night {
                continue;
            }
            if let Some(base) = base {
                out.push(self.next_node(base));
            }
        }
    }

    fn next_node(&mut self, base: WorldPoint) -> Command {
        let kind = ResourceKind::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ResourceKind::Wood);
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = if self.outer_radius > self.inner_radius {
            self.rng.gen_range(self.inner_radius..=self.outer_radius)
        } else {
            self.inner_radius
        };

        Command::SpawnResourceNode {
            kind,
            position: WorldPoint::new(
                base.x() + angle.cos() * distance,
                base.y() + angle.sin() * distance,
            ),
        }
    }
}
