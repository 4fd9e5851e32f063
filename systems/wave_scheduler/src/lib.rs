#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that turns nightfall into escalating enemy waves.
//!
//! The scheduler is a pure system: it consumes the world's event stream,
//! counts live enemies through destruction and withdrawal notifications, and
//! answers with `Command::SpawnEnemy` batches. Wave size grows with
//! `round(base_enemies * wave ^ difficulty_scaling_factor)`.

use dusk_defence_core::{Command, EnemyArchetype, Event, WorldPoint};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

/// Decides what starts a wave. Exactly one policy is active per scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Waves start after the intermission that follows each dusk.
    #[default]
    NightTriggered,
    /// Waves loop on their own, separated by the intermission.
    Autonomous,
}

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Enemies in the first wave.
    pub base_enemies: u32,
    /// Spawn cadence while a wave is spawning.
    pub enemies_per_second: f32,
    /// Seconds between the trigger and the first spawn of a wave.
    pub time_between_waves: f32,
    /// Exponent applied to the wave number when sizing a wave.
    pub difficulty_scaling_factor: f32,
    /// What starts a wave.
    pub policy: SchedulingPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_enemies: 10,
            enemies_per_second: 0.5,
            time_between_waves: 2.0,
            difficulty_scaling_factor: 0.75,
            policy: SchedulingPolicy::NightTriggered,
        }
    }
}

impl SchedulerConfig {
    /// Number of enemies spawned by `wave`, rounded half to even.
    #[must_use]
    pub fn wave_size(&self, wave: u32) -> u32 {
        let scaled = f64::from(self.base_enemies)
            * f64::from(wave).powf(f64::from(self.difficulty_scaling_factor));
        if !scaled.is_finite() {
            return 0;
        }
        scaled.round_ties_even() as u32
    }

    fn spawn_interval(&self) -> Option<f32> {
        (self.enemies_per_second.is_finite() && self.enemies_per_second > 0.0)
            .then(|| 1.0 / self.enemies_per_second)
    }
}

/// Request handed to a [`SpawnProvider`] for every enemy of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Wave being spawned.
    pub wave: u32,
    /// Enemies still to spawn, including this one.
    pub remaining: u32,
}

/// Chooses where each enemy appears and what it is.
pub trait SpawnProvider {
    /// Picks a spawn position and archetype, or `None` when nothing can spawn.
    fn next_spawn(&mut self, request: SpawnRequest) -> Option<(WorldPoint, EnemyArchetype)>;
}

/// Spawn provider that picks a spawn point and an archetype uniformly at random.
#[derive(Clone, Debug)]
pub struct UniformSpawnProvider {
    spawn_points: Vec<WorldPoint>,
    archetypes: Vec<EnemyArchetype>,
    rng: ChaCha8Rng,
}

impl UniformSpawnProvider {
    /// Creates a provider seeded for deterministic replays.
    #[must_use]
    pub fn new(spawn_points: Vec<WorldPoint>, archetypes: Vec<EnemyArchetype>, seed: u64) -> Self {
        Self {
            spawn_points,
            archetypes,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl SpawnProvider for UniformSpawnProvider {
    fn next_spawn(&mut self, _request: SpawnRequest) -> Option<(WorldPoint, EnemyArchetype)> {
        let position = *self.spawn_points.choose(&mut self.rng)?;
        let archetype = *self.archetypes.choose(&mut self.rng)?;
        Some((position, archetype))
    }
}

/// Lifecycle phase of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WavePhase {
    /// Waiting for a trigger.
    Idle,
    /// Counting down to the next wave.
    Intermission {
        /// Seconds left before the wave starts.
        remaining: f32,
    },
    /// Spawning and fighting the current wave.
    Spawning,
}

/// Pure system that schedules waves and emits spawn commands.
#[derive(Debug)]
pub struct WaveScheduler<P> {
    config: SchedulerConfig,
    provider: P,
    phase: WavePhase,
    current_wave: u32,
    enemies_alive: u32,
    enemies_left_to_spawn: u32,
    time_since_last_spawn: f32,
}

impl<P: SpawnProvider> WaveScheduler<P> {
    /// Creates a scheduler on wave one.
    ///
    /// An autonomous scheduler starts counting down to its first wave
    /// immediately; a night-triggered one waits for dusk.
    #[must_use]
    pub fn new(config: SchedulerConfig, provider: P) -> Self {
        let phase = match config.policy {
            SchedulingPolicy::NightTriggered => WavePhase::Idle,
            SchedulingPolicy::Autonomous => WavePhase::Intermission {
                remaining: config.time_between_waves,
            },
        };

        Self {
            config,
            provider,
            phase,
            current_wave: 1,
            enemies_alive: 0,
            enemies_left_to_spawn: 0,
            time_since_last_spawn: 0.0,
        }
    }

    /// Consumes one tick worth of world events.
    ///
    /// Kill and withdrawal notifications are applied first, then dusk
    /// triggers, then the spawn timer, then the completion check. Spawn
    /// commands go to `out`; wave start and completion go to `out_events`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        let mut seconds = 0.0_f32;
        for event in events {
            match event {
                Event::EnemyDestroyed { .. } | Event::EnemyWithdrawn { .. } => {
                    self.enemy_removed();
                }
                Event::TimeAdvanced { dt } => seconds += dt.as_secs_f32(),
                _ => {}
            }
        }

        for event in events {
            if let Event::DuskReached { day } = event {
                self.dusk(*day);
            }
        }

        match self.phase {
            WavePhase::Idle => {}
            WavePhase::Intermission { remaining } => {
                let remaining = remaining - seconds;
                if remaining <= 0.0 {
                    self.start_wave(out_events);
                } else {
                    self.phase = WavePhase::Intermission { remaining };
                }
            }
            WavePhase::Spawning => {
                self.time_since_last_spawn += seconds;
                self.try_spawn(out);
                if self.enemies_alive == 0 && self.enemies_left_to_spawn == 0 {
                    self.complete_wave(out_events);
                }
            }
        }
    }

    /// Wave number that is running or will run next, starting at one.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Enemies of the current wave that are still in the world.
    #[must_use]
    pub fn enemies_alive(&self) -> u32 {
        self.enemies_alive
    }

    /// Enemies of the current wave that have not spawned yet.
    #[must_use]
    pub fn enemies_left_to_spawn(&self) -> u32 {
        self.enemies_left_to_spawn
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Reports whether a wave is being spawned or fought.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    fn enemy_removed(&mut self) {
        match self.enemies_alive.checked_sub(1) {
            Some(alive) => self.enemies_alive = alive,
            None => tracing::warn!("enemy removal reported with no enemies alive"),
        }
    }

    fn dusk(&mut self, day: u32) {
        if self.config.policy != SchedulingPolicy::NightTriggered {
            return;
        }
        if self.phase != WavePhase::Idle {
            tracing::debug!(day, wave = self.current_wave, "dusk while wave pending; ignored");
            return;
        }

        tracing::debug!(day, wave = self.current_wave, "night fell; wave warming up");
        self.phase = WavePhase::Intermission {
            remaining: self.config.time_between_waves,
        };
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        let enemies = self.config.wave_size(self.current_wave);
        self.enemies_left_to_spawn = enemies;
        self.time_since_last_spawn = 0.0;
        self.phase = WavePhase::Spawning;

        tracing::info!(wave = self.current_wave, enemies, "wave started");
        out_events.push(Event::WaveStarted {
            wave: self.current_wave,
            enemies,
        });
    }

    fn try_spawn(&mut self, out: &mut Vec<Command>) {
        let Some(interval) = self.config.spawn_interval() else {
            return;
        };
        if self.enemies_left_to_spawn == 0 || self.time_since_last_spawn < interval {
            return;
        }

        let request = SpawnRequest {
            wave: self.current_wave,
            remaining: self.enemies_left_to_spawn,
        };
        self.enemies_left_to_spawn -= 1;
        self.time_since_last_spawn = 0.0;

        match self.provider.next_spawn(request) {
            Some((position, archetype)) => {
                self.enemies_alive = self.enemies_alive.saturating_add(1);
                out.push(Command::SpawnEnemy {
                    position,
                    archetype,
                });
            }
            None => tracing::warn!(wave = request.wave, "no spawn available; slot dropped"),
        }
    }

    fn complete_wave(&mut self, out_events: &mut Vec<Event>) {
        tracing::info!(wave = self.current_wave, "wave completed");
        out_events.push(Event::WaveCompleted {
            wave: self.current_wave,
        });

        self.current_wave = self.current_wave.saturating_add(1);
        self.time_since_last_spawn = 0.0;
        self.phase = match self.config.policy {
            SchedulingPolicy::NightTriggered => WavePhase::Idle,
            SchedulingPolicy::Autonomous => WavePhase::Intermission {
                remaining: self.config.time_between_waves,
            },
        };
    }
}
