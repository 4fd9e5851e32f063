#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic simulation root for Dusk Defence.
//!
//! [`Simulation`] owns the world and every system, and runs them in a fixed
//! order once per [`Simulation::step`]. Player actions enter through
//! [`Simulation::submit`] between steps. Two simulations built from the same
//! configuration and fed the same deltas and actions produce identical event
//! streams.

mod config;

use std::time::Duration;

pub use config::{BaseConfig, ConfigError, SimulationConfig};

use dusk_defence_core::{Command, EnemyView, Event, ResourceBundle, StructureView, WorldPoint};
use dusk_defence_clock::Clock;
use dusk_defence_system_enemy_ai::EnemyAi;
use dusk_defence_system_foraging::Foraging;
use dusk_defence_system_tower_combat::TowerCombat;
use dusk_defence_system_wave_scheduler::{SpawnProvider, UniformSpawnProvider, WaveScheduler};
use dusk_defence_world::{self as world, query, World};

const PROVIDER_STREAM: u64 = 1;
const FORAGING_STREAM: u64 = 2;

/// Derives an independent seed for one random stream from the root seed.
fn derive_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// World plus systems, advanced together one tick at a time.
#[derive(Debug)]
pub struct Simulation<P = UniformSpawnProvider> {
    world: World,
    enemy_ai: EnemyAi,
    tower_combat: TowerCombat,
    foraging: Foraging,
    scheduler: WaveScheduler<P>,
    pending: Vec<Event>,
    commands: Vec<Command>,
    wave_events: Vec<Event>,
}

impl Simulation {
    /// Builds a simulation whose enemies come from the configured spawn points
    /// and archetypes.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let provider = UniformSpawnProvider::new(
            config.spawn_points.clone(),
            config.enemy_archetypes.clone(),
            derive_seed(config.seed, PROVIDER_STREAM),
        );
        Self::with_provider(config, provider)
    }
}

impl<P: SpawnProvider> Simulation<P> {
    /// Builds a simulation around a caller supplied spawn provider.
    ///
    /// The configuration is validated first and the base is placed before the
    /// first step.
    pub fn with_provider(config: SimulationConfig, provider: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let SimulationConfig {
            seed,
            world: settings,
            base,
            scheduler,
            foraging,
            ..
        } = config;

        let mut world = World::new(settings, seed);
        let mut pending = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceBase {
                position: base.position,
                max_health: base.max_health,
                cost: base.cost,
            },
            &mut pending,
        );
        tracing::info!(seed, position = ?base.position, "simulation ready");

        Ok(Self {
            world,
            enemy_ai: EnemyAi::new(),
            tower_combat: TowerCombat::new(),
            foraging: Foraging::new(foraging, derive_seed(seed, FORAGING_STREAM)),
            scheduler: WaveScheduler::new(scheduler, provider),
            pending,
            commands: Vec::new(),
            wave_events: Vec::new(),
        })
    }

    /// Advances the simulation by `dt` and returns every event the step produced.
    ///
    /// Order within a step: tick, enemy decisions, tower fire, foraging, then
    /// the wave scheduler. The scheduler also sees the events of actions
    /// submitted since the previous step.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        self.enemy_ai.handle(
            &events,
            &query::enemy_view(&self.world),
            &query::structure_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands(&mut events);

        self.tower_combat.handle(
            &events,
            &query::structure_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands(&mut events);

        let is_night = self.clock().is_night();
        let base = query::base(&self.world).map(|(_, position)| position);
        self.foraging
            .handle(&events, is_night, base, &mut self.commands);
        self.flush_commands(&mut events);

        self.pending.extend(events.iter().cloned());
        self.scheduler
            .handle(&self.pending, &mut self.commands, &mut self.wave_events);
        self.pending.clear();
        events.append(&mut self.wave_events);
        self.flush_commands(&mut events);

        events
    }

    /// Applies a player action immediately and returns the events it produced.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pending.extend(events.iter().cloned());
        events
    }

    fn flush_commands(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the wave scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &WaveScheduler<P> {
        &self.scheduler
    }

    /// Snapshot of every live enemy.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Snapshot of every standing structure.
    #[must_use]
    pub fn structures(&self) -> StructureView {
        query::structure_view(&self.world)
    }

    /// Enemies the scheduler counts as alive.
    #[must_use]
    pub fn enemies_alive(&self) -> u32 {
        self.scheduler.enemies_alive()
    }

    /// Wave number currently spawning or next to spawn.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.scheduler.current_wave()
    }

    /// Day/night clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        query::clock(&self.world)
    }

    /// Current day, starting at one.
    #[must_use]
    pub fn days_survived(&self) -> u32 {
        self.clock().days_survived()
    }

    /// Current ledger balance.
    #[must_use]
    pub fn resources(&self) -> ResourceBundle {
        query::resources(&self.world)
    }

    /// Sum of every resource in the ledger.
    #[must_use]
    pub fn total_resources(&self) -> u64 {
        query::total_resources(&self.world)
    }

    /// Reports whether the main structure still stands.
    #[must_use]
    pub fn base_alive(&self) -> bool {
        query::base_alive(&self.world)
    }

    /// Location of the main structure while it stands.
    #[must_use]
    pub fn base_position(&self) -> Option<WorldPoint> {
        query::base(&self.world).map(|(_, position)| position)
    }
}
