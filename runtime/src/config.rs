//! Simulation configuration and its validation.

use std::{fs, path::Path, path::PathBuf};

use dusk_defence_core::{EnemyArchetype, ProjectileKind, ResourceBundle, WorldPoint};
use dusk_defence_system_foraging::ForagingConfig;
use dusk_defence_system_wave_scheduler::SchedulerConfig;
use dusk_defence_world::WorldSettings;
use serde::Deserialize;

/// Placement and durability of the main structure.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Location of the base.
    pub position: WorldPoint,
    /// Health the base starts with.
    pub max_health: u32,
    /// Nominal cost of the base, used to price repairs.
    pub cost: ResourceBundle,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            position: WorldPoint::ORIGIN,
            max_health: 100,
            cost: ResourceBundle::splat(10),
        }
    }
}

/// Everything needed to build a [`crate::Simulation`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Root seed; every random stream of the simulation derives from it.
    pub seed: u64,
    /// World tuning, including the clock and the structure catalog.
    pub world: WorldSettings,
    /// The main structure.
    pub base: BaseConfig,
    /// Wave sizing, cadence and trigger policy.
    pub scheduler: SchedulerConfig,
    /// Locations enemies may enter from.
    pub spawn_points: Vec<WorldPoint>,
    /// Stat blocks enemies are drawn from.
    pub enemy_archetypes: Vec<EnemyArchetype>,
    /// Daytime resource node spawning.
    pub foraging: ForagingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldSettings::default(),
            base: BaseConfig::default(),
            scheduler: SchedulerConfig::default(),
            spawn_points: vec![
                WorldPoint::new(25.0, 0.0),
                WorldPoint::new(0.0, 25.0),
                WorldPoint::new(-25.0, 0.0),
                WorldPoint::new(0.0, -25.0),
            ],
            enemy_archetypes: vec![
                EnemyArchetype::default(),
                EnemyArchetype {
                    max_health: 90,
                    speed: 1.2,
                    attack_speed: 3.0,
                    attack_range: 4.0,
                    damage: 25,
                },
            ],
            foraging: ForagingConfig::default(),
        }
    }
}

/// Reasons a configuration cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML or has mistyped fields.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// A value that must be strictly positive is not.
    #[error("`{field}` must be finite and greater than zero, got {value}")]
    NotPositive {
        /// Dotted path of the offending value.
        field: String,
        /// Value found.
        value: f32,
    },
    /// A value that must be non-negative is not.
    #[error("`{field}` must be finite and not negative, got {value}")]
    Negative {
        /// Dotted path of the offending value.
        field: String,
        /// Value found.
        value: f32,
    },
    /// A count that must be at least one is zero.
    #[error("`{field}` must be at least one")]
    Zero {
        /// Dotted path of the offending value.
        field: String,
    },
    /// The clock starts outside of a day.
    #[error("`world.clock.start_hour` must lie in [0, 24), got {0}")]
    StartHour(f32),
    /// No spawn point was configured.
    #[error("at least one spawn point is required")]
    NoSpawnPoints,
    /// No enemy archetype was configured.
    #[error("at least one enemy archetype is required")]
    NoArchetypes,
    /// The harvest yield range contains no value.
    #[error("resource node yield range {min}..={max} is empty")]
    EmptyYieldRange {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// The foraging annulus is inside out.
    #[error("foraging inner radius {inner} exceeds outer radius {outer}")]
    InvertedRadii {
        /// Configured inner radius.
        inner: f32,
        /// Configured outer radius.
        outer: f32,
    },
}

impl SimulationConfig {
    /// Parses a TOML document. Missing fields fall back to their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks every value the simulation relies on, reporting the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let clock = &self.world.clock;
        positive("world.clock.day_length_seconds", clock.day_length_seconds)?;
        if !(clock.start_hour.is_finite() && (0.0..24.0).contains(&clock.start_hour)) {
            return Err(ConfigError::StartHour(clock.start_hour));
        }

        non_negative("world.build_clearance", self.world.build_clearance)?;
        non_negative("world.contact_radius", self.world.contact_radius)?;

        let nodes = &self.world.resource_nodes;
        if nodes.charges == 0 {
            return Err(ConfigError::Zero {
                field: "world.resource_nodes.charges".to_owned(),
            });
        }
        positive(
            "world.resource_nodes.lifetime_seconds",
            nodes.lifetime_seconds,
        )?;
        if nodes.yield_min > nodes.yield_max {
            return Err(ConfigError::EmptyYieldRange {
                min: nodes.yield_min,
                max: nodes.yield_max,
            });
        }

        for (index, blueprint) in self.world.catalog.iter().enumerate() {
            let field = |name: &str| format!("world.catalog[{index}].{name}");
            if blueprint.max_health == 0 {
                return Err(ConfigError::Zero {
                    field: field("max_health"),
                });
            }
            positive(field("fire_rate"), blueprint.fire_rate)?;
            non_negative(field("shooting_range"), blueprint.shooting_range)?;
            positive(field("bullet_speed"), blueprint.bullet_speed)?;
            positive(field("projectile_lifespan"), blueprint.projectile_lifespan)?;
            if let ProjectileKind::Area { radius } = blueprint.projectile {
                non_negative(field("projectile.radius"), radius)?;
            }
        }

        if self.base.max_health == 0 {
            return Err(ConfigError::Zero {
                field: "base.max_health".to_owned(),
            });
        }

        positive("scheduler.enemies_per_second", self.scheduler.enemies_per_second)?;
        non_negative("scheduler.time_between_waves", self.scheduler.time_between_waves)?;
        if !self.scheduler.difficulty_scaling_factor.is_finite() {
            return Err(ConfigError::Negative {
                field: "scheduler.difficulty_scaling_factor".to_owned(),
                value: self.scheduler.difficulty_scaling_factor,
            });
        }

        if self.spawn_points.is_empty() {
            return Err(ConfigError::NoSpawnPoints);
        }
        if self.enemy_archetypes.is_empty() {
            return Err(ConfigError::NoArchetypes);
        }
        for (index, archetype) in self.enemy_archetypes.iter().enumerate() {
            let field = |name: &str| format!("enemy_archetypes[{index}].{name}");
            if archetype.max_health == 0 {
                return Err(ConfigError::Zero {
                    field: field("max_health"),
                });
            }
            non_negative(field("speed"), archetype.speed)?;
            non_negative(field("attack_speed"), archetype.attack_speed)?;
            non_negative(field("attack_range"), archetype.attack_range)?;
        }

        positive("foraging.spawn_interval", self.foraging.spawn_interval)?;
        non_negative("foraging.inner_radius", self.foraging.inner_radius)?;
        non_negative("foraging.outer_radius", self.foraging.outer_radius)?;
        if self.foraging.inner_radius > self.foraging.outer_radius {
            return Err(ConfigError::InvertedRadii {
                inner: self.foraging.inner_radius,
                outer: self.foraging.outer_radius,
            });
        }

        Ok(())
    }
}

fn positive(field: impl Into<String>, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field: field.into(),
            value,
        })
    }
}

fn non_negative(field: impl Into<String>, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative {
            field: field.into(),
            value,
        })
    }
}
