//! Tuning descriptors for enemies, structures and projectiles.
//!
//! Values here are configuration inputs. Defaults mirror the stock prefabs so
//! a bare `SimulationConfig::default()` plays like the shipped game.

use serde::{Deserialize, Serialize};

use crate::ResourceBundle;

/// Stat block applied to every enemy spawned from this archetype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    /// Health the enemy spawns with.
    pub max_health: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Seconds between two consecutive attacks.
    pub attack_speed: f32,
    /// Distance within which the enemy commits to attacking a structure.
    pub attack_range: f32,
    /// Damage dealt per attack.
    pub damage: u32,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            max_health: 40,
            speed: 2.0,
            attack_speed: 2.0,
            attack_range: 5.0,
            damage: 10,
        }
    }
}

/// Damage delivery of a projectile, fixed when the projectile is created.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Damages the enemy it touches.
    Single,
    /// Explodes on contact, damaging every enemy within `radius`.
    Area {
        /// Explosion radius in world units.
        radius: f32,
    },
}

impl Default for ProjectileKind {
    fn default() -> Self {
        Self::Single
    }
}

/// Buildable structure definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureBlueprint {
    /// Display name of the structure.
    pub name: String,
    /// Resources deducted on construction; also the basis of repair costs.
    pub cost: ResourceBundle,
    /// Health the structure is built with.
    pub max_health: u32,
    /// Seconds between two shots.
    pub fire_rate: f32,
    /// Damage carried by every projectile.
    pub bullet_damage: u32,
    /// Distance within which enemies are targeted.
    pub shooting_range: f32,
    /// Projectile speed in world units per second.
    pub bullet_speed: f32,
    /// Seconds a projectile lives before removing itself.
    pub projectile_lifespan: f32,
    /// Damage delivery of fired projectiles.
    pub projectile: ProjectileKind,
}

impl Default for StructureBlueprint {
    fn default() -> Self {
        Self {
            name: "turret".to_owned(),
            cost: ResourceBundle::splat(10),
            max_health: 100,
            fire_rate: 0.5,
            bullet_damage: 1,
            shooting_range: 5.0,
            bullet_speed: 10.0,
            projectile_lifespan: 1.0,
            projectile: ProjectileKind::Single,
        }
    }
}
