#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dusk Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.
//!
//! Entities refer to each other through the identifier newtypes defined here.
//! An identifier resolves only while its entity is alive; lookups after
//! removal yield `None` and callers treat that as "no target".

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod archetypes;
mod combat;
mod resources;

pub use archetypes::{EnemyArchetype, ProjectileKind, StructureBlueprint};
pub use combat::{CombatUnit, DamageOutcome, DamageState};
pub use resources::{ResourceBundle, ResourceKind};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dusk Defence. Survive the night.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places the main structure that enemies march toward.
    PlaceBase {
        /// Location of the base.
        position: WorldPoint,
        /// Health the base starts with.
        max_health: u32,
        /// Nominal build cost used to price repairs of the base.
        cost: ResourceBundle,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Instantiates an enemy at a spawn point.
    SpawnEnemy {
        /// Spawn location.
        position: WorldPoint,
        /// Stat block of the new enemy.
        archetype: EnemyArchetype,
    },
    /// Moves a seeking enemy to a new position, releasing any engagement.
    AdvanceEnemy {
        /// Enemy being moved.
        enemy: EnemyId,
        /// Position the enemy occupies after the move.
        destination: WorldPoint,
    },
    /// Commits an enemy to attacking a structure.
    EngageStructure {
        /// Attacking enemy.
        enemy: EnemyId,
        /// Structure under attack.
        structure: StructureId,
    },
    /// Resolves one attack of an engaged enemy whose attack timer elapsed.
    StrikeStructure {
        /// Attacking enemy.
        enemy: EnemyId,
        /// Structure receiving the blow.
        structure: StructureId,
    },
    /// Removes an enemy that lost its objective without granting kill credit.
    WithdrawEnemy {
        /// Enemy being removed.
        enemy: EnemyId,
    },
    /// Turns a structure toward its chosen target.
    AimStructure {
        /// Structure doing the aiming.
        structure: StructureId,
        /// Enemy being tracked.
        target: EnemyId,
    },
    /// Fires a projectile from a structure whose cooldown elapsed.
    FireProjectile {
        /// Firing structure.
        structure: StructureId,
        /// Enemy the projectile is launched toward.
        target: EnemyId,
    },
    /// Applies damage to a structure from a collaborator outside the combat loop.
    DamageStructure {
        /// Structure receiving damage.
        structure: StructureId,
        /// Amount of damage.
        amount: u32,
    },
    /// Applies damage to an enemy from a collaborator outside the combat loop.
    DamageEnemy {
        /// Enemy receiving damage.
        enemy: EnemyId,
        /// Amount of damage.
        amount: u32,
    },
    /// Constructs a structure when affordable and unobstructed.
    BuildStructure {
        /// Catalog entry describing the structure.
        blueprint: BlueprintId,
        /// Requested location.
        position: WorldPoint,
    },
    /// Restores a structure to full health when the repair bill is affordable.
    RepairStructure {
        /// Structure to repair.
        structure: StructureId,
    },
    /// Adds resources to the ledger.
    CreditResources {
        /// Resources to add.
        bundle: ResourceBundle,
    },
    /// Places a gatherable resource node.
    SpawnResourceNode {
        /// Resource yielded by the node.
        kind: ResourceKind,
        /// Node location.
        position: WorldPoint,
    },
    /// Harvests one charge from a resource node.
    GatherResource {
        /// Node being harvested.
        node: ResourceNodeId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The clock crossed 7 PM.
    DuskReached {
        /// Day on which night fell.
        day: u32,
    },
    /// The clock crossed 5 AM.
    DawnReached {
        /// Day that dawned.
        day: u32,
    },
    /// The clock wrapped past midnight.
    DayCompleted {
        /// Day counter after the wrap.
        days_survived: u32,
    },
    /// The main structure was placed.
    BasePlaced {
        /// Identifier allocated to the base.
        structure: StructureId,
        /// Location of the base.
        position: WorldPoint,
    },
    /// An enemy entered the world.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Spawn location.
        position: WorldPoint,
    },
    /// An enemy moved toward the base.
    EnemyAdvanced {
        /// Moving enemy.
        enemy: EnemyId,
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// An enemy committed to attacking a structure.
    EnemyEngaged {
        /// Attacking enemy.
        enemy: EnemyId,
        /// Structure under attack.
        structure: StructureId,
    },
    /// A structure lost health.
    StructureDamaged {
        /// Damaged structure.
        structure: StructureId,
        /// Damage applied.
        damage: u32,
        /// Health left.
        remaining: u32,
    },
    /// A structure was destroyed and removed.
    StructureDestroyed {
        /// Destroyed structure.
        structure: StructureId,
    },
    /// The main structure was destroyed; every enemy is withdrawn.
    BaseDestroyed {
        /// Identifier the base carried.
        structure: StructureId,
    },
    /// An enemy lost health and survived.
    EnemyDamaged {
        /// Damaged enemy.
        enemy: EnemyId,
        /// Damage applied.
        damage: u32,
        /// Health left.
        remaining: u32,
    },
    /// An enemy was killed. Published exactly once per kill.
    EnemyDestroyed {
        /// Killed enemy.
        enemy: EnemyId,
    },
    /// An enemy was removed without a kill, e.g. after the base fell.
    EnemyWithdrawn {
        /// Removed enemy.
        enemy: EnemyId,
    },
    /// A structure fired a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Firing structure.
        structure: StructureId,
        /// Enemy the shot was aimed at.
        target: EnemyId,
        /// Damage delivery of the projectile.
        kind: ProjectileKind,
    },
    /// A projectile made contact and delivered its damage.
    ProjectileDetonated {
        /// Detonated projectile.
        projectile: ProjectileId,
        /// Contact position.
        position: WorldPoint,
        /// Number of enemies damaged.
        hits: u32,
    },
    /// A projectile reached the end of its lifespan without contact.
    ProjectileExpired {
        /// Expired projectile.
        projectile: ProjectileId,
    },
    /// A structure was constructed and its cost deducted.
    StructureBuilt {
        /// Identifier allocated to the structure.
        structure: StructureId,
        /// Catalog entry that was built.
        blueprint: BlueprintId,
        /// Location of the structure.
        position: WorldPoint,
        /// Resources deducted.
        cost: ResourceBundle,
    },
    /// A construction request was refused; nothing changed.
    StructureRejected {
        /// Requested catalog entry.
        blueprint: BlueprintId,
        /// Requested location.
        position: WorldPoint,
        /// Reason for the refusal.
        reason: BuildError,
    },
    /// A structure was restored to full health.
    StructureRepaired {
        /// Repaired structure.
        structure: StructureId,
        /// Resources deducted.
        cost: ResourceBundle,
    },
    /// A repair request was refused; nothing changed.
    RepairRejected {
        /// Structure named in the request.
        structure: StructureId,
        /// Reason for the refusal.
        reason: RepairError,
    },
    /// Resources were added to the ledger.
    ResourcesCredited {
        /// Resources added.
        bundle: ResourceBundle,
    },
    /// A resource node appeared.
    ResourceNodeSpawned {
        /// Identifier allocated to the node.
        node: ResourceNodeId,
        /// Resource yielded by the node.
        kind: ResourceKind,
        /// Node location.
        position: WorldPoint,
    },
    /// A charge was harvested from a resource node.
    ResourceGathered {
        /// Harvested node.
        node: ResourceNodeId,
        /// Resource credited.
        kind: ResourceKind,
        /// Amount credited.
        amount: u32,
    },
    /// A resource node disappeared, either depleted or expired.
    ResourceNodeRemoved {
        /// Removed node.
        node: ResourceNodeId,
    },
    /// A gather request was refused.
    GatherRejected {
        /// Node named in the request.
        node: ResourceNodeId,
        /// Reason for the refusal.
        reason: GatherError,
    },
    /// The wave scheduler started spawning a wave.
    WaveStarted {
        /// Wave number, starting at one.
        wave: u32,
        /// Enemies the wave will spawn.
        enemies: u32,
    },
    /// Every enemy of a wave was spawned and removed.
    WaveCompleted {
        /// Completed wave number.
        wave: u32,
    },
}

/// Reasons a construction request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum BuildError {
    /// The blueprint identifier is not in the catalog.
    #[error("unknown blueprint")]
    UnknownBlueprint,
    /// The ledger cannot cover every component of the cost.
    #[error("not enough resources to build")]
    InsufficientResources,
    /// Another structure already stands at the requested position.
    #[error("position is occupied by another structure")]
    Occupied,
}

/// Reasons a repair request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum RepairError {
    /// No live structure carries the identifier.
    #[error("structure no longer exists")]
    MissingStructure,
    /// The structure has not lost any health.
    #[error("structure is already at full health")]
    AlreadyAtFullHealth,
    /// The ledger cannot cover every component of the repair bill.
    #[error("not enough resources to repair")]
    InsufficientResources,
}

/// Reasons a gather request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum GatherError {
    /// No live resource node carries the identifier.
    #[error("resource node no longer exists")]
    MissingNode,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to an enemy.
    EnemyId
);
entity_id!(
    /// Unique identifier assigned to a structure, including the base.
    StructureId
);
entity_id!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);
entity_id!(
    /// Unique identifier assigned to a resource node.
    ResourceNodeId
);

/// Index of a structure blueprint within the configured catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlueprintId(u16);

impl BlueprintId {
    /// Creates a blueprint identifier from a catalog index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Catalog index referenced by the identifier.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Continuous position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldPoint(Vec2);

impl WorldPoint {
    /// World origin.
    pub const ORIGIN: Self = Self(Vec2::ZERO);

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.0.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.0.y
    }

    /// Underlying vector.
    #[must_use]
    pub const fn as_vec2(&self) -> Vec2 {
        self.0
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.0.distance(other.0)
    }

    /// Heading from `self` toward `other` in radians, measured counter-clockwise
    /// from the positive x axis. `None` when both points coincide.
    #[must_use]
    pub fn heading_to(self, other: WorldPoint) -> Option<f32> {
        let delta = other.0 - self.0;
        if delta == Vec2::ZERO {
            return None;
        }
        Some(delta.y.atan2(delta.x))
    }

    /// Moves toward `target` by at most `max_distance`, never overshooting it.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, max_distance: f32) -> WorldPoint {
        let delta = target.0 - self.0;
        let length = delta.length();
        if length <= max_distance || length == 0.0 {
            return target;
        }
        if max_distance <= 0.0 {
            return self;
        }
        Self(self.0 + delta / length * max_distance)
    }

    /// Offsets the point by `velocity * seconds`.
    #[must_use]
    pub fn translated(self, velocity: Vec2, seconds: f32) -> WorldPoint {
        Self(self.0 + velocity * seconds)
    }
}

impl From<Vec2> for WorldPoint {
    fn from(value: Vec2) -> Self {
        Self(value)
    }
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position.
    pub position: WorldPoint,
    /// Facing in radians.
    pub heading: f32,
    /// Health pool.
    pub health: CombatUnit,
    /// Stat block the enemy was spawned with.
    pub archetype: EnemyArchetype,
    /// Structure the enemy is attacking, if any. May refer to a structure that
    /// has since been destroyed.
    pub engaged: Option<StructureId>,
    /// Indicates whether the attack timer reached the archetype's attack speed.
    pub attack_ready: bool,
}

/// Read-only snapshot describing all enemies within the world.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up an enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Identifier and position of every enemy, in ascending id order.
    pub fn positions(&self) -> impl Iterator<Item = (EnemyId, WorldPoint)> + '_ {
        self.snapshots
            .iter()
            .map(|snapshot| (snapshot.id, snapshot.position))
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single structure used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StructureSnapshot {
    /// Identifier allocated to the structure by the world.
    pub id: StructureId,
    /// Location of the structure.
    pub position: WorldPoint,
    /// Facing in radians.
    pub heading: f32,
    /// Health pool.
    pub health: CombatUnit,
    /// Catalog entry the structure was built from; `None` for the base.
    pub blueprint: Option<BlueprintId>,
    /// Distance within which the structure targets enemies. Zero for the base.
    pub shooting_range: f32,
    /// Indicates whether the fire cooldown elapsed.
    pub ready_to_fire: bool,
    /// Enemy the structure aimed at most recently, if any.
    pub target: Option<EnemyId>,
}

impl StructureSnapshot {
    /// Reports whether this is the main structure, which never fires.
    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.blueprint.is_none()
    }
}

/// Read-only snapshot describing all structures within the world.
#[derive(Clone, Debug, Default)]
pub struct StructureView {
    snapshots: Vec<StructureSnapshot>,
}

impl StructureView {
    /// Creates a new structure view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StructureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured structure snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &StructureSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a structure by identifier.
    #[must_use]
    pub fn get(&self, id: StructureId) -> Option<&StructureSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// The main structure, if it still stands.
    #[must_use]
    pub fn base(&self) -> Option<&StructureSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.is_main())
    }

    /// Identifier and position of every structure, in ascending id order.
    pub fn positions(&self) -> impl Iterator<Item = (StructureId, WorldPoint)> + '_ {
        self.snapshots
            .iter()
            .map(|snapshot| (snapshot.id, snapshot.position))
    }

    /// Number of structures captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no structures were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
