#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dusk Defence.
//!
//! The world owns every entity arena, the day/night clock, and the resource
//! ledger. It only changes through [`apply`], which executes one [`Command`] and
//! appends the resulting [`Event`] values to the caller's buffer.

use std::{collections::BTreeMap, time::Duration};

use dusk_defence_clock::{Clock, ClockConfig, ClockEdge};
use dusk_defence_core::{
    BlueprintId, BuildError, CombatUnit, Command, DamageOutcome, EnemyArchetype, EnemyId, Event,
    GatherError, ProjectileId, ProjectileKind, RepairError, ResourceBundle, ResourceKind,
    ResourceNodeId, StructureBlueprint, StructureId, WorldPoint, WELCOME_BANNER,
};
use dusk_defence_economy::{repair_bill, ResourceLedger};
use dusk_defence_system_targeting::{find_nearest, within_range};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

mod nodes;
mod projectiles;
mod structures;

pub use nodes::ResourceNodeSettings;

use nodes::ResourceNode;
use projectiles::{first_contact, Projectile};
use structures::StructureRegistry;

/// Static tuning of the world, fixed at construction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Day/night clock parameters.
    pub clock: ClockConfig,
    /// Buildable structures, addressed by [`BlueprintId`].
    pub catalog: Vec<StructureBlueprint>,
    /// Ledger balance at the start of the game.
    pub starting_resources: ResourceBundle,
    /// Minimum distance between two structure centres.
    pub build_clearance: f32,
    /// Distance at which a projectile touches an enemy.
    pub contact_radius: f32,
    /// Resource node tuning.
    pub resource_nodes: ResourceNodeSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            catalog: vec![
                StructureBlueprint::default(),
                StructureBlueprint {
                    name: "mortar".to_owned(),
                    cost: ResourceBundle::new(20, 30, 10, 10),
                    fire_rate: 2.0,
                    bullet_damage: 5,
                    shooting_range: 6.0,
                    bullet_speed: 8.0,
                    projectile: ProjectileKind::Area { radius: 2.0 },
                    ..StructureBlueprint::default()
                },
            ],
            starting_resources: ResourceBundle::splat(200),
            build_clearance: 1.0,
            contact_radius: 0.5,
            resource_nodes: ResourceNodeSettings::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: WorldPoint,
    heading: f32,
    health: CombatUnit,
    archetype: EnemyArchetype,
    engaged: Option<StructureId>,
    attack_timer: f32,
}

impl Enemy {
    fn attack_ready(&self) -> bool {
        self.engaged.is_some() && self.attack_timer >= self.archetype.attack_speed
    }

    fn release(&mut self) {
        self.engaged = None;
        self.attack_timer = 0.0;
    }
}

/// Represents the authoritative Dusk Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    settings: WorldSettings,
    clock: Clock,
    ledger: ResourceLedger,
    structures: StructureRegistry,
    enemies: BTreeMap<EnemyId, Enemy>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    nodes: BTreeMap<ResourceNodeId, ResourceNode>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_node_id: u32,
    elapsed: f64,
    tick_index: u64,
    rng: ChaCha8Rng,
    clock_edges: Vec<ClockEdge>,
}

impl World {
    /// Creates a new world without a base, seeded for deterministic harvests.
    #[must_use]
    pub fn new(settings: WorldSettings, seed: u64) -> Self {
        Self {
            banner: WELCOME_BANNER,
            clock: Clock::new(settings.clock),
            ledger: ResourceLedger::new(settings.starting_resources),
            structures: StructureRegistry::new(),
            enemies: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            nodes: BTreeMap::new(),
            next_enemy_id: 0,
            next_projectile_id: 0,
            next_node_id: 0,
            elapsed: 0.0,
            tick_index: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock_edges: Vec::new(),
            settings,
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        self.tick_index = self.tick_index.saturating_add(1);
        self.elapsed += dt.as_secs_f64();
        out_events.push(Event::TimeAdvanced { dt });

        self.clock_edges.clear();
        self.clock.advance(seconds, &mut self.clock_edges);
        for edge in &self.clock_edges {
            out_events.push(match *edge {
                ClockEdge::Dawn { day } => Event::DawnReached { day },
                ClockEdge::Dusk { day } => Event::DuskReached { day },
                ClockEdge::Midnight { days_survived } => Event::DayCompleted { days_survived },
            });
        }

        for enemy in self.enemies.values_mut() {
            if enemy.engaged.is_some() {
                enemy.attack_timer += seconds;
            }
        }

        self.advance_projectiles(seconds, out_events);
        self.expire_nodes(seconds, out_events);
    }

    fn advance_projectiles(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        let ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();
        for id in ids {
            let Some(mut projectile) = self.projectiles.remove(&id) else {
                continue;
            };

            let start = projectile.position;
            let end = start.translated(projectile.velocity, seconds);
            let contact = first_contact(
                start,
                end,
                self.settings.contact_radius,
                self.enemies.values().map(|enemy| (enemy.id, enemy.position)),
            );

            if let Some(contact) = contact {
                let victims = match projectile.kind {
                    ProjectileKind::Single => vec![contact.enemy],
                    ProjectileKind::Area { radius } => within_range(
                        contact.position,
                        self.enemies.values().map(|enemy| (enemy.id, enemy.position)),
                        radius,
                    ),
                };
                let hits = u32::try_from(victims.len()).unwrap_or(u32::MAX);
                for victim in victims {
                    self.damage_enemy(victim, projectile.damage, out_events);
                }
                out_events.push(Event::ProjectileDetonated {
                    projectile: id,
                    position: contact.position,
                    hits,
                });
                continue;
            }

            projectile.position = end;
            projectile.remaining_lifespan -= seconds;
            if projectile.remaining_lifespan <= 0.0 {
                out_events.push(Event::ProjectileExpired { projectile: id });
                continue;
            }

            let _ = self.projectiles.insert(id, projectile);
        }
    }

    fn expire_nodes(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        let mut expired = Vec::new();
        for node in self.nodes.values_mut() {
            node.remaining_lifetime -= seconds;
            if node.remaining_lifetime <= 0.0 {
                expired.push(node.id);
            }
        }

        for node in expired {
            let _ = self.nodes.remove(&node);
            out_events.push(Event::ResourceNodeRemoved { node });
        }
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return;
        };

        match enemy.health.take_damage(amount) {
            DamageOutcome::Survived { remaining } => out_events.push(Event::EnemyDamaged {
                enemy: id,
                damage: amount,
                remaining,
            }),
            DamageOutcome::Destroyed => {
                let _ = self.enemies.remove(&id);
                out_events.push(Event::EnemyDestroyed { enemy: id });
            }
            DamageOutcome::Ignored => {}
        }
    }

    fn damage_structure(&mut self, id: StructureId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(structure) = self.structures.get_mut(id) else {
            return;
        };

        match structure.health.take_damage(amount) {
            DamageOutcome::Survived { remaining } => out_events.push(Event::StructureDamaged {
                structure: id,
                damage: amount,
                remaining,
            }),
            DamageOutcome::Destroyed => self.destroy_structure(id, out_events),
            DamageOutcome::Ignored => {}
        }
    }

    fn destroy_structure(&mut self, id: StructureId, out_events: &mut Vec<Event>) {
        let Some(removed) = self.structures.remove(id) else {
            return;
        };

        tracing::info!(structure = id.get(), main = removed.is_main(), "structure destroyed");
        out_events.push(Event::StructureDestroyed { structure: id });

        for enemy in self.enemies.values_mut() {
            if enemy.engaged == Some(id) {
                enemy.release();
            }
        }

        if removed.is_main() {
            tracing::warn!(enemies = self.enemies.len(), "base lost; withdrawing enemies");
            out_events.push(Event::BaseDestroyed { structure: id });
            let withdrawn = std::mem::take(&mut self.enemies);
            for enemy in withdrawn.into_keys() {
                out_events.push(Event::EnemyWithdrawn { enemy });
            }
        }
    }

    fn place_base(
        &mut self,
        position: WorldPoint,
        max_health: u32,
        cost: ResourceBundle,
        out_events: &mut Vec<Event>,
    ) {
        if let Some(existing) = self.structures.base() {
            tracing::warn!(base = existing.id.get(), "base already placed; ignoring");
            return;
        }

        let structure = self.structures.insert(position, max_health, None, cost);
        out_events.push(Event::BasePlaced {
            structure,
            position,
        });
    }

    fn build(&mut self, blueprint: BlueprintId, position: WorldPoint, out_events: &mut Vec<Event>) {
        match self.try_build(blueprint, position) {
            Ok((structure, cost)) => {
                tracing::debug!(structure = structure.get(), ?position, "structure built");
                out_events.push(Event::StructureBuilt {
                    structure,
                    blueprint,
                    position,
                    cost,
                });
            }
            Err(reason) => {
                tracing::debug!(blueprint = blueprint.index(), %reason, "construction rejected");
                out_events.push(Event::StructureRejected {
                    blueprint,
                    position,
                    reason,
                });
            }
        }
    }

    fn try_build(
        &mut self,
        blueprint: BlueprintId,
        position: WorldPoint,
    ) -> Result<(StructureId, ResourceBundle), BuildError> {
        let entry = self
            .settings
            .catalog
            .get(blueprint.index())
            .ok_or(BuildError::UnknownBlueprint)?;
        if !self.ledger.can_afford(&entry.cost) {
            return Err(BuildError::InsufficientResources);
        }
        if self
            .structures
            .is_occupied(position, self.settings.build_clearance)
        {
            return Err(BuildError::Occupied);
        }

        self.ledger
            .try_spend(&entry.cost)
            .map_err(|_| BuildError::InsufficientResources)?;
        let structure =
            self.structures
                .insert(position, entry.max_health, Some(blueprint), entry.cost);
        Ok((structure, entry.cost))
    }

    fn repair(&mut self, structure: StructureId, out_events: &mut Vec<Event>) {
        match self.try_repair(structure) {
            Ok(cost) => out_events.push(Event::StructureRepaired { structure, cost }),
            Err(reason) => {
                tracing::debug!(structure = structure.get(), %reason, "repair rejected");
                out_events.push(Event::RepairRejected { structure, reason });
            }
        }
    }

    fn try_repair(&mut self, id: StructureId) -> Result<ResourceBundle, RepairError> {
        let structure = self
            .structures
            .get_mut(id)
            .ok_or(RepairError::MissingStructure)?;
        if structure.health.is_full() {
            return Err(RepairError::AlreadyAtFullHealth);
        }

        let bill = repair_bill(&structure.cost, &structure.health);
        self.ledger
            .try_spend(&bill)
            .map_err(|_| RepairError::InsufficientResources)?;
        structure.health.repair();
        Ok(bill)
    }

    fn fire(&mut self, structure: StructureId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(target_position) = self.enemies.get(&target).map(|enemy| enemy.position) else {
            return;
        };
        let Some(state) = self.structures.get_mut(structure) else {
            return;
        };
        let Some(blueprint) = state.blueprint else {
            tracing::debug!(structure = structure.get(), "main structure does not fire");
            return;
        };
        let Some(entry) = self.settings.catalog.get(blueprint.index()) else {
            tracing::warn!(blueprint = blueprint.index(), "structure references missing blueprint");
            return;
        };
        if self.elapsed < state.next_fire_time {
            return;
        }

        state.next_fire_time = self.elapsed + f64::from(entry.fire_rate);
        if let Some(heading) = state.position.heading_to(target_position) {
            state.heading = heading;
        }
        state.target = Some(target);

        let direction = (target_position.as_vec2() - state.position.as_vec2()).normalize_or_zero();
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        let _ = self.projectiles.insert(
            id,
            Projectile {
                id,
                structure,
                position: state.position,
                velocity: direction * entry.bullet_speed,
                damage: entry.bullet_damage,
                kind: entry.projectile,
                remaining_lifespan: entry.projectile_lifespan,
            },
        );
        out_events.push(Event::ProjectileFired {
            projectile: id,
            structure,
            target,
            kind: entry.projectile,
        });
    }

    fn strike(&mut self, enemy: EnemyId, structure: StructureId, out_events: &mut Vec<Event>) {
        let target_position = self.structures.get(structure).map(|state| state.position);
        let Some(attacker) = self.enemies.get_mut(&enemy) else {
            return;
        };
        if attacker.engaged.is_some_and(|current| current != structure) {
            tracing::debug!(enemy = enemy.get(), "strike on a structure other than the engaged one");
            return;
        }
        let Some(target_position) = target_position.filter(|_| attacker.engaged.is_some()) else {
            tracing::debug!(
                enemy = enemy.get(),
                structure = structure.get(),
                "engagement released before strike"
            );
            attacker.release();
            self.reseek(enemy, out_events);
            return;
        };
        if !attacker.attack_ready() {
            tracing::debug!(enemy = enemy.get(), "strike before attack timer elapsed");
            return;
        }

        attacker.attack_timer = 0.0;
        if let Some(heading) = attacker.position.heading_to(target_position) {
            attacker.heading = heading;
        }
        let damage = attacker.archetype.damage;
        self.damage_structure(structure, damage, out_events);
    }

    /// Engages the nearest standing structure within the enemy's attack range.
    fn reseek(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(origin) = self.enemies.get(&enemy) else {
            return;
        };
        let candidates = self.structures.iter().map(|state| (state.id, state.position));
        let Some(structure) =
            find_nearest(origin.position, candidates, origin.archetype.attack_range)
        else {
            return;
        };
        apply(self, Command::EngageStructure { enemy, structure }, out_events);
    }

    fn gather(&mut self, id: ResourceNodeId, out_events: &mut Vec<Event>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            tracing::debug!(node = id.get(), "gather on missing node");
            out_events.push(Event::GatherRejected {
                node: id,
                reason: GatherError::MissingNode,
            });
            return;
        };

        let settings = self.settings.resource_nodes;
        let low = settings.yield_min.min(settings.yield_max);
        let high = settings.yield_min.max(settings.yield_max);
        let amount = self.rng.gen_range(low..=high);
        node.charges = node.charges.saturating_sub(1);
        let kind = node.kind;
        let depleted = node.charges == 0;

        self.ledger.credit(&ResourceBundle::single(kind, amount));
        out_events.push(Event::ResourceGathered {
            node: id,
            kind,
            amount,
        });

        if depleted {
            let _ = self.nodes.remove(&id);
            out_events.push(Event::ResourceNodeRemoved { node: id });
        }
    }

    fn spawn_node(&mut self, kind: ResourceKind, position: WorldPoint, out_events: &mut Vec<Event>) {
        let node = ResourceNodeId::new(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        let settings = self.settings.resource_nodes;
        let _ = self.nodes.insert(
            node,
            ResourceNode {
                id: node,
                kind,
                position,
                charges: settings.charges.max(1),
                remaining_lifetime: settings.lifetime_seconds,
            },
        );
        out_events.push(Event::ResourceNodeSpawned {
            node,
            kind,
            position,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceBase {
            position,
            max_health,
            cost,
        } => world.place_base(position, max_health, cost, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnEnemy {
            position,
            archetype,
        } => {
            let enemy = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.saturating_add(1);
            let _ = world.enemies.insert(
                enemy,
                Enemy {
                    id: enemy,
                    position,
                    heading: 0.0,
                    health: CombatUnit::new(archetype.max_health),
                    archetype,
                    engaged: None,
                    attack_timer: 0.0,
                },
            );
            out_events.push(Event::EnemySpawned { enemy, position });
        }
        Command::AdvanceEnemy { enemy, destination } => {
            if !destination.x().is_finite() || !destination.y().is_finite() {
                tracing::warn!(enemy = enemy.get(), "ignoring non-finite destination");
                return;
            }
            let Some(state) = world.enemies.get_mut(&enemy) else {
                return;
            };
            let from = state.position;
            if let Some(heading) = from.heading_to(destination) {
                state.heading = heading;
            }
            state.position = destination;
            state.release();
            out_events.push(Event::EnemyAdvanced {
                enemy,
                from,
                to: destination,
            });
        }
        Command::EngageStructure { enemy, structure } => {
            let Some(target_position) = world.structures.get(structure).map(|s| s.position) else {
                return;
            };
            let Some(state) = world.enemies.get_mut(&enemy) else {
                return;
            };
            if state.engaged == Some(structure) {
                return;
            }
            state.engaged = Some(structure);
            state.attack_timer = 0.0;
            if let Some(heading) = state.position.heading_to(target_position) {
                state.heading = heading;
            }
            out_events.push(Event::EnemyEngaged { enemy, structure });
        }
        Command::StrikeStructure { enemy, structure } => {
            world.strike(enemy, structure, out_events);
        }
        Command::WithdrawEnemy { enemy } => {
            if world.enemies.remove(&enemy).is_some() {
                out_events.push(Event::EnemyWithdrawn { enemy });
            }
        }
        Command::AimStructure { structure, target } => {
            let Some(target_position) = world.enemies.get(&target).map(|enemy| enemy.position)
            else {
                return;
            };
            if let Some(state) = world.structures.get_mut(structure) {
                if let Some(heading) = state.position.heading_to(target_position) {
                    state.heading = heading;
                }
                state.target = Some(target);
            }
        }
        Command::FireProjectile { structure, target } => {
            world.fire(structure, target, out_events);
        }
        Command::DamageStructure { structure, amount } => {
            world.damage_structure(structure, amount, out_events);
        }
        Command::DamageEnemy { enemy, amount } => {
            world.damage_enemy(enemy, amount, out_events);
        }
        Command::BuildStructure {
            blueprint,
            position,
        } => world.build(blueprint, position, out_events),
        Command::RepairStructure { structure } => world.repair(structure, out_events),
        Command::CreditResources { bundle } => {
            world.ledger.credit(&bundle);
            out_events.push(Event::ResourcesCredited { bundle });
        }
        Command::SpawnResourceNode { kind, position } => {
            world.spawn_node(kind, position, out_events);
        }
        Command::GatherResource { node } => world.gather(node, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dusk_defence_clock::Clock;
    use dusk_defence_core::{
        EnemySnapshot, EnemyView, ProjectileId, ProjectileKind, ResourceBundle, ResourceKind,
        ResourceNodeId, StructureBlueprint, StructureId, StructureSnapshot, StructureView,
        WorldPoint,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of the enemies in the world.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .values()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    heading: enemy.heading,
                    health: enemy.health,
                    archetype: enemy.archetype,
                    engaged: enemy.engaged,
                    attack_ready: enemy.attack_ready(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every standing structure, the base included.
    #[must_use]
    pub fn structure_view(world: &World) -> StructureView {
        StructureView::from_snapshots(
            world
                .structures
                .iter()
                .map(|structure| {
                    let shooting_range = structure
                        .blueprint
                        .and_then(|id| world.settings.catalog.get(id.index()))
                        .map_or(0.0, |entry| entry.shooting_range);
                    StructureSnapshot {
                        id: structure.id,
                        position: structure.position,
                        heading: structure.heading,
                        health: structure.health,
                        blueprint: structure.blueprint,
                        shooting_range,
                        ready_to_fire: !structure.is_main()
                            && world.elapsed >= structure.next_fire_time,
                        target: structure.target,
                    }
                })
                .collect(),
        )
    }

    /// Day/night clock.
    #[must_use]
    pub fn clock(world: &World) -> &Clock {
        &world.clock
    }

    /// Seconds of simulated time since the world was created.
    #[must_use]
    pub fn current_time(world: &World) -> f64 {
        world.elapsed
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Current ledger balance.
    #[must_use]
    pub fn resources(world: &World) -> ResourceBundle {
        world.ledger.balance()
    }

    /// Sum of all four ledger counters.
    #[must_use]
    pub fn total_resources(world: &World) -> u64 {
        world.ledger.total_resources()
    }

    /// Reports whether the main structure still stands.
    #[must_use]
    pub fn base_alive(world: &World) -> bool {
        world.structures.base().is_some()
    }

    /// Identifier and position of the main structure, if it still stands.
    #[must_use]
    pub fn base(world: &World) -> Option<(StructureId, WorldPoint)> {
        world
            .structures
            .base()
            .map(|structure| (structure.id, structure.position))
    }

    /// Buildable structures in catalog order.
    #[must_use]
    pub fn catalog(world: &World) -> &[StructureBlueprint] {
        &world.settings.catalog
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Projectiles in flight, in ascending identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .values()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                structure: projectile.structure,
                position: projectile.position,
                kind: projectile.kind,
                remaining_lifespan: projectile.remaining_lifespan,
            })
            .collect()
    }

    /// Resource nodes available for harvest, in ascending identifier order.
    #[must_use]
    pub fn resource_nodes(world: &World) -> Vec<ResourceNodeSnapshot> {
        world
            .nodes
            .values()
            .map(|node| ResourceNodeSnapshot {
                id: node.id,
                kind: node.kind,
                position: node.position,
                charges: node.charges,
                remaining_lifetime: node.remaining_lifetime,
            })
            .collect()
    }

    /// Immutable representation of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier allocated to the projectile.
        pub id: ProjectileId,
        /// Structure that fired it.
        pub structure: StructureId,
        /// Current position.
        pub position: WorldPoint,
        /// Damage delivery.
        pub kind: ProjectileKind,
        /// Seconds left before it expires.
        pub remaining_lifespan: f32,
    }

    /// Immutable representation of a resource node.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ResourceNodeSnapshot {
        /// Identifier allocated to the node.
        pub id: ResourceNodeId,
        /// Resource yielded by the node.
        pub kind: ResourceKind,
        /// Node location.
        pub position: WorldPoint,
        /// Harvests left.
        pub charges: u32,
        /// Seconds left before the node expires.
        pub remaining_lifetime: f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(WorldSettings::default(), 7)
    }

    fn place_base(world: &mut World) -> StructureId {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceBase {
                position: WorldPoint::ORIGIN,
                max_health: 100,
                cost: ResourceBundle::splat(10),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::BasePlaced { structure, .. }] => *structure,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    fn spawn_enemy(world: &mut World, position: WorldPoint, max_health: u32) -> EnemyId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                position,
                archetype: EnemyArchetype {
                    max_health,
                    ..EnemyArchetype::default()
                },
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    fn tick(world: &mut World, seconds: f32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_secs_f32(seconds),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn build_rejections_follow_catalog_then_cost_then_overlap() {
        let mut world = World::new(
            WorldSettings {
                starting_resources: ResourceBundle::splat(15),
                ..WorldSettings::default()
            },
            0,
        );
        let _ = place_base(&mut world);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(9),
                position: WorldPoint::ORIGIN,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(1),
                position: WorldPoint::ORIGIN,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(0),
                position: WorldPoint::new(0.5, 0.0),
            },
            &mut events,
        );

        let reasons: Vec<BuildError> = events
            .iter()
            .filter_map(|event| match event {
                Event::StructureRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                BuildError::UnknownBlueprint,
                BuildError::InsufficientResources,
                BuildError::Occupied,
            ]
        );
        assert_eq!(query::resources(&world), ResourceBundle::splat(15));
        assert_eq!(query::structure_view(&world).len(), 1);
    }

    #[test]
    fn successful_build_deducts_full_cost() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(0),
                position: WorldPoint::new(3.0, 0.0),
            },
            &mut events,
        );

        assert!(matches!(
            events.as_slice(),
            [Event::StructureBuilt { cost, .. }] if *cost == ResourceBundle::splat(10)
        ));
        assert_eq!(query::resources(&world), ResourceBundle::splat(190));
    }

    #[test]
    fn repair_prices_missing_health_and_rejects_full_structures() {
        let mut world = world();
        let base = place_base(&mut world);
        let mut events = Vec::new();

        apply(&mut world, Command::RepairStructure { structure: base }, &mut events);
        apply(
            &mut world,
            Command::DamageStructure {
                structure: base,
                amount: 30,
            },
            &mut events,
        );
        apply(&mut world, Command::RepairStructure { structure: base }, &mut events);
        apply(
            &mut world,
            Command::RepairStructure {
                structure: StructureId::new(99),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::RepairRejected {
                    structure: base,
                    reason: RepairError::AlreadyAtFullHealth,
                },
                Event::StructureDamaged {
                    structure: base,
                    damage: 30,
                    remaining: 70,
                },
                Event::StructureRepaired {
                    structure: base,
                    cost: ResourceBundle::splat(1),
                },
                Event::RepairRejected {
                    structure: StructureId::new(99),
                    reason: RepairError::MissingStructure,
                },
            ]
        );
        assert_eq!(query::resources(&world), ResourceBundle::splat(199));
    }

    #[test]
    fn killed_enemy_is_removed_and_reported_once() {
        let mut world = world();
        let enemy = spawn_enemy(&mut world, WorldPoint::new(2.0, 0.0), 5);
        let mut events = Vec::new();

        apply(&mut world, Command::DamageEnemy { enemy, amount: 5 }, &mut events);
        apply(&mut world, Command::DamageEnemy { enemy, amount: 5 }, &mut events);

        assert_eq!(events, vec![Event::EnemyDestroyed { enemy }]);
        assert!(query::enemy_view(&world).get(enemy).is_none());
    }

    #[test]
    fn engaged_enemy_strikes_only_after_attack_timer() {
        let mut world = world();
        let base = place_base(&mut world);
        let enemy = spawn_enemy(&mut world, WorldPoint::new(1.0, 0.0), 40);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::EngageStructure {
                enemy,
                structure: base,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::StrikeStructure {
                enemy,
                structure: base,
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::EnemyEngaged { enemy, structure: base }]);

        let _ = tick(&mut world, 2.0);
        assert!(query::enemy_view(&world)
            .get(enemy)
            .is_some_and(|snapshot| snapshot.attack_ready));

        events.clear();
        apply(
            &mut world,
            Command::StrikeStructure {
                enemy,
                structure: base,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::StructureDamaged {
                structure: base,
                damage: 10,
                remaining: 90,
            }]
        );
        assert!(query::enemy_view(&world)
            .get(enemy)
            .is_some_and(|snapshot| !snapshot.attack_ready));
    }

    #[test]
    fn losing_the_base_withdraws_every_enemy() {
        let mut world = world();
        let base = place_base(&mut world);
        let first = spawn_enemy(&mut world, WorldPoint::new(1.0, 0.0), 40);
        let second = spawn_enemy(&mut world, WorldPoint::new(9.0, 0.0), 40);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::DamageStructure {
                structure: base,
                amount: 500,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::StructureDestroyed { structure: base },
                Event::BaseDestroyed { structure: base },
                Event::EnemyWithdrawn { enemy: first },
                Event::EnemyWithdrawn { enemy: second },
            ]
        );
        assert!(!query::base_alive(&world));
        assert_eq!(query::enemy_count(&world), 0);
    }

    #[test]
    fn destroyed_structure_releases_its_attackers() {
        let mut world = world();
        let _ = place_base(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(0),
                position: WorldPoint::new(5.0, 0.0),
            },
            &mut events,
        );
        let Some(Event::StructureBuilt { structure, .. }) = events.first().cloned() else {
            panic!("structure not built: {events:?}");
        };
        let enemy = spawn_enemy(&mut world, WorldPoint::new(6.0, 0.0), 40);
        apply(&mut world, Command::EngageStructure { enemy, structure }, &mut events);
        apply(
            &mut world,
            Command::DamageStructure {
                structure,
                amount: 100,
            },
            &mut events,
        );

        let snapshot = *query::enemy_view(&world).get(enemy).expect("enemy alive");
        assert_eq!(snapshot.engaged, None);
        assert!(!snapshot.attack_ready);
        assert!(query::structure_view(&world).get(structure).is_none());
    }

    #[test]
    fn released_attacker_engages_the_next_structure_in_the_same_flush() {
        let mut world = world();
        let base = place_base(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(0),
                position: WorldPoint::new(3.0, 0.0),
            },
            &mut events,
        );
        let Some(Event::StructureBuilt { structure: turret, .. }) = events.first().cloned() else {
            panic!("structure not built: {events:?}");
        };
        apply(
            &mut world,
            Command::DamageStructure {
                structure: turret,
                amount: 90,
            },
            &mut events,
        );
        let first = spawn_enemy(&mut world, WorldPoint::new(4.0, 0.0), 40);
        let second = spawn_enemy(&mut world, WorldPoint::new(4.0, 1.0), 40);
        for enemy in [first, second] {
            apply(
                &mut world,
                Command::EngageStructure {
                    enemy,
                    structure: turret,
                },
                &mut events,
            );
        }
        let _ = tick(&mut world, 2.0);

        events.clear();
        apply(
            &mut world,
            Command::StrikeStructure {
                enemy: first,
                structure: turret,
            },
            &mut events,
        );
        assert!(events.contains(&Event::StructureDestroyed { structure: turret }));

        events.clear();
        apply(
            &mut world,
            Command::StrikeStructure {
                enemy: second,
                structure: turret,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EnemyEngaged {
                enemy: second,
                structure: base,
            }]
        );
        let snapshot = *query::enemy_view(&world).get(second).expect("enemy alive");
        assert_eq!(snapshot.engaged, Some(base));
        assert!(!snapshot.attack_ready);
    }

    #[test]
    fn single_projectile_hits_nearest_enemy_once() {
        let mut world = world();
        let _ = place_base(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(0),
                position: WorldPoint::new(-3.0, 0.0),
            },
            &mut events,
        );
        let Some(Event::StructureBuilt { structure, .. }) = events.first().cloned() else {
            panic!("structure not built: {events:?}");
        };
        let near = spawn_enemy(&mut world, WorldPoint::new(0.0, 0.0), 40);
        let far = spawn_enemy(&mut world, WorldPoint::new(1.0, 0.0), 40);

        events.clear();
        apply(
            &mut world,
            Command::FireProjectile {
                structure,
                target: near,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::FireProjectile {
                structure,
                target: near,
            },
            &mut events,
        );
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::ProjectileFired { .. }))
                .count(),
            1,
            "cooldown blocks the second shot"
        );

        let events = tick(&mut world, 0.5);
        assert!(events.contains(&Event::EnemyDamaged {
            enemy: near,
            damage: 1,
            remaining: 39,
        }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::EnemyDamaged { enemy, .. } if *enemy == far)));
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn area_projectile_kills_each_enemy_exactly_once() {
        let mut world = world();
        let _ = place_base(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(1),
                position: WorldPoint::new(-4.0, 0.0),
            },
            &mut events,
        );
        let Some(Event::StructureBuilt { structure, .. }) = events.first().cloned() else {
            panic!("structure not built: {events:?}");
        };
        let enemies: Vec<EnemyId> = (0..3)
            .map(|index| spawn_enemy(&mut world, WorldPoint::new(0.0, index as f32 * 0.5), 5))
            .collect();

        apply(
            &mut world,
            Command::FireProjectile {
                structure,
                target: enemies[0],
            },
            &mut events,
        );
        let events = tick(&mut world, 1.0);

        for enemy in &enemies {
            let kills = events
                .iter()
                .filter(|event| **event == Event::EnemyDestroyed { enemy: *enemy })
                .count();
            assert_eq!(kills, 1, "enemy {enemy:?}");
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ProjectileDetonated { hits: 3, .. })));
        assert_eq!(query::enemy_count(&world), 0);
    }

    #[test]
    fn projectile_without_contact_expires() {
        let mut world = world();
        let _ = place_base(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildStructure {
                blueprint: BlueprintId::new(0),
                position: WorldPoint::new(10.0, 0.0),
            },
            &mut events,
        );
        let Some(Event::StructureBuilt { structure, .. }) = events.first().cloned() else {
            panic!("structure not built: {events:?}");
        };
        let enemy = spawn_enemy(&mut world, WorldPoint::new(14.0, 0.0), 40);
        apply(&mut world, Command::FireProjectile { structure, target: enemy }, &mut events);
        apply(&mut world, Command::WithdrawEnemy { enemy }, &mut events);

        let events = tick(&mut world, 1.0);
        assert!(events.contains(&Event::ProjectileExpired {
            projectile: ProjectileId::new(0),
        }));
    }

    #[test]
    fn gathering_depletes_node_after_configured_charges() {
        let mut world = World::new(
            WorldSettings {
                starting_resources: ResourceBundle::ZERO,
                ..WorldSettings::default()
            },
            11,
        );
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnResourceNode {
                kind: ResourceKind::Metal,
                position: WorldPoint::new(2.0, 2.0),
            },
            &mut events,
        );
        let node = ResourceNodeId::new(0);

        events.clear();
        for _ in 0..4 {
            apply(&mut world, Command::GatherResource { node }, &mut events);
        }

        let gathered: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                Event::ResourceGathered { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect();
        assert_eq!(gathered.len(), 3);
        assert!(gathered.iter().all(|amount| (2..=4).contains(amount)));
        assert_eq!(
            query::resources(&world).metal,
            gathered.iter().sum::<u32>()
        );
        assert!(events.contains(&Event::ResourceNodeRemoved { node }));
        assert_eq!(
            events.last(),
            Some(&Event::GatherRejected {
                node,
                reason: GatherError::MissingNode,
            })
        );
    }

    #[test]
    fn nodes_expire_after_their_lifetime() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnResourceNode {
                kind: ResourceKind::Wood,
                position: WorldPoint::ORIGIN,
            },
            &mut events,
        );

        assert!(!tick(&mut world, 19.5).contains(&Event::ResourceNodeRemoved {
            node: ResourceNodeId::new(0),
        }));
        assert!(tick(&mut world, 0.5).contains(&Event::ResourceNodeRemoved {
            node: ResourceNodeId::new(0),
        }));
        assert!(query::resource_nodes(&world).is_empty());
    }

    #[test]
    fn tick_reports_clock_edges() {
        let mut world = world();
        let events = tick(&mut world, 24.0);

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_secs(24),
                },
                Event::DawnReached { day: 1 },
                Event::DuskReached { day: 1 },
                Event::DayCompleted { days_survived: 2 },
            ]
        );
    }
}
