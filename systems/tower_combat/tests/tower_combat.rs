use std::time::Duration;

use dusk_defence_core::{
    BlueprintId, Command, EnemyArchetype, Event, ResourceBundle, WorldPoint,
};
use dusk_defence_system_tower_combat::TowerCombat;
use dusk_defence_world::{self as world, query, World, WorldSettings};

fn pump(world: &mut World, system: &mut TowerCombat, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    system.handle(
        &events,
        &query::structure_view(world),
        &query::enemy_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn turret_grinds_down_enemy_and_reports_one_kill() {
    let mut world = World::new(WorldSettings::default(), 3);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceBase {
            position: WorldPoint::ORIGIN,
            max_health: 100,
            cost: ResourceBundle::splat(10),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::BuildStructure {
            blueprint: BlueprintId::new(0),
            position: WorldPoint::new(4.0, 0.0),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            position: WorldPoint::new(4.0, 3.0),
            archetype: EnemyArchetype {
                max_health: 3,
                ..EnemyArchetype::default()
            },
        },
        &mut events,
    );

    let mut system = TowerCombat::new();
    let mut fired = 0;
    let mut kills = 0;
    for _ in 0..40 {
        for event in pump(&mut world, &mut system, Duration::from_millis(100)) {
            match event {
                Event::ProjectileFired { .. } => fired += 1,
                Event::EnemyDestroyed { .. } => kills += 1,
                _ => {}
            }
        }
    }

    assert_eq!(kills, 1);
    assert!(fired >= 3, "three single-damage hits are required, fired {fired}");
    assert!(fired <= 9, "cooldown of 0.5 s caps shots over 4 s, fired {fired}");
    assert_eq!(query::enemy_count(&world), 0);

    let turret = query::structure_view(&world)
        .iter()
        .find(|structure| !structure.is_main())
        .copied()
        .expect("turret standing");
    assert!(turret.heading > 1.5 && turret.heading < 1.65, "turret faces +y");
}

#[test]
fn base_never_fires() {
    let mut world = World::new(WorldSettings::default(), 3);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceBase {
            position: WorldPoint::ORIGIN,
            max_health: 100,
            cost: ResourceBundle::ZERO,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            position: WorldPoint::new(1.0, 0.0),
            archetype: EnemyArchetype::default(),
        },
        &mut events,
    );

    let mut system = TowerCombat::new();
    let events = pump(&mut world, &mut system, Duration::from_millis(100));

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
}
