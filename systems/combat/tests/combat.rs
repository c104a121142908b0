use std::time::Duration;

use rampart_core::{Command, EnemyId, EnemyKind, Event, TileCoord, TowerKind, WaveId};
use rampart_system_combat::Combat;
use rampart_world::{
    self as world, query, TileMap, Unrestricted, World, WorldConfig, DEFAULT_BLOCKED_TILES,
};

fn world(currency: u32) -> World {
    let map = TileMap::from_rows(
        &["22122", "22122", "22122", "22122"],
        64.0,
        64.0,
        &DEFAULT_BLOCKED_TILES,
    )
    .expect("valid map");
    World::new(
        map,
        WorldConfig {
            starting_currency: currency,
            ..WorldConfig::default()
        },
    )
}

fn run(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn place(world: &mut World, kind: TowerKind, tile: TileCoord) {
    let events = run(
        world,
        [Command::SelectTower { kind }, Command::PlaceTower { tile }],
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::TowerPlaced { .. })),
        "placement failed: {events:?}"
    );
}

fn combat_tick(world: &mut World, combat: &mut Combat) -> Vec<Event> {
    let mut events = run(
        world,
        [Command::Tick {
            dt: Duration::from_millis(100),
        }],
    );
    let mut commands = Vec::new();
    combat.handle(
        &events,
        &query::tower_view(world),
        &query::enemy_view(world),
        &mut commands,
    );
    events.extend(run(world, commands));
    events
}

#[test]
fn removals_match_currency_credits() {
    let mut world = world(500);
    place(&mut world, TowerKind::Archer, TileCoord::new(1, 3));
    place(&mut world, TowerKind::Magic, TileCoord::new(3, 3));
    let spent = 500 - query::player(&world).currency;

    let _ = run(
        &mut world,
        (0..4).map(|_| Command::SpawnEnemy {
            kind: EnemyKind::Goblin,
            wave: WaveId::FIRST,
        }),
    );
    let _ = run(
        &mut world,
        (0..2).map(|_| Command::SpawnEnemy {
            kind: EnemyKind::Wizard,
            wave: WaveId::FIRST,
        }),
    );

    let mut combat = Combat::new();
    let mut removed = 0;
    let mut credited = 0;
    for _ in 0..5 {
        for event in combat_tick(&mut world, &mut combat) {
            if let Event::EnemyDefeated { reward, .. } = event {
                removed += 1;
                credited += reward;
            }
        }
    }

    assert_eq!(removed, 6);
    assert_eq!(credited, 4 * 10 + 2 * 30);
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::player(&world).currency, 500 - spent + credited);
}

#[test]
fn ice_strikes_slow_enemies_for_five_seconds() {
    let mut world = world(60).with_placement_rule(Box::new(Unrestricted));
    place(&mut world, TowerKind::Ice, TileCoord::new(2, 3));
    let _ = run(
        &mut world,
        [Command::SpawnEnemy {
            kind: EnemyKind::Berserker,
            wave: WaveId::FIRST,
        }],
    );

    let mut combat = Combat::new();
    let events = combat_tick(&mut world, &mut combat);

    assert!(events.contains(&Event::EnemyFrozen {
        enemy: EnemyId::new(0),
        duration: Duration::from_secs(5),
    }));
    let enemy = query::enemy_view(&world).into_vec()[0];
    assert_eq!(enemy.health, 30);
    assert!(enemy.is_frozen());
}

#[test]
fn defeat_halts_combat() {
    let mut world = world(20);
    place(&mut world, TowerKind::Archer, TileCoord::new(1, 3));
    let _ = run(
        &mut world,
        [Command::SpawnEnemy {
            kind: EnemyKind::Berserker,
            wave: WaveId::FIRST,
        }],
    );
    let events = run(
        &mut world,
        (0..5).map(|_| Command::AttackObjective {
            enemy: EnemyId::new(0),
            dt: Duration::from_secs(1),
        }),
    );
    assert!(events.contains(&Event::Defeated {
        wave: WaveId::FIRST,
    }));
    assert!(!query::simulation_state(&world).is_active());

    let mut combat = Combat::new();
    let events = combat_tick(&mut world, &mut combat);
    assert!(events.is_empty());
    assert_eq!(query::enemy_view(&world).into_vec()[0].health, 40);
}
