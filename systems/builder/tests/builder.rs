use rampart_core::{Command, Event, TileCoord, TileGrid, TowerKind, WorldPoint};
use rampart_system_builder::{Builder, BuilderInput};
use rampart_world::{self as world, query, TileMap, World, WorldConfig, DEFAULT_BLOCKED_TILES};

fn grid() -> TileGrid {
    TileGrid::new(5, 4, 64.0, 64.0)
}

fn selected(kind: TowerKind) -> Event {
    Event::TowerSelectionChanged { kind: Some(kind) }
}

#[test]
fn click_without_selection_is_ignored() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput::click(WorldPoint::new(10.0, 10.0)),
        &grid(),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn click_converts_pointer_into_tile() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[selected(TowerKind::Archer)],
        BuilderInput::click(WorldPoint::new(130.0, 200.0)),
        &grid(),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            tile: TileCoord::new(2, 3),
        }],
        "builder should emit a placement command for the tile under the pointer",
    );
}

#[test]
fn click_outside_map_is_ignored() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[selected(TowerKind::Archer)],
        BuilderInput::click(WorldPoint::new(400.0, 10.0)),
        &grid(),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn open_panel_blocks_placement() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[selected(TowerKind::Magic)],
        BuilderInput {
            toggle_panel: true,
            ..BuilderInput::click(WorldPoint::new(10.0, 10.0))
        },
        &grid(),
        &mut commands,
    );
    assert!(commands.is_empty());

    builder.handle(
        &[],
        BuilderInput {
            toggle_panel: true,
            ..BuilderInput::click(WorldPoint::new(10.0, 10.0))
        },
        &grid(),
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            tile: TileCoord::new(0, 0),
        }]
    );
}

#[test]
fn selection_follows_world_through_placement() {
    let map = TileMap::from_rows(
        &["22122", "22122", "22122", "22122"],
        64.0,
        64.0,
        &DEFAULT_BLOCKED_TILES,
    )
    .expect("valid map");
    let mut world = World::new(map, WorldConfig::default());
    let grid = query::tile_grid(&world);
    let mut builder = Builder::new();

    let mut events = Vec::new();
    let mut commands = Vec::new();
    builder.handle(
        &events,
        BuilderInput::select(TowerKind::Archer),
        &grid,
        &mut commands,
    );
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(builder.selection(), None);

    builder.handle(
        &events,
        BuilderInput::click(WorldPoint::new(10.0, 200.0)),
        &grid,
        &mut commands,
    );
    assert_eq!(builder.selection(), Some(TowerKind::Archer));
    events.clear();
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(query::tower_at(&world, TileCoord::new(0, 3)).map(|id| id.get()), Some(1));
    assert_eq!(query::player(&world).currency, 30);

    builder.handle(&events, BuilderInput::default(), &grid, &mut commands);
    assert_eq!(builder.selection(), None);
    assert!(commands.is_empty());
}
