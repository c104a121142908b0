#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rampart simulation session.
//!
//! A [`Simulation`] owns the authoritative world together with every pure
//! system and drives them through the fixed per-tick pipeline: the wave
//! scheduler releases enemies, movement advances them or triggers their
//! attacks on the objective, and combat resolves tower strikes. Commands are
//! applied to the world as soon as a system emits them, so each system sees
//! the state left behind by the previous one.

mod config;

use std::time::Duration;

use rampart_core::{
    Command, EnemyView, Event, GridProvider, PlayerSnapshot, SimulationState, TileCoord,
    TowerKind, TowerView, WaveId,
};
use rampart_system_builder::{Builder, BuilderInput};
use rampart_system_combat::Combat;
use rampart_system_movement::Movement;
use rampart_system_waves::{WavePhase, WaveScheduler};
use rampart_world::{self as world, query, OpenGround, TileMap, Unrestricted, World};
use tracing::{debug, warn};

pub use self::config::{
    ConfigError, MovementMode, PathStepping, PlacementRuleKind, SimulationConfig,
};

/// Read-only state handed to render sinks after every step.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Player health and currency.
    pub player: PlayerSnapshot,
    /// Every tower, including the objective tower.
    pub towers: TowerView,
    /// Live enemies.
    pub enemies: EnemyView,
    /// Most recent wave that started.
    pub wave: Option<WaveId>,
    /// Lifecycle phase of the current wave.
    pub phase: WavePhase,
    /// Terminal status of the session.
    pub state: SimulationState,
    /// Tower kind pending placement.
    pub selection: Option<TowerKind>,
    /// Whether the tower management panel is open.
    pub panel_open: bool,
    /// Ticks processed since the session started.
    pub tick: u64,
}

/// Session object owning the world and the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    waves: WaveScheduler,
    movement: Movement,
    combat: Combat,
    builder: Builder,
}

impl Simulation {
    /// Builds a session over the provided map.
    ///
    /// No wave runs until [`Simulation::start_wave`] is called. In the path
    /// model the route from the spawn point to the objective is planned
    /// immediately.
    pub fn new(map: TileMap, config: &SimulationConfig) -> Result<Self, ConfigError> {
        let world = World::new(map, config.world_config()?);
        let world = match config.placement {
            PlacementRuleKind::OpenGround => world.with_placement_rule(Box::new(OpenGround)),
            PlacementRuleKind::Unrestricted => world.with_placement_rule(Box::new(Unrestricted)),
        };

        let mut simulation = Self {
            world,
            waves: WaveScheduler::new(config.wave_config()?),
            movement: Movement::new(config.movement_config()?),
            combat: Combat::new(),
            builder: Builder::new(),
        };

        if config.movement == MovementMode::Path && !simulation.request_route() {
            warn!("no_route_to_objective");
        }

        Ok(simulation)
    }

    /// Starts the provided wave immediately, replacing any wave in progress.
    ///
    /// Ignored once the objective has fallen.
    pub fn start_wave(&mut self, wave: WaveId) -> Vec<Event> {
        if !query::simulation_state(&self.world).is_active() {
            debug!(wave = wave.get(), "wave_start_ignored");
            return Vec::new();
        }

        let mut commands = Vec::new();
        self.waves.start_wave(wave, &mut commands);
        self.dispatch(commands)
    }

    /// Advances the session by one tick of `dt` simulated time.
    ///
    /// Returns every event produced during the tick. A defeated session
    /// produces no events.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = self.dispatch(vec![Command::Tick { dt }]);
        if events.is_empty() {
            return events;
        }

        let mut commands = Vec::new();
        self.waves.handle(&events, &mut commands);
        let spawned = self.dispatch(commands);
        events.extend(spawned);

        let mut commands = Vec::new();
        self.movement.handle(
            &events,
            &query::enemy_view(&self.world),
            &query::objective(&self.world),
            &mut commands,
        );
        let moved = self.dispatch(commands);
        events.extend(moved);

        let mut commands = Vec::new();
        self.combat.handle(
            &events,
            &query::tower_view(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        let resolved = self.dispatch(commands);
        events.extend(resolved);

        events
    }

    /// Makes `kind` the pending selection, or clears it if already pending.
    pub fn select_tower(&mut self, kind: TowerKind) -> Vec<Event> {
        self.dispatch(vec![Command::SelectTower { kind }])
    }

    /// Places the pending tower kind on `tile`.
    pub fn place_tower(&mut self, tile: TileCoord) -> Vec<Event> {
        self.dispatch(vec![Command::PlaceTower { tile }])
    }

    /// Translates one frame of pointer input into selection and placement.
    pub fn handle_input(&mut self, input: BuilderInput) -> Vec<Event> {
        let mut commands = Vec::new();
        let grid = query::tile_grid(&self.world);
        self.builder.handle(&[], input, &grid, &mut commands);
        self.dispatch(commands)
    }

    /// Plans the shortest route from the spawn point to the objective and
    /// hands it to the movement system.
    ///
    /// Returns `false` and keeps the previous route when no route exists.
    pub fn request_route(&mut self) -> bool {
        let grid = query::tile_grid(&self.world);
        let Some(start) = grid.tile_at(query::spawn_point(&self.world)) else {
            return false;
        };
        let goal = query::objective(&self.world).tile();
        let Some(route) = query::tile_map(&self.world).find_path(start, goal) else {
            return false;
        };

        debug!(tiles = route.len(), "route_planned");
        self.movement
            .set_route(route, &grid, &query::enemy_view(&self.world));
        true
    }

    /// Route followed by enemies in the path model.
    #[must_use]
    pub fn route(&self) -> &[TileCoord] {
        self.movement.route()
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Captures the state a render sink needs to draw the session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: query::player(&self.world),
            towers: query::tower_view(&self.world),
            enemies: query::enemy_view(&self.world),
            wave: query::current_wave(&self.world),
            phase: self.waves.phase(),
            state: query::simulation_state(&self.world),
            selection: query::selection(&self.world),
            panel_open: self.builder.is_panel_open(),
            tick: query::tick_index(&self.world),
        }
    }

    fn dispatch(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        if !events.is_empty() {
            let grid = query::tile_grid(&self.world);
            let mut ignored = Vec::new();
            self.builder
                .handle(&events, BuilderInput::default(), &grid, &mut ignored);
        }
        events
    }
}
