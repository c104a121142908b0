#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rampart.
//!
//! The world owns the player, the tower registry, the enemy arena and the
//! simulation status. It is mutated exclusively through [`apply`] and read
//! through the functions in [`query`].

mod enemies;
mod navigation;
mod placement;
mod towers;

use std::time::Duration;

use rampart_core::{
    Command, EnemyId, EnemyKind, Event, GridProvider, Objective, PlacementError, PlacementRule,
    SimulationState, TileCoord, TileGrid, TowerId, TowerKind, WaveId, WorldPoint,
    ATTACK_INTERVAL, OBJECTIVE_THRESHOLD_Y,
};
use tracing::{debug, info};

use self::{enemies::EnemyArena, towers::TowerRegistry};

pub use self::{
    navigation::{MapError, TileMap, DEFAULT_BLOCKED_TILES},
    placement::{OpenGround, Unrestricted},
};

const DEFAULT_PLAYER_HEALTH: i32 = 100;
const DEFAULT_PLAYER_CURRENCY: u32 = 50;

/// Tunable parameters applied when the world is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Player health at session start.
    pub starting_health: i32,
    /// Player currency at session start.
    pub starting_currency: u32,
    /// Vertical threshold enemies must cross to stand at the objective.
    pub objective_threshold: f32,
    /// Time an enemy at the objective accumulates between attacks.
    pub attack_interval: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            starting_health: DEFAULT_PLAYER_HEALTH,
            starting_currency: DEFAULT_PLAYER_CURRENCY,
            objective_threshold: OBJECTIVE_THRESHOLD_Y,
            attack_interval: ATTACK_INTERVAL,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    health: i32,
    currency: u32,
}

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    map: TileMap,
    objective: Objective,
    player: Player,
    towers: TowerRegistry,
    enemies: EnemyArena,
    selection: Option<TowerKind>,
    wave: Option<WaveId>,
    state: SimulationState,
    placement_rule: Box<dyn PlacementRule>,
    attack_interval: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a world over the provided map and raises the objective tower.
    ///
    /// Placement uses the [`OpenGround`] rule until replaced through
    /// [`World::with_placement_rule`].
    #[must_use]
    pub fn new(map: TileMap, config: WorldConfig) -> Self {
        let grid = map.tile_grid();
        let objective = Objective::for_grid(&grid, config.objective_threshold);
        let mut towers = TowerRegistry::new();
        let _ = towers.insert(TowerKind::Player, objective.tile(), &grid);

        Self {
            map,
            objective,
            player: Player {
                health: config.starting_health,
                currency: config.starting_currency,
            },
            towers,
            enemies: EnemyArena::new(),
            selection: None,
            wave: None,
            state: SimulationState::Active,
            placement_rule: Box::new(OpenGround),
            attack_interval: config.attack_interval,
            tick_index: 0,
        }
    }

    /// Replaces the predicate that validates tower placement tiles.
    #[must_use]
    pub fn with_placement_rule(mut self, rule: Box<dyn PlacementRule>) -> Self {
        self.placement_rule = rule;
        self
    }

    fn grid(&self) -> TileGrid {
        self.map.tile_grid()
    }

    fn validate_placement(&self, tile: TileCoord) -> Result<TowerKind, PlacementError> {
        if !self.state.is_active() {
            return Err(PlacementError::Defeated);
        }

        let kind = self.selection.ok_or(PlacementError::NoSelection)?;
        if !kind.is_placeable() {
            return Err(PlacementError::NotPlaceable);
        }

        if !self.grid().contains(tile) {
            return Err(PlacementError::OutOfBounds);
        }

        let cost = kind.template().cost;
        if self.player.currency < cost {
            return Err(PlacementError::InsufficientFunds {
                required: cost,
                available: self.player.currency,
            });
        }

        if self.towers.tower_at(tile).is_some() {
            return Err(PlacementError::Occupied);
        }

        self.placement_rule.check(tile, &self.map)?;

        Ok(kind)
    }

    fn place_tower(&mut self, tile: TileCoord, out_events: &mut Vec<Event>) {
        let kind = match self.validate_placement(tile) {
            Ok(kind) => kind,
            Err(reason) => {
                debug!(?tile, kind = ?self.selection, %reason, "tower_placement_rejected");
                out_events.push(Event::TowerPlacementRejected {
                    kind: self.selection,
                    tile,
                    reason,
                });
                return;
            }
        };

        let cost = kind.template().cost;
        let grid = self.grid();
        self.player.currency -= cost;
        let tower = self.towers.insert(kind, tile, &grid);
        info!(
            tower = tower.id.get(),
            ?kind,
            column = tile.column(),
            row = tile.row(),
            currency = self.player.currency,
            "tower_placed"
        );
        out_events.push(Event::TowerPlaced {
            tower: tower.id,
            kind,
            tile,
            anchor: tower.anchor,
            cost,
        });

        self.selection = None;
        out_events.push(Event::TowerSelectionChanged { kind: None });
    }

    fn select_tower(&mut self, kind: TowerKind, out_events: &mut Vec<Event>) {
        if !kind.is_placeable() {
            debug!(?kind, "tower_selection_ignored");
            return;
        }

        self.selection = if self.selection == Some(kind) {
            None
        } else {
            Some(kind)
        };
        out_events.push(Event::TowerSelectionChanged {
            kind: self.selection,
        });
    }

    fn attack_objective(&mut self, enemy_id: EnemyId, dt: Duration, out_events: &mut Vec<Event>) {
        let attack_interval = self.attack_interval;
        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            return;
        };

        enemy.attack_timer = enemy.attack_timer.saturating_add(dt);
        if enemy.attack_timer < attack_interval {
            return;
        }

        enemy.attack_timer = Duration::ZERO;
        let damage = enemy.strength;
        let enemy_wave = enemy.wave;
        self.player.health = self
            .player
            .health
            .saturating_sub(i32::try_from(damage).unwrap_or(i32::MAX));
        out_events.push(Event::ObjectiveStruck {
            enemy: enemy_id,
            damage,
            player_health: self.player.health,
        });

        if self.player.health <= 0 {
            let wave = self.wave.unwrap_or(enemy_wave);
            self.state = SimulationState::Defeated;
            info!(wave = wave.get(), health = self.player.health, "objective_defeated");
            out_events.push(Event::Defeated { wave });
        }
    }

    fn strike_enemy(
        &mut self,
        tower: TowerId,
        enemy_id: EnemyId,
        damage: u32,
        freeze: Option<Duration>,
        out_events: &mut Vec<Event>,
    ) {
        if !self.towers.contains(tower) {
            return;
        }

        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            debug!(enemy = enemy_id.get(), "strike_on_missing_enemy");
            return;
        };

        enemy.health = enemy.health.saturating_sub(damage);
        if enemy.health > 0 {
            let remaining = enemy.health;
            out_events.push(Event::EnemyStruck {
                tower,
                enemy: enemy_id,
                damage,
                remaining,
            });

            if let Some(duration) = freeze {
                enemy.frozen_for = enemy.frozen_for.max(duration);
                out_events.push(Event::EnemyFrozen {
                    enemy: enemy_id,
                    duration: enemy.frozen_for,
                });
            }
            return;
        }

        if let Some(defeated) = self.enemies.remove(enemy_id) {
            self.player.currency = self.player.currency.saturating_add(defeated.reward);
            out_events.push(Event::EnemyDefeated {
                enemy: enemy_id,
                kind: defeated.kind,
                reward: defeated.reward,
            });
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, wave: WaveId, out_events: &mut Vec<Event>) {
        let position = self.grid().spawn_point();
        let enemy = self
            .enemies
            .spawn(kind, wave, position, self.attack_interval);
        if self.wave.map_or(true, |current| current < wave) {
            self.wave = Some(wave);
        }
        out_events.push(Event::EnemySpawned {
            enemy,
            kind,
            wave,
            position,
        });
    }

    fn move_enemy(&mut self, enemy_id: EnemyId, to: WorldPoint, out_events: &mut Vec<Event>) {
        if let Some(enemy) = self.enemies.get_mut(enemy_id) {
            let from = enemy.position;
            enemy.position = to;
            out_events.push(Event::EnemyMoved {
                enemy: enemy_id,
                from,
                to,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the objective has fallen every command is ignored, except placement
/// requests which are answered with [`PlacementError::Defeated`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if !world.state.is_active() {
        if let Command::PlaceTower { tile } = command {
            world.place_tower(tile, out_events);
        }
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            for enemy in world.enemies.iter_mut() {
                enemy.frozen_for = enemy.frozen_for.saturating_sub(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::BeginWave { wave, size } => {
            world.wave = Some(wave);
            info!(wave = wave.get(), size, "wave_started");
            out_events.push(Event::WaveStarted { wave, size });
        }
        Command::SpawnEnemy { kind, wave } => world.spawn_enemy(kind, wave, out_events),
        Command::MoveEnemy { enemy, to } => world.move_enemy(enemy, to, out_events),
        Command::AttackObjective { enemy, dt } => world.attack_objective(enemy, dt, out_events),
        Command::StrikeEnemy {
            tower,
            enemy,
            damage,
            freeze,
        } => world.strike_enemy(tower, enemy, damage, freeze, out_events),
        Command::SelectTower { kind } => world.select_tower(kind, out_events),
        Command::PlaceTower { tile } => world.place_tower(tile, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rampart_core::{
        EnemyView, Objective, PlayerSnapshot, SimulationState, TileCoord, TileGrid, TowerId,
        TowerKind, TowerView, WaveId, WorldPoint,
    };

    use super::{TileMap, World};

    /// Snapshot of the player's health and currency.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            health: world.player.health,
            currency: world.player.currency,
        }
    }

    /// Captures a read-only view of every tower, including the objective tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Tower standing on the provided tile, if any.
    #[must_use]
    pub fn tower_at(world: &World, tile: TileCoord) -> Option<TowerId> {
        world.towers.tower_at(tile)
    }

    /// Provides read-only access to the world's tile map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.map
    }

    /// Dimensions of the world's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> TileGrid {
        world.grid()
    }

    /// Region enemies attack once they reach it.
    #[must_use]
    pub fn objective(world: &World) -> Objective {
        world.objective
    }

    /// Fixed point where enemies enter the map.
    #[must_use]
    pub fn spawn_point(world: &World) -> WorldPoint {
        world.grid().spawn_point()
    }

    /// Tower kind pending placement, if any.
    #[must_use]
    pub fn selection(world: &World) -> Option<TowerKind> {
        world.selection
    }

    /// Most recent wave that started, if any.
    #[must_use]
    pub fn current_wave(world: &World) -> Option<WaveId> {
        world.wave
    }

    /// Terminal status of the simulation.
    #[must_use]
    pub fn simulation_state(world: &World) -> SimulationState {
        world.state
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
