#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances enemies toward the objective.
//!
//! Two models are supported. In the lane model every enemy climbs straight
//! up from the spawn point by a fixed step per tick. In the path model the
//! system holds a tile route and steers each enemy from one route tile to the
//! next. Enemies standing at the objective stop moving and attack instead.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use rampart_core::{
    Command, EnemyId, EnemySnapshot, EnemyView, Event, Objective, SpriteSize, TileCoord, TileGrid,
    WorldPoint, ENEMY_FOOTPRINT,
};

/// How enemies travel toward the objective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovementModel {
    /// Enemies climb straight up from the spawn point.
    #[default]
    Lane,
    /// Enemies follow the tile route supplied through [`Movement::set_route`].
    Path,
}

/// How a path step is split between the two axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stepping {
    /// Each axis advances independently by up to one step.
    ///
    /// Diagonal travel therefore covers up to √2 times the step per tick.
    #[default]
    Axis,
    /// The step is applied along the normalised direction to the waypoint.
    Normalized,
}

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Selected movement model.
    pub model: MovementModel,
    /// World units climbed per tick in the lane model.
    pub lane_step: f32,
    /// World units travelled per tick in the path model.
    pub path_step: f32,
    /// Distance on both axes under which a waypoint counts as reached.
    pub arrival_epsilon: f32,
    /// Axis split used in the path model.
    pub stepping: Stepping,
    /// Step multiplier applied while an enemy is frozen.
    pub freeze_slow: f32,
    /// Sprite footprint used by the objective predicate.
    pub footprint: SpriteSize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: MovementModel::Lane,
            lane_step: 0.5,
            path_step: 1.0,
            arrival_epsilon: 2.0,
            stepping: Stepping::Axis,
            freeze_slow: 0.5,
            footprint: ENEMY_FOOTPRINT,
        }
    }
}

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug)]
pub struct Movement {
    config: Config,
    route: Vec<TileCoord>,
    waypoints: Vec<WorldPoint>,
    cursors: BTreeMap<EnemyId, usize>,
}

impl Movement {
    /// Creates a movement system without a route.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            route: Vec::new(),
            waypoints: Vec::new(),
            cursors: BTreeMap::new(),
        }
    }

    /// Replaces the route followed in the path model.
    ///
    /// Every known enemy resumes from the route tile closest to it.
    pub fn set_route(&mut self, route: Vec<TileCoord>, grid: &TileGrid, enemies: &EnemyView) {
        self.waypoints = route.iter().map(|tile| grid.tile_origin(*tile)).collect();
        self.route = route;
        self.cursors.clear();
        for enemy in enemies.iter() {
            if let Some(index) = self.nearest_waypoint(enemy.position) {
                let _ = self.cursors.insert(enemy.id, index);
            }
        }
    }

    /// Route currently followed in the path model.
    #[must_use]
    pub fn route(&self) -> &[TileCoord] {
        &self.route
    }

    /// Consumes world events and the enemy view to emit movement commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        objective: &Objective,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = None;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = Some(elapsed.unwrap_or(Duration::ZERO).saturating_add(*dt));
            }
        }

        let Some(dt) = elapsed else {
            return;
        };

        let live: Vec<EnemyId> = enemies.iter().map(|enemy| enemy.id).collect();
        self.cursors
            .retain(|enemy, _| live.binary_search(enemy).is_ok());

        for enemy in enemies.iter() {
            if objective.is_reached(enemy.position, self.config.footprint) {
                out.push(Command::AttackObjective { enemy: enemy.id, dt });
                continue;
            }

            let slow = if enemy.is_frozen() {
                self.config.freeze_slow
            } else {
                1.0
            };

            let destination = match self.config.model {
                MovementModel::Path if !self.waypoints.is_empty() => {
                    let step = self.config.path_step * slow;
                    self.follow_route(enemy, step)
                }
                _ => Some(enemy.position.offset(0.0, -self.config.lane_step * slow)),
            };

            if let Some(to) = destination {
                out.push(Command::MoveEnemy { enemy: enemy.id, to });
            }
        }
    }

    fn follow_route(&mut self, enemy: &EnemySnapshot, step: f32) -> Option<WorldPoint> {
        let nearest = self.nearest_waypoint(enemy.position).unwrap_or(0);
        let cursor = self.cursors.entry(enemy.id).or_insert(nearest);
        let target = *self.waypoints.get(*cursor)?;

        let dx = target.x() - enemy.position.x();
        let dy = target.y() - enemy.position.y();
        let epsilon = self.config.arrival_epsilon;
        if dx.abs() <= epsilon && dy.abs() <= epsilon {
            *cursor += 1;
            return None;
        }

        let (step_x, step_y) = match self.config.stepping {
            Stepping::Axis => (dx.clamp(-step, step), dy.clamp(-step, step)),
            Stepping::Normalized => {
                let delta = Vec2::new(dx, dy);
                let advance = if delta.length() <= step {
                    delta
                } else {
                    delta.normalize_or_zero() * step
                };
                (advance.x, advance.y)
            }
        };
        Some(enemy.position.offset(step_x, step_y))
    }

    fn nearest_waypoint(&self, position: WorldPoint) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| position.distance(**a).total_cmp(&position.distance(**b)))
            .map(|(index, _)| index)
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{EnemyKind, WaveId, OBJECTIVE_THRESHOLD_Y};

    fn grid() -> TileGrid {
        TileGrid::new(5, 4, 64.0, 64.0)
    }

    fn enemy(id: u32, position: WorldPoint, frozen_for: Duration) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Goblin,
            wave: WaveId::FIRST,
            position,
            health: 10,
            strength: 5,
            reward: 10,
            attack_timer: Duration::ZERO,
            frozen_for,
        }
    }

    fn tick() -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }
    }

    fn destinations(commands: &[Command]) -> Vec<WorldPoint> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::MoveEnemy { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn lane_model_climbs_and_slows_frozen_enemies() {
        let objective = Objective::for_grid(&grid(), OBJECTIVE_THRESHOLD_Y);
        let view = EnemyView::from_snapshots(vec![
            enemy(0, WorldPoint::new(128.0, 192.0), Duration::ZERO),
            enemy(1, WorldPoint::new(128.0, 192.0), Duration::from_secs(2)),
        ]);
        let mut movement = Movement::default();
        let mut commands = Vec::new();
        movement.handle(&[tick()], &view, &objective, &mut commands);

        assert_eq!(
            destinations(&commands),
            vec![WorldPoint::new(128.0, 191.5), WorldPoint::new(128.0, 191.75)]
        );
    }

    #[test]
    fn enemies_at_objective_attack_instead_of_moving() {
        let objective = Objective::for_grid(&grid(), OBJECTIVE_THRESHOLD_Y);
        let view =
            EnemyView::from_snapshots(vec![enemy(3, WorldPoint::new(128.0, 59.5), Duration::ZERO)]);
        let mut movement = Movement::default();
        let mut commands = Vec::new();
        movement.handle(&[tick()], &view, &objective, &mut commands);

        assert_eq!(
            commands,
            vec![Command::AttackObjective {
                enemy: EnemyId::new(3),
                dt: Duration::from_millis(16),
            }]
        );
    }

    #[test]
    fn nothing_moves_without_time_advancing() {
        let objective = Objective::for_grid(&grid(), OBJECTIVE_THRESHOLD_Y);
        let view =
            EnemyView::from_snapshots(vec![enemy(0, WorldPoint::new(0.0, 100.0), Duration::ZERO)]);
        let mut movement = Movement::default();
        let mut commands = Vec::new();
        movement.handle(&[], &view, &objective, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn axis_stepping_moves_diagonally_and_consumes_tick_on_arrival() {
        let grid = grid();
        let objective = Objective::for_grid(&grid, OBJECTIVE_THRESHOLD_Y);
        let mut movement = Movement::new(Config {
            model: MovementModel::Path,
            path_step: 4.0,
            ..Config::default()
        });
        let start = WorldPoint::new(70.0, 140.0);
        let view = EnemyView::from_snapshots(vec![enemy(0, start, Duration::ZERO)]);
        movement.set_route(
            vec![TileCoord::new(1, 2), TileCoord::new(1, 1)],
            &grid,
            &view,
        );

        let mut commands = Vec::new();
        movement.handle(&[tick()], &view, &objective, &mut commands);
        assert_eq!(destinations(&commands), vec![WorldPoint::new(66.0, 136.0)]);

        let arrived =
            EnemyView::from_snapshots(vec![enemy(0, WorldPoint::new(65.0, 129.0), Duration::ZERO)]);
        commands.clear();
        movement.handle(&[tick()], &arrived, &objective, &mut commands);
        assert!(commands.is_empty());

        movement.handle(&[tick()], &arrived, &objective, &mut commands);
        assert_eq!(destinations(&commands), vec![WorldPoint::new(64.0, 125.0)]);
    }

    #[test]
    fn normalized_stepping_keeps_step_length() {
        let grid = grid();
        let objective = Objective::for_grid(&grid, OBJECTIVE_THRESHOLD_Y);
        let mut movement = Movement::new(Config {
            model: MovementModel::Path,
            path_step: 5.0,
            stepping: Stepping::Normalized,
            ..Config::default()
        });
        let view =
            EnemyView::from_snapshots(vec![enemy(0, WorldPoint::new(30.0, 40.0), Duration::ZERO)]);
        movement.set_route(vec![TileCoord::new(0, 0)], &grid, &view);

        let mut commands = Vec::new();
        movement.handle(&[tick()], &view, &objective, &mut commands);
        let to = destinations(&commands)[0];
        assert!((to.x() - 27.0).abs() < 1e-4);
        assert!((to.y() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn replacing_route_resumes_from_nearest_tile() {
        let grid = grid();
        let objective = Objective::for_grid(&grid, OBJECTIVE_THRESHOLD_Y);
        let mut movement = Movement::new(Config {
            model: MovementModel::Path,
            ..Config::default()
        });
        let view =
            EnemyView::from_snapshots(vec![enemy(0, WorldPoint::new(190.0, 130.0), Duration::ZERO)]);
        movement.set_route(
            vec![
                TileCoord::new(0, 3),
                TileCoord::new(3, 2),
                TileCoord::new(3, 1),
            ],
            &grid,
            &view,
        );

        let mut commands = Vec::new();
        movement.handle(&[tick()], &view, &objective, &mut commands);
        assert!(commands.is_empty(), "enemy already at nearest waypoint");
        assert_eq!(movement.route().len(), 3);

        movement.handle(&[tick()], &view, &objective, &mut commands);
        assert_eq!(destinations(&commands), vec![WorldPoint::new(191.0, 129.0)]);
    }
}
