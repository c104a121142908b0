#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system resolving tower strikes against enemies in range.
//!
//! Every tick each tower strikes every live enemy within its range once.
//! Towers are scanned in placement order and enemies in spawn order. The
//! system tracks the health it has already committed to strikes so an enemy
//! killed earlier in the scan receives no further strikes.

use rampart_core::{Command, EnemyId, EnemyView, Event, TowerView, WorldPoint};

/// Combat system that reuses a scratch buffer of enemy health.
#[derive(Debug, Default)]
pub struct Combat {
    health_workspace: Vec<EnemyHealth>,
}

#[derive(Clone, Copy, Debug)]
struct EnemyHealth {
    id: EnemyId,
    position: WorldPoint,
    remaining: u32,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::StrikeEnemy` for every tower and enemy pair in range.
    pub fn handle(
        &mut self,
        events: &[Event],
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.prepare_health_workspace(enemies);
        if self.health_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            if tower.damage == 0 {
                continue;
            }

            for enemy in &mut self.health_workspace {
                if enemy.remaining == 0 {
                    continue;
                }

                if tower.anchor.distance(enemy.position) > tower.range {
                    continue;
                }

                enemy.remaining = enemy.remaining.saturating_sub(tower.damage);
                out.push(Command::StrikeEnemy {
                    tower: tower.id,
                    enemy: enemy.id,
                    damage: tower.damage,
                    freeze: tower.freeze,
                });
            }
        }
    }

    fn prepare_health_workspace(&mut self, enemies: &EnemyView) {
        self.health_workspace.clear();
        self.health_workspace
            .extend(enemies.iter().map(|enemy| EnemyHealth {
                id: enemy.id,
                position: enemy.position,
                remaining: enemy.health,
            }));
    }
}
