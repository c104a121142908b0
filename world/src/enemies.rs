//! Arena holding the live enemies keyed by identifier.

use std::{collections::BTreeMap, time::Duration};

use rampart_core::{EnemyId, EnemyKind, EnemySnapshot, WaveId, WorldPoint};

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) wave: WaveId,
    pub(crate) position: WorldPoint,
    pub(crate) health: u32,
    pub(crate) strength: u32,
    pub(crate) reward: u32,
    pub(crate) attack_timer: Duration,
    pub(crate) frozen_for: Duration,
}

impl EnemyState {
    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            wave: self.wave,
            position: self.position,
            health: self.health,
            strength: self.strength,
            reward: self.reward,
            attack_timer: self.attack_timer,
            frozen_for: self.frozen_for,
        }
    }
}

/// Identifiers are never reused, so a removed enemy cannot be confused with a
/// later spawn.
#[derive(Debug)]
pub(crate) struct EnemyArena {
    entries: BTreeMap<EnemyId, EnemyState>,
    next_enemy_id: EnemyId,
}

impl EnemyArena {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// `attack_timer` is the initial attack charge. A charge of at least one
    /// attack interval lets the enemy strike on its first tick at the objective.
    pub(crate) fn spawn(
        &mut self,
        kind: EnemyKind,
        wave: WaveId,
        position: WorldPoint,
        attack_timer: Duration,
    ) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));

        let stats = kind.stats();
        let _ = self.entries.insert(
            id,
            EnemyState {
                id,
                kind,
                wave,
                position,
                health: stats.health,
                strength: stats.strength,
                reward: stats.reward,
                attack_timer,
                frozen_for: Duration::ZERO,
            },
        );
        id
    }

    pub(crate) fn get_mut(&mut self, enemy: EnemyId) -> Option<&mut EnemyState> {
        self.entries.get_mut(&enemy)
    }

    pub(crate) fn remove(&mut self, enemy: EnemyId) -> Option<EnemyState> {
        self.entries.remove(&enemy)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnemyState> {
        self.entries.values_mut()
    }
}
