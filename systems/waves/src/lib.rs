#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler emitting wave and enemy spawn commands.
//!
//! The scheduler alternates between two phases. While spawning it releases
//! the next enemy of the wave composition each time the spawn interval
//! elapses. Once the composition is exhausted it waits for the wave gap and
//! then starts the following wave.

use std::time::Duration;

use rampart_core::{Command, EnemyKind, Event, WaveId, SPAWN_INTERVAL, WAVE_GAP};

const WAVE_TABLE: [(EnemyKind, u32); 4] = [
    (EnemyKind::Goblin, 10),
    (EnemyKind::Knight, 8),
    (EnemyKind::Wizard, 6),
    (EnemyKind::Berserker, 5),
];

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: Duration,
    wave_gap: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and gap.
    #[must_use]
    pub const fn new(spawn_interval: Duration, wave_gap: Duration) -> Self {
        Self {
            spawn_interval,
            wave_gap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL, WAVE_GAP)
    }
}

/// Enemies spawned by the provided wave, in spawn order.
///
/// Waves past the end of the table repeat it from the start.
#[must_use]
pub fn composition(wave: WaveId) -> Vec<EnemyKind> {
    let Some(index) = wave.get().checked_sub(1) else {
        return Vec::new();
    };
    let (kind, count) = WAVE_TABLE[index as usize % WAVE_TABLE.len()];
    (0..count).map(|_| kind).collect()
}

/// Lifecycle phase of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave has been started yet.
    Idle,
    /// Enemies of the wave are still being released.
    Spawning {
        /// Enemies already released.
        spawned: usize,
        /// Total enemies in the wave.
        total: usize,
    },
    /// The composition is exhausted and the gap timer runs.
    Waiting {
        /// Time elapsed since the last enemy of the wave was released.
        elapsed: Duration,
    },
}

/// Pure system that releases wave enemies as simulated time advances.
#[derive(Debug)]
pub struct WaveScheduler {
    spawn_interval: Duration,
    wave_gap: Duration,
    wave: Option<WaveId>,
    composition: Vec<EnemyKind>,
    cursor: usize,
    spawn_accumulator: Duration,
    gap_timer: Duration,
}

impl WaveScheduler {
    /// Creates an idle scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            wave_gap: config.wave_gap,
            wave: None,
            composition: Vec::new(),
            cursor: 0,
            spawn_accumulator: Duration::ZERO,
            gap_timer: Duration::ZERO,
        }
    }

    /// Materialises the composition of `wave` and announces it.
    ///
    /// No enemy is released until the spawn interval has elapsed once.
    pub fn start_wave(&mut self, wave: WaveId, out: &mut Vec<Command>) {
        self.wave = Some(wave);
        self.composition = composition(wave);
        self.cursor = 0;
        self.spawn_accumulator = Duration::ZERO;
        self.gap_timer = Duration::ZERO;
        out.push(Command::BeginWave {
            wave,
            size: u32::try_from(self.composition.len()).unwrap_or(u32::MAX),
        });
    }

    /// Consumes world events and emits spawn and wave commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let Some(wave) = self.wave else {
            return;
        };

        for event in events {
            let Event::TimeAdvanced { dt } = event else {
                continue;
            };

            if self.cursor < self.composition.len() {
                self.spawn_accumulator = self.spawn_accumulator.saturating_add(*dt);
                if self.spawn_accumulator >= self.spawn_interval {
                    out.push(Command::SpawnEnemy {
                        kind: self.composition[self.cursor],
                        wave,
                    });
                    self.cursor += 1;
                    self.spawn_accumulator = Duration::ZERO;
                }
            } else {
                self.gap_timer = self.gap_timer.saturating_add(*dt);
                if self.gap_timer >= self.wave_gap {
                    self.start_wave(wave.next(), out);
                    return;
                }
            }
        }
    }

    /// Wave currently spawning or waiting, if any.
    #[must_use]
    pub fn current_wave(&self) -> Option<WaveId> {
        self.wave
    }

    /// Reports the lifecycle phase of the current wave.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        if self.wave.is_none() {
            WavePhase::Idle
        } else if self.cursor < self.composition.len() {
            WavePhase::Spawning {
                spawned: self.cursor,
                total: self.composition.len(),
            }
        } else {
            WavePhase::Waiting {
                elapsed: self.gap_timer,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(seconds: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_secs(seconds),
        }
    }

    #[test]
    fn composition_matches_wave_table() {
        assert_eq!(composition(WaveId::new(1)), vec![EnemyKind::Goblin; 10]);
        assert_eq!(composition(WaveId::new(2)), vec![EnemyKind::Knight; 8]);
        assert_eq!(composition(WaveId::new(3)), vec![EnemyKind::Wizard; 6]);
        assert_eq!(composition(WaveId::new(4)), vec![EnemyKind::Berserker; 5]);
    }

    #[test]
    fn composition_repeats_after_last_wave() {
        assert_eq!(composition(WaveId::new(5)), composition(WaveId::new(1)));
        assert_eq!(composition(WaveId::new(8)), composition(WaveId::new(4)));
        assert!(composition(WaveId::new(0)).is_empty());
    }

    #[test]
    fn idle_scheduler_ignores_time() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let mut commands = Vec::new();
        scheduler.handle(&[tick(100)], &mut commands);
        assert!(commands.is_empty());
        assert_eq!(scheduler.phase(), WavePhase::Idle);
    }

    #[test]
    fn releases_at_most_one_enemy_per_tick() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let mut commands = Vec::new();
        scheduler.start_wave(WaveId::FIRST, &mut commands);
        commands.clear();

        scheduler.handle(&[tick(40)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::SpawnEnemy {
                kind: EnemyKind::Goblin,
                wave: WaveId::FIRST,
            }]
        );
        assert_eq!(
            scheduler.phase(),
            WavePhase::Spawning {
                spawned: 1,
                total: 10,
            }
        );
    }

    #[test]
    fn waits_for_gap_before_next_wave() {
        let config = Config::new(Duration::from_secs(1), Duration::from_secs(3));
        let mut scheduler = WaveScheduler::new(config);
        let mut commands = Vec::new();
        scheduler.start_wave(WaveId::new(4), &mut commands);

        for _ in 0..5 {
            scheduler.handle(&[tick(1)], &mut commands);
        }
        assert_eq!(
            scheduler.phase(),
            WavePhase::Waiting {
                elapsed: Duration::ZERO,
            }
        );

        commands.clear();
        scheduler.handle(&[tick(1), tick(1)], &mut commands);
        assert!(commands.is_empty());

        scheduler.handle(&[tick(1)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::BeginWave {
                wave: WaveId::new(5),
                size: 10,
            }]
        );
        assert_eq!(scheduler.current_wave(), Some(WaveId::new(5)));
    }
}
