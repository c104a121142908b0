//! Session configuration and its validation.

use std::time::Duration;

use rampart_core::{ATTACK_INTERVAL, OBJECTIVE_THRESHOLD_Y, SPAWN_INTERVAL, WAVE_GAP};
use rampart_system_movement::{Config as MovementConfig, MovementModel, Stepping};
use rampart_system_waves::Config as WaveConfig;
use rampart_world::WorldConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while validating a [`SimulationConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A duration was negative, zero or not finite.
    #[error("`{field}` must be a positive number of seconds, got {value}")]
    InvalidDuration {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value in seconds.
        value: f64,
    },
    /// A coordinate was NaN or infinite.
    #[error("`{field}` must be a finite number, got {value}")]
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// A distance or multiplier was negative, zero or not finite.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
}

/// Movement model selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// Enemies climb straight up toward the objective.
    #[default]
    Lane,
    /// Enemies follow the shortest tile route to the objective.
    Path,
}

/// Axis split selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStepping {
    /// Independent per-axis steps.
    #[default]
    Axis,
    /// Steps along the normalised direction.
    Normalized,
}

/// Placement rule selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRuleKind {
    /// Towers stand only on free tiles off the enemy path.
    #[default]
    OpenGround,
    /// Any tile inside the map accepts a tower.
    Unrestricted,
}

/// Tunable parameters of a simulation session.
///
/// Every field has a default, so a partial TOML table is enough.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Player health at session start.
    pub starting_health: i32,
    /// Player currency at session start.
    pub starting_currency: u32,
    /// Seconds between two spawns of a wave.
    pub spawn_interval: f64,
    /// Seconds between the last spawn of a wave and the next wave.
    pub wave_gap: f64,
    /// Seconds between two attacks of an enemy at the objective.
    pub attack_interval: f64,
    /// Vertical threshold enemies must cross to stand at the objective.
    pub objective_threshold: f32,
    /// Movement model.
    pub movement: MovementMode,
    /// World units climbed per tick in the lane model.
    pub lane_step: f32,
    /// World units travelled per tick in the path model.
    pub path_step: f32,
    /// Waypoint arrival distance in the path model.
    pub arrival_epsilon: f32,
    /// Axis split in the path model.
    pub stepping: PathStepping,
    /// Step multiplier while an enemy is frozen.
    pub freeze_slow: f32,
    /// Rule deciding which tiles accept towers.
    pub placement: PlacementRuleKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        let movement = MovementConfig::default();
        Self {
            starting_health: world.starting_health,
            starting_currency: world.starting_currency,
            spawn_interval: SPAWN_INTERVAL.as_secs_f64(),
            wave_gap: WAVE_GAP.as_secs_f64(),
            attack_interval: ATTACK_INTERVAL.as_secs_f64(),
            objective_threshold: OBJECTIVE_THRESHOLD_Y,
            movement: MovementMode::Lane,
            lane_step: movement.lane_step,
            path_step: movement.path_step,
            arrival_epsilon: movement.arrival_epsilon,
            stepping: PathStepping::Axis,
            freeze_slow: movement.freeze_slow,
            placement: PlacementRuleKind::OpenGround,
        }
    }
}

impl SimulationConfig {
    pub(crate) fn world_config(&self) -> Result<WorldConfig, ConfigError> {
        Ok(WorldConfig {
            starting_health: self.starting_health,
            starting_currency: self.starting_currency,
            objective_threshold: finite("objective_threshold", self.objective_threshold)?,
            attack_interval: seconds("attack_interval", self.attack_interval)?,
        })
    }

    pub(crate) fn wave_config(&self) -> Result<WaveConfig, ConfigError> {
        Ok(WaveConfig::new(
            seconds("spawn_interval", self.spawn_interval)?,
            seconds("wave_gap", self.wave_gap)?,
        ))
    }

    pub(crate) fn movement_config(&self) -> Result<MovementConfig, ConfigError> {
        Ok(MovementConfig {
            model: match self.movement {
                MovementMode::Lane => MovementModel::Lane,
                MovementMode::Path => MovementModel::Path,
            },
            lane_step: positive("lane_step", self.lane_step)?,
            path_step: positive("path_step", self.path_step)?,
            arrival_epsilon: positive("arrival_epsilon", self.arrival_epsilon)?,
            stepping: match self.stepping {
                PathStepping::Axis => Stepping::Axis,
                PathStepping::Normalized => Stepping::Normalized,
            },
            freeze_slow: positive("freeze_slow", self.freeze_slow)?,
            ..MovementConfig::default()
        })
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(ConfigError::InvalidDuration { field, value }),
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
