//! Command-line arguments accepted by the headless runner.

use std::{path::PathBuf, str::FromStr};

use clap::{Parser, ValueEnum};
use rampart_core::{TileCoord, TowerKind};
use rampart_simulation::{MovementMode, PlacementRuleKind};
use thiserror::Error;

/// Headless Rampart tower-defence simulation.
#[derive(Debug, Parser)]
#[command(name = "rampart", version, about)]
pub(crate) struct Cli {
    /// TOML file with `[simulation]` and `[map]` tables.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Text map, one character per tile. Overrides the configured map.
    #[arg(long)]
    pub(crate) map: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_000)]
    pub(crate) ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    pub(crate) dt_ms: u64,
    /// Wave started when the run begins.
    #[arg(long, default_value_t = 1)]
    pub(crate) wave: u32,
    /// Tower placed before the first tick, written `kind@column,row`.
    #[arg(long = "place", value_name = "KIND@COLUMN,ROW")]
    pub(crate) placements: Vec<PlacementSpec>,
    /// Overrides the configured movement model.
    #[arg(long, value_enum)]
    pub(crate) movement: Option<MovementArg>,
    /// Overrides the configured placement rule.
    #[arg(long, value_enum)]
    pub(crate) placement_rule: Option<PlacementRuleArg>,
    /// Overrides the configured starting currency.
    #[arg(long)]
    pub(crate) currency: Option<u32>,
}

/// Movement model accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum MovementArg {
    /// Straight climb from the spawn point.
    Lane,
    /// Shortest tile route.
    Path,
}

impl From<MovementArg> for MovementMode {
    fn from(value: MovementArg) -> Self {
        match value {
            MovementArg::Lane => Self::Lane,
            MovementArg::Path => Self::Path,
        }
    }
}

/// Placement rule accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlacementRuleArg {
    /// Free tiles off the enemy path.
    OpenGround,
    /// Any tile inside the map.
    Unrestricted,
}

impl From<PlacementRuleArg> for PlacementRuleKind {
    fn from(value: PlacementRuleArg) -> Self {
        match value {
            PlacementRuleArg::OpenGround => Self::OpenGround,
            PlacementRuleArg::Unrestricted => Self::Unrestricted,
        }
    }
}

/// Errors raised while parsing a `--place` value.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PlacementSpecError {
    /// The value did not contain a `@` separator.
    #[error("expected `kind@column,row`")]
    MissingSeparator,
    /// The tower kind was not one of the buildable kinds.
    #[error("unknown tower kind `{0}`")]
    UnknownKind(String),
    /// The tile coordinates were not two unsigned integers.
    #[error("invalid tile `{0}`")]
    InvalidTile(String),
}

/// Tower placement requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlacementSpec {
    pub(crate) kind: TowerKind,
    pub(crate) tile: TileCoord,
}

impl FromStr for PlacementSpec {
    type Err = PlacementSpecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, tile) = value
            .split_once('@')
            .ok_or(PlacementSpecError::MissingSeparator)?;

        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "archer" => TowerKind::Archer,
            "magic" => TowerKind::Magic,
            "stone" => TowerKind::Stone,
            "ice" => TowerKind::Ice,
            other => return Err(PlacementSpecError::UnknownKind(other.to_owned())),
        };

        let invalid = || PlacementSpecError::InvalidTile(tile.to_owned());
        let (column, row) = tile.split_once(',').ok_or_else(invalid)?;
        let column = column.trim().parse().map_err(|_| invalid())?;
        let row = row.trim().parse().map_err(|_| invalid())?;

        Ok(Self {
            kind,
            tile: TileCoord::new(column, row),
        })
    }
}
