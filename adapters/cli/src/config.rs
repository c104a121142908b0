//! TOML run configuration for the headless runner.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rampart_simulation::SimulationConfig;
use rampart_world::{TileMap, DEFAULT_BLOCKED_TILES};
use serde::Deserialize;

/// Map used when neither the command line nor the config names one.
///
/// Fifteen columns by ten rows with a single lane down column seven.
pub(crate) const DEFAULT_MAP: &str = "\
222222212222222
222222212222222
222222212222222
222222212222222
222222212222222
222222212222222
222222212222222
222222212222222
222222212222222
222222212222222
";

/// Contents of a run configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    pub(crate) simulation: SimulationConfig,
    pub(crate) map: MapSettings,
}

/// Map source and tile geometry.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MapSettings {
    pub(crate) tile_width: f32,
    pub(crate) tile_height: f32,
    /// Tile identifiers enemies cannot walk across.
    pub(crate) blocked: String,
    /// Inline map text, used when no map file is given.
    pub(crate) tiles: Option<String>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_width: 64.0,
            tile_height: 64.0,
            blocked: DEFAULT_BLOCKED_TILES.iter().collect(),
            tiles: None,
        }
    }
}

impl RunConfig {
    /// Loads a configuration file, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }
}

impl MapSettings {
    /// Builds the tile map from `file`, the inline tiles or the built-in map.
    pub(crate) fn load_map(&self, file: Option<&Path>) -> Result<TileMap> {
        let text = match file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read map {}", path.display()))?,
            None => self
                .tiles
                .clone()
                .unwrap_or_else(|| DEFAULT_MAP.to_owned()),
        };
        let blocked: Vec<char> = self.blocked.chars().collect();
        TileMap::parse(&text, self.tile_width, self.tile_height, &blocked)
            .context("failed to build tile map")
    }
}
