//! Tile map and shortest-path search backing the world's grid provider.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BinaryHeap},
};

use rampart_core::{GridProvider, TileCoord, TileGrid};
use thiserror::Error;

/// Tile identifiers enemies cannot walk across unless configured otherwise.
pub const DEFAULT_BLOCKED_TILES: [char; 2] = ['2', '3'];

/// Errors raised while building a [`TileMap`] from textual map data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// The map contained no tile rows.
    #[error("map contains no tiles")]
    Empty,
    /// A row length differed from the first row.
    #[error("row {row} has {found} tiles but {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Tile count of the first row.
        expected: usize,
        /// Tile count of the offending row.
        found: usize,
    },
    /// Tiles must have a positive size.
    #[error("tile size {width}x{height} must be positive")]
    InvalidTileSize {
        /// Configured tile width.
        width: f32,
        /// Configured tile height.
        height: f32,
    },
}

/// Walkability grid built from a character-per-tile map.
///
/// Each character is a tile identifier. Identifiers listed as blocked are not
/// walkable; every other tile belongs to the enemy path network.
#[derive(Clone, Debug)]
pub struct TileMap {
    grid: TileGrid,
    tiles: Vec<char>,
    walkable: Vec<bool>,
}

impl TileMap {
    /// Parses newline-separated rows of tile identifiers.
    ///
    /// Blank lines and trailing whitespace are ignored.
    pub fn parse(
        text: &str,
        tile_width: f32,
        tile_height: f32,
        blocked: &[char],
    ) -> Result<Self, MapError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows, tile_width, tile_height, blocked)
    }

    /// Builds a map from rows of tile identifiers.
    pub fn from_rows<S>(
        rows: &[S],
        tile_width: f32,
        tile_height: f32,
        blocked: &[char],
    ) -> Result<Self, MapError>
    where
        S: AsRef<str>,
    {
        if !(tile_width > 0.0 && tile_height > 0.0) {
            return Err(MapError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        let mut tiles = Vec::new();
        let mut expected = None;
        for (row, line) in rows.iter().enumerate() {
            let before = tiles.len();
            tiles.extend(line.as_ref().chars());
            let found = tiles.len() - before;
            match expected {
                None => expected = Some(found),
                Some(expected) if expected != found => {
                    return Err(MapError::RaggedRow {
                        row,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }

        let columns = expected.unwrap_or(0);
        if columns == 0 {
            return Err(MapError::Empty);
        }

        let walkable = tiles.iter().map(|id| !blocked.contains(id)).collect();
        let grid = TileGrid::new(
            u32::try_from(columns).unwrap_or(u32::MAX),
            u32::try_from(rows.len()).unwrap_or(u32::MAX),
            tile_width,
            tile_height,
        );

        Ok(Self {
            grid,
            tiles,
            walkable,
        })
    }

    /// Identifier of the tile, if it lies inside the map.
    #[must_use]
    pub fn tile_id(&self, tile: TileCoord) -> Option<char> {
        self.index(tile).and_then(|index| self.tiles.get(index).copied())
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if !self.grid.contains(tile) {
            return None;
        }
        let width = usize::try_from(self.grid.columns()).ok()?;
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl GridProvider for TileMap {
    fn tile_grid(&self) -> TileGrid {
        self.grid
    }

    fn is_walkable(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    fn find_path(&self, start: TileCoord, end: TileCoord) -> Option<Vec<TileCoord>> {
        if !self.is_walkable(start) || !self.is_walkable(end) {
            return None;
        }

        let mut open = BinaryHeap::new();
        let mut came_from: BTreeMap<TileCoord, TileCoord> = BTreeMap::new();
        let mut best_cost: BTreeMap<TileCoord, u32> = BTreeMap::new();
        let _ = best_cost.insert(start, 0);
        open.push(OpenNode {
            estimate: start.manhattan_distance(end),
            cost: 0,
            tile: start,
        });

        while let Some(OpenNode { cost, tile, .. }) = open.pop() {
            if tile == end {
                return Some(reconstruct_path(&came_from, end));
            }

            if best_cost.get(&tile).is_some_and(|best| *best < cost) {
                continue;
            }

            let next_cost = cost.saturating_add(1);
            for neighbor in neighbors(tile, &self.grid) {
                if !self.is_walkable(neighbor) {
                    continue;
                }

                if best_cost
                    .get(&neighbor)
                    .is_some_and(|known| *known <= next_cost)
                {
                    continue;
                }

                let _ = best_cost.insert(neighbor, next_cost);
                let _ = came_from.insert(neighbor, tile);
                open.push(OpenNode {
                    estimate: next_cost.saturating_add(neighbor.manhattan_distance(end)),
                    cost: next_cost,
                    tile: neighbor,
                });
            }
        }

        None
    }
}

/// Frontier entry ordered so the heap pops the lowest estimate first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    estimate: u32,
    cost: u32,
    tile: TileCoord,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.tile.cmp(&self.tile))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct_path(came_from: &BTreeMap<TileCoord, TileCoord>, end: TileCoord) -> Vec<TileCoord> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = came_from.get(&current) {
        current = *previous;
        path.push(current);
    }
    path.reverse();
    path
}

fn neighbors(tile: TileCoord, grid: &TileGrid) -> impl Iterator<Item = TileCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = tile.row().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(tile.column(), row));
        count += 1;
    }

    if let Some(column) = tile.column().checked_add(1) {
        if column < grid.columns() {
            candidates[count] = Some(TileCoord::new(column, tile.row()));
            count += 1;
        }
    }

    if let Some(row) = tile.row().checked_add(1) {
        if row < grid.rows() {
            candidates[count] = Some(TileCoord::new(tile.column(), row));
            count += 1;
        }
    }

    if let Some(column) = tile.column().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(column, tile.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(rows: &[&str]) -> TileMap {
        TileMap::from_rows(rows, 64.0, 64.0, &DEFAULT_BLOCKED_TILES).expect("valid map")
    }

    #[test]
    fn parse_reports_dimensions_and_walkability() {
        let tile_map = TileMap::parse("212\n111\n\n", 32.0, 16.0, &DEFAULT_BLOCKED_TILES)
            .expect("valid map");
        let grid = tile_map.tile_grid();

        assert_eq!((grid.columns(), grid.rows()), (3, 2));
        assert_eq!(grid.tile_width(), 32.0);
        assert!(!tile_map.is_walkable(TileCoord::new(0, 0)));
        assert!(tile_map.is_walkable(TileCoord::new(1, 0)));
        assert!(!tile_map.is_walkable(TileCoord::new(5, 0)));
        assert_eq!(tile_map.tile_id(TileCoord::new(2, 0)), Some('2'));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = TileMap::from_rows(&["111", "11"], 64.0, 64.0, &DEFAULT_BLOCKED_TILES)
            .expect_err("ragged map");
        assert_eq!(
            error,
            MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn empty_and_degenerate_maps_are_rejected() {
        assert_eq!(
            TileMap::parse("\n\n", 64.0, 64.0, &DEFAULT_BLOCKED_TILES).expect_err("empty"),
            MapError::Empty
        );
        assert!(matches!(
            TileMap::from_rows(&["1"], 0.0, 64.0, &DEFAULT_BLOCKED_TILES),
            Err(MapError::InvalidTileSize { .. })
        ));
    }

    #[test]
    fn find_path_follows_open_tiles() {
        let tile_map = map(&["1112", "2212", "1112"]);
        let path = tile_map
            .find_path(TileCoord::new(0, 0), TileCoord::new(0, 2))
            .expect("route exists");

        assert_eq!(path.first(), Some(&TileCoord::new(0, 0)));
        assert_eq!(path.last(), Some(&TileCoord::new(0, 2)));
        assert_eq!(path.len(), 7);
        assert!(path.contains(&TileCoord::new(2, 1)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn find_path_returns_single_tile_when_start_is_end() {
        let tile_map = map(&["11", "11"]);
        let tile = TileCoord::new(1, 1);
        assert_eq!(tile_map.find_path(tile, tile), Some(vec![tile]));
    }

    #[test]
    fn find_path_fails_for_blocked_or_disconnected_tiles() {
        let tile_map = map(&["121", "121"]);
        assert_eq!(
            tile_map.find_path(TileCoord::new(0, 0), TileCoord::new(2, 1)),
            None
        );
        assert_eq!(
            tile_map.find_path(TileCoord::new(1, 0), TileCoord::new(0, 0)),
            None
        );
        assert_eq!(
            tile_map.find_path(TileCoord::new(0, 0), TileCoord::new(9, 9)),
            None
        );
    }
}
