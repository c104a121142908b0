//! Placement rules deciding which tiles may host new towers.

use rampart_core::{GridProvider, PlacementError, PlacementRule, TileCoord};

/// Towers may only stand on tiles off the enemy path.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGround;

impl PlacementRule for OpenGround {
    fn check(&self, tile: TileCoord, grid: &dyn GridProvider) -> Result<(), PlacementError> {
        if grid.is_walkable(tile) {
            return Err(PlacementError::OnPath);
        }

        Ok(())
    }
}

/// Accepts path tiles as well as open ground.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unrestricted;

impl PlacementRule for Unrestricted {
    fn check(&self, _tile: TileCoord, _grid: &dyn GridProvider) -> Result<(), PlacementError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{TileMap, DEFAULT_BLOCKED_TILES};

    fn map() -> TileMap {
        TileMap::from_rows(&["212", "212"], 64.0, 64.0, &DEFAULT_BLOCKED_TILES).expect("valid map")
    }

    #[test]
    fn open_ground_rejects_path_tiles() {
        let map = map();

        assert_eq!(OpenGround.check(TileCoord::new(0, 0), &map), Ok(()));
        assert_eq!(OpenGround.check(TileCoord::new(2, 1), &map), Ok(()));
        assert_eq!(
            OpenGround.check(TileCoord::new(1, 0), &map),
            Err(PlacementError::OnPath)
        );
    }

    #[test]
    fn unrestricted_accepts_path_tiles() {
        let map = map();
        assert_eq!(Unrestricted.check(TileCoord::new(1, 1), &map), Ok(()));
    }
}
