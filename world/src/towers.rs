//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use rampart_core::{TileCoord, TileGrid, TowerId, TowerKind, TowerLevel, TowerSnapshot, WorldPoint};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Upgrade level, fixed at the base level until upgrades exist.
    pub(crate) level: TowerLevel,
    /// Tile hosting the tower.
    pub(crate) tile: TileCoord,
    /// Top-left sprite anchor in world coordinates.
    pub(crate) anchor: WorldPoint,
    /// Remaining hit points, objective tower only.
    pub(crate) health: Option<u32>,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        let template = self.kind.template();
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            level: self.level,
            tile: self.tile,
            anchor: self.anchor,
            range: template.range,
            damage: template.damage,
            freeze: template.freeze,
            health: self.health,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Constructs a tower of the provided kind centred on the tile.
    pub(crate) fn insert(&mut self, kind: TowerKind, tile: TileCoord, grid: &TileGrid) -> &TowerState {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));

        self.entries.entry(id).or_insert(TowerState {
            id,
            kind,
            level: TowerLevel::BASE,
            tile,
            anchor: grid.tower_anchor(tile, kind),
            health: kind.template().health,
        })
    }

    pub(crate) fn contains(&self, tower: TowerId) -> bool {
        self.entries.contains_key(&tower)
    }

    pub(crate) fn tower_at(&self, tile: TileCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.tile == tile)
            .map(|tower| tower.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn insert_allocates_sequential_identifiers_and_anchors() {
        let grid = TileGrid::new(5, 5, 64.0, 64.0);
        let mut registry = TowerRegistry::new();

        let first = registry.insert(TowerKind::Archer, TileCoord::new(1, 3), &grid).id;
        let second = registry.insert(TowerKind::Magic, TileCoord::new(2, 3), &grid).id;

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.tower_at(TileCoord::new(2, 3)), Some(second));
        assert_eq!(registry.tower_at(TileCoord::new(4, 4)), None);

        let magic = registry
            .iter()
            .find(|tower| tower.id == second)
            .expect("magic tower stored");
        assert_eq!(magic.anchor, WorldPoint::new(128.0, 64.0));
        assert_eq!(magic.level, TowerLevel::BASE);
    }

    #[test]
    fn snapshot_reflects_template_stats() {
        let grid = TileGrid::new(5, 5, 64.0, 64.0);
        let mut registry = TowerRegistry::new();
        let snapshot = registry
            .insert(TowerKind::Ice, TileCoord::new(0, 4), &grid)
            .snapshot();

        assert_eq!(snapshot.range, 120.0);
        assert_eq!(snapshot.damage, 10);
        assert!(snapshot.freeze.is_some());
        assert_eq!(snapshot.health, None);
    }
}
