#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart tower-defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Delay between two consecutive spawns within a wave.
pub const SPAWN_INTERVAL: Duration = Duration::from_secs(4);

/// Rest period between the last spawn of a wave and the start of the next one.
pub const WAVE_GAP: Duration = Duration::from_secs(15);

/// Interval an enemy standing at the objective waits between two attacks.
pub const ATTACK_INTERVAL: Duration = Duration::from_secs(1);

/// Default vertical threshold, measured from the top of the map, past which
/// an enemy stands at the objective.
pub const OBJECTIVE_THRESHOLD_Y: f32 = 60.0;

/// Footprint of every enemy sprite in world units.
pub const ENEMY_FOOTPRINT: SpriteSize = SpriteSize::new(64.0, 64.0);

/// Footprint of every tower sprite in world units.
pub const TOWER_FOOTPRINT: SpriteSize = SpriteSize::new(64.0, 192.0);

/// Additional upward shift applied to towers drawn with taller sprites.
pub const TALL_TOWER_LIFT: f32 = 64.0;

/// Health assigned to the objective tower when the session starts.
pub const OBJECTIVE_TOWER_HEALTH: u32 = 100;

/// Terminal status of the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationState {
    /// Waves, movement and combat advance every tick.
    #[default]
    Active,
    /// Player health dropped to zero; every subsystem stops advancing.
    Defeated,
}

impl SimulationState {
    /// Reports whether the simulation still accepts ticks and commands.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Records that a new wave started spawning.
    BeginWave {
        /// Number of the wave that started.
        wave: WaveId,
        /// Count of enemies the wave will spawn.
        size: u32,
    },
    /// Requests that a new enemy enter the map at the spawn point.
    SpawnEnemy {
        /// Type of enemy to create.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: WaveId,
    },
    /// Requests that an enemy relocate to the provided position.
    MoveEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Destination expressed in world coordinates.
        to: WorldPoint,
    },
    /// Requests that an enemy standing at the objective accumulate attack time.
    AttackObjective {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Simulated time that elapsed while the enemy stood at the objective.
        dt: Duration,
    },
    /// Requests that a tower apply damage to an enemy.
    StrikeEnemy {
        /// Tower delivering the strike.
        tower: TowerId,
        /// Enemy receiving the strike.
        enemy: EnemyId,
        /// Hit points removed by the strike.
        damage: u32,
        /// Optional slow applied by the strike.
        freeze: Option<Duration>,
    },
    /// Requests that the provided tower kind become the pending selection.
    ///
    /// Selecting the kind that is already pending clears the selection.
    SelectTower {
        /// Tower kind chosen by the player.
        kind: TowerKind,
    },
    /// Requests construction of the pending tower kind at the provided tile.
    PlaceTower {
        /// Tile that should host the tower.
        tile: TileCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave started spawning.
    WaveStarted {
        /// Number of the wave.
        wave: WaveId,
        /// Count of enemies the wave will spawn.
        size: u32,
    },
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Type of the enemy.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: WaveId,
        /// Spawn position in world coordinates.
        position: WorldPoint,
    },
    /// Confirms that an enemy changed position.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Reports that an enemy damaged the objective.
    ObjectiveStruck {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Health removed from the player.
        damage: u32,
        /// Player health after the attack.
        player_health: i32,
    },
    /// Reports that a tower damaged an enemy that survived the hit.
    EnemyStruck {
        /// Tower that delivered the strike.
        tower: TowerId,
        /// Enemy that received the strike.
        enemy: EnemyId,
        /// Hit points removed by the strike.
        damage: u32,
        /// Health remaining after the strike.
        remaining: u32,
    },
    /// Reports that an enemy was slowed by a freezing strike.
    EnemyFrozen {
        /// Enemy that was slowed.
        enemy: EnemyId,
        /// Remaining duration of the slow.
        duration: Duration,
    },
    /// Reports that an enemy was defeated and its reward credited.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Type of the defeated enemy.
        kind: EnemyKind,
        /// Currency credited to the player.
        reward: u32,
    },
    /// Reports that the pending tower selection changed.
    TowerSelectionChanged {
        /// Kind now pending placement, if any.
        kind: Option<TowerKind>,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile hosting the tower.
        tile: TileCoord,
        /// Top-left anchor of the tower sprite in world coordinates.
        anchor: WorldPoint,
        /// Currency deducted for the tower.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind pending placement when the request arrived.
        kind: Option<TowerKind>,
        /// Tile provided in the placement request.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that player health reached zero.
    Defeated {
        /// Wave in progress when the objective fell.
        wave: WaveId,
    },
}

/// Number of a wave, starting at one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveId(u32);

impl WaveId {
    /// Wave that opens every session.
    pub const FIRST: Self = Self(1);

    /// Creates a new wave identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the wave.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the wave following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Continuous position expressed in world units, growing right and down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point translated by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Width and height of a sprite footprint in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSize {
    width: f32,
    height: f32,
}

impl SpriteSize {
    /// Creates a new footprint description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the footprint.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the footprint.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Describes the discrete tile layout of the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_width: f32, tile_height: f32) -> Self {
        Self {
            columns,
            rows,
            tile_width,
            tile_height,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of a single tile expressed in world units.
    #[must_use]
    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// Height of a single tile expressed in world units.
    #[must_use]
    pub const fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_width
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_height
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Converts a world position into the tile that contains it.
    #[must_use]
    pub fn tile_at(&self, point: WorldPoint) -> Option<TileCoord> {
        if point.x() < 0.0 || point.y() < 0.0 || self.tile_width <= 0.0 || self.tile_height <= 0.0
        {
            return None;
        }

        let tile = TileCoord::new(
            (point.x() / self.tile_width) as u32,
            (point.y() / self.tile_height) as u32,
        );
        self.contains(tile).then_some(tile)
    }

    /// World position of the tile's top-left corner.
    #[must_use]
    pub fn tile_origin(&self, tile: TileCoord) -> WorldPoint {
        WorldPoint::new(
            tile.column() as f32 * self.tile_width,
            tile.row() as f32 * self.tile_height,
        )
    }

    /// Top-left anchor of a tower sprite centred on the provided tile.
    ///
    /// Stone and Magic towers use taller sprites and are lifted by
    /// [`TALL_TOWER_LIFT`] so their base sits on the tile.
    #[must_use]
    pub fn tower_anchor(&self, tile: TileCoord, kind: TowerKind) -> WorldPoint {
        let origin = self.tile_origin(tile);
        let x = origin.x() + self.tile_width / 2.0 - TOWER_FOOTPRINT.width() / 2.0;
        let mut y = origin.y() + self.tile_height / 2.0 - TOWER_FOOTPRINT.height() / 2.0;
        if kind.is_tall() {
            y -= TALL_TOWER_LIFT;
        }
        WorldPoint::new(x, y)
    }

    /// Fixed point where every enemy enters the map.
    ///
    /// Enemies appear horizontally centred on the bottom edge.
    #[must_use]
    pub fn spawn_point(&self) -> WorldPoint {
        WorldPoint::new(
            self.width() / 2.0 - ENEMY_FOOTPRINT.width() / 2.0,
            self.height() - ENEMY_FOOTPRINT.height(),
        )
    }
}

/// Region enemies try to reach and attack once there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Objective {
    tile: TileCoord,
    left: f32,
    right: f32,
    threshold_y: f32,
}

impl Objective {
    /// Places the objective on the centre column of the grid's top row.
    #[must_use]
    pub fn for_grid(grid: &TileGrid, threshold_y: f32) -> Self {
        let tile = TileCoord::new(grid.columns() / 2, 0);
        let left = grid.tile_origin(tile).x();
        Self {
            tile,
            left,
            right: left + grid.tile_width(),
            threshold_y,
        }
    }

    /// Tile hosting the objective tower.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Vertical threshold an enemy must cross to stand at the objective.
    #[must_use]
    pub const fn threshold_y(&self) -> f32 {
        self.threshold_y
    }

    /// Authoritative "at objective" predicate.
    ///
    /// An enemy anchored at `position` with the given footprint stands at the
    /// objective once its top edge crossed the threshold and its horizontal
    /// centre lies within the objective column.
    #[must_use]
    pub fn is_reached(&self, position: WorldPoint, footprint: SpriteSize) -> bool {
        let centre = position.x() + footprint.width() / 2.0;
        position.y() <= self.threshold_y && centre >= self.left && centre <= self.right
    }
}

/// Types of towers that exist in the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap, short-ranged tower.
    Archer,
    /// Long-ranged tower with moderate damage.
    Magic,
    /// Expensive, short-ranged, heavy-hitting tower.
    Stone,
    /// Tower whose strikes slow their targets.
    Ice,
    /// The objective tower defended by the player. Never constructed by commands.
    Player,
}

impl TowerKind {
    /// Tower kinds the player may construct, in panel order.
    pub const PLACEABLE: [TowerKind; 4] = [Self::Archer, Self::Magic, Self::Stone, Self::Ice];

    /// Fixed stats every tower of this kind is constructed with.
    #[must_use]
    pub const fn template(self) -> TowerTemplate {
        match self {
            Self::Archer => TowerTemplate::new(100.0, 10, 20, None, None),
            Self::Magic => TowerTemplate::new(150.0, 15, 40, None, None),
            Self::Stone => TowerTemplate::new(80.0, 25, 100, None, None),
            Self::Ice => TowerTemplate::new(120.0, 10, 60, Some(Duration::from_secs(5)), None),
            Self::Player => TowerTemplate::new(0.0, 0, 0, None, Some(OBJECTIVE_TOWER_HEALTH)),
        }
    }

    /// Reports whether the player may construct towers of this kind.
    #[must_use]
    pub const fn is_placeable(self) -> bool {
        !matches!(self, Self::Player)
    }

    /// Reports whether the kind uses the taller sprite variant.
    #[must_use]
    pub const fn is_tall(self) -> bool {
        matches!(self, Self::Stone | Self::Magic)
    }
}

/// Stat template shared by every tower of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTemplate {
    /// Maximum strike distance in world units.
    pub range: f32,
    /// Damage applied to each enemy in range every tick.
    pub damage: u32,
    /// Currency charged once at placement.
    pub cost: u32,
    /// Slow applied by each strike.
    pub freeze: Option<Duration>,
    /// Hit points of the tower itself, objective tower only.
    pub health: Option<u32>,
}

impl TowerTemplate {
    const fn new(
        range: f32,
        damage: u32,
        cost: u32,
        freeze: Option<Duration>,
        health: Option<u32>,
    ) -> Self {
        Self {
            range,
            damage,
            cost,
            freeze,
            health,
        }
    }
}

/// Upgrade level of a tower, always within `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerLevel(u8);

impl TowerLevel {
    /// Level every tower is constructed at.
    pub const BASE: Self = Self(1);
    /// Highest level a tower can reach.
    pub const MAX: Self = Self(3);

    /// Creates a level if the value indexes a valid stat variant.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::BASE.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Types of enemies that attack the objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Weakest enemy, fielded by the first wave.
    Goblin,
    /// Armoured enemy.
    Knight,
    /// Spellcasting enemy.
    Wizard,
    /// Strongest enemy.
    Berserker,
}

impl EnemyKind {
    /// Base stats assigned at spawn.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Goblin => EnemyStats::new(5, 10, 10),
            Self::Knight => EnemyStats::new(10, 20, 20),
            Self::Wizard => EnemyStats::new(15, 30, 30),
            Self::Berserker => EnemyStats::new(20, 40, 40),
        }
    }
}

/// Stats an enemy is spawned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemyStats {
    /// Damage dealt to the player per attack.
    pub strength: u32,
    /// Currency credited to the player when the enemy is defeated.
    pub reward: u32,
    /// Starting hit points.
    pub health: u32,
}

impl EnemyStats {
    const fn new(strength: u32, reward: u32, health: u32) -> Self {
        Self {
            strength,
            reward,
            health,
        }
    }
}

/// Read-only snapshot of the player's resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    /// Remaining player health; the simulation is defeated at zero or below.
    pub health: i32,
    /// Currency available for tower construction.
    pub currency: u32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Current upgrade level.
    pub level: TowerLevel,
    /// Tile hosting the tower.
    pub tile: TileCoord,
    /// Top-left sprite anchor used for range checks.
    pub anchor: WorldPoint,
    /// Maximum strike distance in world units.
    pub range: f32,
    /// Damage applied to each enemy in range every tick.
    pub damage: u32,
    /// Slow applied by each strike.
    pub freeze: Option<Duration>,
    /// Hit points of the tower itself, objective tower only.
    pub health: Option<u32>,
}

/// Read-only snapshot describing all towers placed within the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Type of the enemy.
    pub kind: EnemyKind,
    /// Wave the enemy belongs to.
    pub wave: WaveId,
    /// Top-left sprite anchor in world coordinates.
    pub position: WorldPoint,
    /// Remaining hit points, always positive for live enemies.
    pub health: u32,
    /// Damage dealt to the player per attack.
    pub strength: u32,
    /// Currency credited when the enemy is defeated.
    pub reward: u32,
    /// Time accumulated toward the next attack on the objective.
    pub attack_timer: Duration,
    /// Remaining duration of the slow applied by freezing strikes.
    pub frozen_for: Duration,
}

impl EnemySnapshot {
    /// Reports whether a freezing strike currently slows the enemy.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        !self.frozen_for.is_zero()
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No tower kind was pending selection.
    NoSelection,
    /// The requested kind cannot be constructed by the player.
    NotPlaceable,
    /// The player cannot afford the tower.
    InsufficientFunds {
        /// Cost of the requested tower.
        required: u32,
        /// Currency the player holds.
        available: u32,
    },
    /// The requested tile lies outside the map.
    OutOfBounds,
    /// The requested tile belongs to the enemy path.
    OnPath,
    /// Another tower already occupies the requested tile.
    Occupied,
    /// The objective fell, so the simulation accepts no further placements.
    Defeated,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelection => write!(f, "no tower kind selected"),
            Self::NotPlaceable => write!(f, "tower kind cannot be constructed"),
            Self::InsufficientFunds {
                required,
                available,
            } => write!(f, "tower costs {required} but only {available} available"),
            Self::OutOfBounds => write!(f, "tile lies outside the map"),
            Self::OnPath => write!(f, "tile belongs to the enemy path"),
            Self::Occupied => write!(f, "tile already hosts a tower"),
            Self::Defeated => write!(f, "simulation is over"),
        }
    }
}

/// Query contract of the map's walkability grid and shortest-path search.
pub trait GridProvider {
    /// Dimensions of the underlying tile map.
    fn tile_grid(&self) -> TileGrid;

    /// Reports whether enemies may walk across the tile.
    ///
    /// Tiles outside the grid are never walkable.
    fn is_walkable(&self, tile: TileCoord) -> bool;

    /// Shortest walkable route from `start` to `end`, both inclusive.
    ///
    /// Returns `None` when either endpoint is not walkable or no route exists.
    fn find_path(&self, start: TileCoord, end: TileCoord) -> Option<Vec<TileCoord>>;
}

/// Injectable predicate deciding whether a tile may host a new tower.
///
/// The world only consults the rule for tiles inside the map that no tower
/// occupies yet.
pub trait PlacementRule: fmt::Debug {
    /// Validates the tile, reporting the first reason it cannot host a tower.
    fn check(&self, tile: TileCoord, grid: &dyn GridProvider) -> Result<(), PlacementError>;
}
