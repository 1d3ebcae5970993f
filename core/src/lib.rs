#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative grid, and the per-entity systems. Adapters submit [`Command`]
//! values describing desired grid mutations, the grid controller executes them
//! through its `apply` entry point, and then broadcasts [`Event`] values that
//! systems react to. Configuration values for every subsystem live here so the
//! adapters can assemble them without depending on the world crate.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Distance from the base below which an enemy counts as having arrived.
pub const ARRIVAL_RADIUS: f32 = 10.0;

/// Location of a single tile expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    row: u32,
    column: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// Presentation role of a tile. Carries no meaning for pathfinding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileRole {
    /// Ordinary ground, including tiles occupied by towers.
    #[default]
    Default,
    /// Spawn point for enemies.
    Start,
    /// Goal enemies walk toward.
    Base,
    /// Tile lying on the active path between start and base.
    Path,
}

/// World-space position and heading of a mobile actor.
///
/// World space grows rightward along `x` and downward along `y`, so a
/// rotation of zero faces right and a rotation of `π/2` faces up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// Centre of the actor in world units.
    pub position: Vec2,
    /// Heading in radians.
    pub rotation: f32,
}

impl Pose {
    /// Creates a pose at the provided position facing right.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }

    /// Unit vector pointing along the current heading.
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), -self.rotation.sin())
    }

    /// Rotates the actor so that it faces the provided point.
    pub fn face(&mut self, target: Vec2) {
        let direction = target - self.position;
        self.rotation = (-direction.y).atan2(direction.x);
    }

    /// Moves the actor along its heading by the provided distance.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
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
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
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

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy.
    pub id: EnemyId,
    /// World-space position of the enemy.
    pub position: Vec2,
}

/// Fixed configuration of the tile grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub columns: u32,
    /// Side length of a tile in world units.
    pub tile_size: f32,
    /// World-space `y` of the centre of the first row.
    pub offset_y: f32,
    /// Tile enemies spawn on.
    pub start: TileCoord,
    /// Tile enemies walk toward.
    pub base: TileCoord,
    /// Time between two enemy spawns.
    pub spawn_interval: Duration,
}

impl GridConfig {
    /// Number of tiles contained in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let rows = usize::try_from(self.rows).unwrap_or(0);
        let columns = usize::try_from(self.columns).unwrap_or(0);
        rows.saturating_mul(columns)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 7,
            columns: 16,
            tile_size: 64.0,
            offset_y: 192.0,
            start: TileCoord::new(3, 0),
            base: TileCoord::new(3, 15),
            spawn_interval: Duration::from_millis(1500),
        }
    }
}

/// Steering parameters shared by every navigator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigatorConfig {
    /// Forward speed in world units per second.
    pub speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub arrival_tolerance: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            arrival_tolerance: 2.0,
        }
    }
}

/// Attack parameters shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerConfig {
    /// Time between two attack attempts.
    pub attack_interval: Duration,
    /// Enemies must be strictly closer than this to be attacked.
    pub attack_range: f32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            attack_interval: Duration::from_millis(2500),
            attack_range: 100.0,
        }
    }
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Toggles the selection highlight of a tile.
    SelectTile {
        /// Tile to select.
        tile: TileCoord,
    },
    /// Resolves a pointer click in world units to a tile and selects it.
    ProcessClick {
        /// Horizontal pointer coordinate.
        x: i32,
        /// Vertical pointer coordinate.
        y: i32,
    },
    /// Requests a tower on the provided tile.
    RequestBuildAt {
        /// Tile the tower should occupy.
        tile: TileCoord,
    },
    /// Requests a tower on the currently selected tile, if any.
    BuildAtSelection,
    /// Advances the grid clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the grid after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports a change of the selection highlight.
    TileSelected {
        /// Tile whose highlight changed.
        tile: TileCoord,
        /// Whether the tile is highlighted after the change.
        selected: bool,
    },
    /// Confirms that a tower placement was committed.
    TowerPlaced {
        /// Tile now blocked by the tower.
        tile: TileCoord,
        /// World-space centre of the tile.
        position: Vec2,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Tile named in the request.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that the active path was recomputed.
    PathChanged {
        /// Number of edges between start and base.
        length: usize,
    },
    /// Signals that one enemy should be spawned.
    EnemySpawnRequested {
        /// Tile the enemy starts on.
        tile: TileCoord,
        /// World-space centre of that tile.
        position: Vec2,
    },
}

/// Reasons a tower placement request may be rejected by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside the grid.
    OutOfBounds,
    /// A tower already occupies the tile.
    Occupied,
    /// The tile is the start or the base.
    Reserved,
    /// Blocking the tile would disconnect the base from the start.
    WouldSealPath,
}
