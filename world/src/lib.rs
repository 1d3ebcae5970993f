#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Tile Defence.
//!
//! The [`GridController`] owns the [`TileGraph`] and keeps a path from the
//! base to the start tile alive at all times. Tower placements that would cut
//! that path are rolled back before the call returns, so callers never observe
//! a sealed grid.

mod graph;
mod pathfinding;
mod spawning;

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;
use tile_defence_core::{Command, Event, GridConfig, PlacementError, TileCoord, TileRole};
use tracing::{debug, error, info};

pub use graph::{Chain, PathView, SearchState, Tile, TileGraph};

use crate::{pathfinding::find_path, spawning::SpawnClock};

/// Fatal problems detected while initialising the grid.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridError {
    /// The grid has no tiles.
    #[error("grid must have at least one row and one column, got {rows}x{columns}")]
    EmptyGrid {
        /// Configured number of rows.
        rows: u32,
        /// Configured number of columns.
        columns: u32,
    },
    /// The tile size cannot position tiles.
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    /// The start or base tile lies outside the grid.
    #[error("{endpoint} tile {tile:?} lies outside the grid")]
    OutOfBounds {
        /// Which endpoint was misplaced.
        endpoint: &'static str,
        /// Configured coordinate of that endpoint.
        tile: TileCoord,
    },
    /// Start and base share a tile.
    #[error("start and base must be distinct tiles, both are {0:?}")]
    CoincidentEndpoints(TileCoord),
    /// The initial search found no path.
    #[error("no path connects base {base:?} to start {start:?}")]
    Unreachable {
        /// Configured start tile.
        start: TileCoord,
        /// Configured base tile.
        base: TileCoord,
    },
}

/// Owns the tile grid and mediates tower placement against reachability.
#[derive(Clone, Debug)]
pub struct GridController {
    config: GridConfig,
    graph: TileGraph,
    selected: Option<TileCoord>,
    spawn_clock: SpawnClock,
}

impl GridController {
    /// Builds the grid and computes the initial path.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        validate(&config)?;

        let mut graph = TileGraph::new(&config);
        if !find_path(&mut graph, config.base, config.start) {
            return Err(GridError::Unreachable {
                start: config.start,
                base: config.base,
            });
        }

        let mut controller = Self {
            spawn_clock: SpawnClock::new(config.spawn_interval),
            config,
            graph,
            selected: None,
        };
        let length = controller.refresh_path_roles();
        info!(
            rows = controller.config.rows,
            columns = controller.config.columns,
            path_length = ?length,
            "grid initialised"
        );
        Ok(controller)
    }

    /// Attempts to place a tower on `tile`.
    ///
    /// On success the tile stays blocked, the path is recomputed and the
    /// tile's world position is returned so a tower can be placed there. A
    /// placement that would disconnect the base from the start is undone and
    /// leaves the grid exactly as it was.
    pub fn request_build_at(&mut self, tile: TileCoord) -> Result<Vec2, PlacementError> {
        let index = self
            .graph
            .index_of(tile)
            .ok_or(PlacementError::OutOfBounds)?;
        let target = &self.graph.tiles[index];
        if matches!(target.role, TileRole::Start | TileRole::Base) {
            return Err(PlacementError::Reserved);
        }
        if target.blocked {
            return Err(PlacementError::Occupied);
        }
        let position = target.position();

        self.graph.tiles[index].blocked = true;
        if self.recompute_path() {
            let length = self.refresh_path_roles();
            debug!(?tile, path_length = ?length, "tower placement committed");
            return Ok(position);
        }

        self.graph.tiles[index].blocked = false;
        if !self.recompute_path() {
            error!(?tile, "grid lost its path while rolling back a placement");
        }
        let length = self.refresh_path_roles();
        debug!(
            ?tile,
            path_length = ?length,
            "tower placement would seal the path, rolled back"
        );
        Err(PlacementError::WouldSealPath)
    }

    /// Attempts to place a tower on the selected tile, if one is selected.
    pub fn build_at_selection(&mut self) -> Option<Result<Vec2, PlacementError>> {
        let tile = self.selected?;
        Some(self.request_build_at(tile))
    }

    /// Toggles the selection highlight of `tile`.
    ///
    /// Only one tile is highlighted at a time. Selecting the highlighted tile
    /// again clears the highlight. Start, base and out of range tiles are
    /// ignored, in which case `false` is returned.
    pub fn select_tile(&mut self, tile: TileCoord) -> bool {
        let Some(index) = self.graph.index_of(tile) else {
            return false;
        };
        if matches!(self.graph.tiles[index].role, TileRole::Start | TileRole::Base) {
            return false;
        }

        if let Some(previous) = self.selected.take() {
            if let Some(previous_index) = self.graph.index_of(previous) {
                self.graph.tiles[previous_index].selected = false;
            }
            if previous == tile {
                return true;
            }
        }

        self.graph.tiles[index].selected = true;
        self.selected = Some(tile);
        true
    }

    /// Selects the tile under a world-space pointer position.
    pub fn process_click(&mut self, x: i32, y: i32) -> bool {
        match self.graph.tile_at_point(x, y) {
            Some(tile) => self.select_tile(tile),
            None => false,
        }
    }

    /// Advances the spawn countdown, returning `true` when an enemy is due.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.spawn_clock.advance(dt)
    }

    fn recompute_path(&mut self) -> bool {
        find_path(&mut self.graph, self.config.base, self.config.start)
    }

    /// Marks every tile on the chain from start to base with the path role.
    ///
    /// Returns the number of edges on the chain, or `None` when the chain does
    /// not reach the base.
    fn refresh_path_roles(&mut self) -> Option<usize> {
        for tile in &mut self.graph.tiles {
            if tile.role == TileRole::Path {
                tile.role = TileRole::Default;
            }
        }

        let start = self.graph.start();
        let base = self.graph.base();
        let chain: Vec<TileCoord> = self.graph.path_view().chain_from(start).collect();
        if chain.last() != Some(&base) {
            return None;
        }

        for coord in &chain[1..chain.len() - 1] {
            if let Some(index) = self.graph.index_of(*coord) {
                self.graph.tiles[index].role = TileRole::Path;
            }
        }
        Some(chain.len() - 1)
    }
}

fn validate(config: &GridConfig) -> Result<(), GridError> {
    if config.rows == 0 || config.columns == 0 {
        return Err(GridError::EmptyGrid {
            rows: config.rows,
            columns: config.columns,
        });
    }
    if !(config.tile_size.is_finite() && config.tile_size > 0.0) || !config.offset_y.is_finite()
    {
        return Err(GridError::InvalidTileSize(config.tile_size));
    }

    let inside = |tile: TileCoord| tile.row() < config.rows && tile.column() < config.columns;
    if !inside(config.start) {
        return Err(GridError::OutOfBounds {
            endpoint: "start",
            tile: config.start,
        });
    }
    if !inside(config.base) {
        return Err(GridError::OutOfBounds {
            endpoint: "base",
            tile: config.base,
        });
    }
    if config.start == config.base {
        return Err(GridError::CoincidentEndpoints(config.start));
    }
    Ok(())
}

/// Applies the provided command to the grid, broadcasting resulting events.
pub fn apply(controller: &mut GridController, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectTile { tile } => {
            apply_selection(controller, out_events, |controller| {
                controller.select_tile(tile)
            });
        }
        Command::ProcessClick { x, y } => {
            apply_selection(controller, out_events, |controller| {
                controller.process_click(x, y)
            });
        }
        Command::RequestBuildAt { tile } => apply_build(controller, tile, out_events),
        Command::BuildAtSelection => {
            if let Some(tile) = controller.selected {
                apply_build(controller, tile, out_events);
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if controller.tick(dt) {
                let tile = controller.graph.start();
                if let Some(position) = controller.graph.path_view().position_of(tile) {
                    out_events.push(Event::EnemySpawnRequested { tile, position });
                }
            }
        }
    }
}

fn apply_selection<F>(controller: &mut GridController, out_events: &mut Vec<Event>, select: F)
where
    F: FnOnce(&mut GridController) -> bool,
{
    let previous = controller.selected;
    if !select(controller) {
        return;
    }
    if let Some(previous) = previous {
        out_events.push(Event::TileSelected {
            tile: previous,
            selected: false,
        });
    }
    if let Some(tile) = controller.selected {
        out_events.push(Event::TileSelected {
            tile,
            selected: true,
        });
    }
}

fn apply_build(controller: &mut GridController, tile: TileCoord, out_events: &mut Vec<Event>) {
    match controller.request_build_at(tile) {
        Ok(position) => {
            out_events.push(Event::TowerPlaced { tile, position });
            if let Some(length) = query::path_length(controller) {
                out_events.push(Event::PathChanged { length });
            }
        }
        Err(reason) => out_events.push(Event::TowerPlacementRejected { tile, reason }),
    }
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use tile_defence_core::{GridConfig, TileCoord, TileRole};

    use super::{GridController, PathView, Tile, TileGraph};

    /// Provides read-only access to the tile graph.
    #[must_use]
    pub fn tile_graph(controller: &GridController) -> &TileGraph {
        &controller.graph
    }

    /// Configuration the grid was built from.
    #[must_use]
    pub fn config(controller: &GridController) -> &GridConfig {
        &controller.config
    }

    /// Read-only view over the active parent chain.
    #[must_use]
    pub fn path_view(controller: &GridController) -> PathView<'_> {
        controller.graph.path_view()
    }

    /// Coordinate enemies spawn on.
    #[must_use]
    pub fn start_tile(controller: &GridController) -> TileCoord {
        controller.graph.start()
    }

    /// Coordinate enemies walk toward.
    #[must_use]
    pub fn base_tile(controller: &GridController) -> TileCoord {
        controller.graph.base()
    }

    /// Tile currently carrying the selection highlight.
    #[must_use]
    pub fn selected_tile(controller: &GridController) -> Option<TileCoord> {
        controller.selected
    }

    /// Number of edges on the active path from start to base.
    #[must_use]
    pub fn path_length(controller: &GridController) -> Option<usize> {
        let base = controller.graph.base();
        path_view(controller)
            .chain_from(controller.graph.start())
            .position(|tile| tile == base)
    }

    /// Tiles carrying the path role, ordered from start toward base.
    #[must_use]
    pub fn path_tiles(controller: &GridController) -> Vec<TileCoord> {
        path_view(controller)
            .chain_from(controller.graph.start())
            .filter(|&tile| {
                controller
                    .graph
                    .tile(tile)
                    .is_some_and(|tile| tile.role() == TileRole::Path)
            })
            .collect()
    }

    /// Tiles occupied by towers, in row-major order.
    #[must_use]
    pub fn blocked_tiles(controller: &GridController) -> Vec<TileCoord> {
        controller
            .graph
            .tiles()
            .iter()
            .filter(|tile| tile.is_blocked())
            .map(Tile::coord)
            .collect()
    }
}
