//! Tile storage and the fixed 4-connected adjacency used by the path search.

use glam::Vec2;
use tile_defence_core::{GridConfig, TileCoord, TileRole};

/// Scratch state written by a single path search.
///
/// Values are only meaningful after the most recent search and are reset to
/// the default baseline before every new one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Flat index of the tile this one was reached from.
    pub parent: Option<usize>,
    /// Cost accumulated from the search origin.
    pub g: f32,
    /// Straight-line estimate of the remaining cost.
    pub h: f32,
    /// Sum of `g` and `h`.
    pub f: f32,
    /// Whether the tile is waiting to be expanded.
    pub in_open_set: bool,
    /// Whether the tile has been expanded.
    pub in_closed_set: bool,
}

/// Single cell of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    coord: TileCoord,
    position: Vec2,
    adjacent: Vec<usize>,
    pub(crate) blocked: bool,
    pub(crate) role: TileRole,
    pub(crate) selected: bool,
    pub(crate) search: SearchState,
}

impl Tile {
    /// Row and column of the tile.
    #[must_use]
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Flat indices of the neighbouring tiles in up, down, left, right order.
    #[must_use]
    pub fn adjacent(&self) -> &[usize] {
        &self.adjacent
    }

    /// Reports whether a tower occupies the tile.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Presentation role of the tile.
    #[must_use]
    pub fn role(&self) -> TileRole {
        self.role
    }

    /// Reports whether the tile carries the selection highlight.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Scratch state left behind by the last path search.
    #[must_use]
    pub fn search(&self) -> &SearchState {
        &self.search
    }
}

/// Fixed-size grid of tiles with symmetric 4-connected adjacency.
#[derive(Clone, Debug)]
pub struct TileGraph {
    rows: u32,
    columns: u32,
    tile_size: f32,
    offset_y: f32,
    start: usize,
    base: usize,
    pub(crate) tiles: Vec<Tile>,
}

impl TileGraph {
    /// Builds the tiles and their adjacency from an already validated config.
    pub(crate) fn new(config: &GridConfig) -> Self {
        let mut tiles = Vec::with_capacity(config.tile_count());
        for row in 0..config.rows {
            for column in 0..config.columns {
                let position = Vec2::new(
                    config.tile_size / 2.0 + column as f32 * config.tile_size,
                    config.offset_y + row as f32 * config.tile_size,
                );
                tiles.push(Tile {
                    coord: TileCoord::new(row, column),
                    position,
                    adjacent: Vec::with_capacity(4),
                    blocked: false,
                    role: TileRole::Default,
                    selected: false,
                    search: SearchState::default(),
                });
            }
        }

        let mut graph = Self {
            rows: config.rows,
            columns: config.columns,
            tile_size: config.tile_size,
            offset_y: config.offset_y,
            start: 0,
            base: 0,
            tiles,
        };
        graph.link_neighbours();

        if let Some(start) = graph.index_of(config.start) {
            graph.start = start;
            graph.tiles[start].role = TileRole::Start;
        }
        if let Some(base) = graph.index_of(config.base) {
            graph.base = base;
            graph.tiles[base].role = TileRole::Base;
        }

        graph
    }

    fn link_neighbours(&mut self) {
        for index in 0..self.tiles.len() {
            let coord = self.tiles[index].coord;
            let mut adjacent = Vec::with_capacity(4);
            if let Some(row) = coord.row().checked_sub(1) {
                adjacent.extend(self.index_of(TileCoord::new(row, coord.column())));
            }
            adjacent.extend(self.index_of(TileCoord::new(coord.row() + 1, coord.column())));
            if let Some(column) = coord.column().checked_sub(1) {
                adjacent.extend(self.index_of(TileCoord::new(coord.row(), column)));
            }
            adjacent.extend(self.index_of(TileCoord::new(coord.row(), coord.column() + 1)));
            self.tiles[index].adjacent = adjacent;
        }
    }

    /// Number of tile rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of tile columns.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// All tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Coordinate of the start tile.
    #[must_use]
    pub fn start(&self) -> TileCoord {
        self.tiles[self.start].coord
    }

    /// Coordinate of the base tile.
    #[must_use]
    pub fn base(&self) -> TileCoord {
        self.tiles[self.base].coord
    }

    /// Converts a coordinate into a flat index, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, coord: TileCoord) -> Option<usize> {
        if coord.row() >= self.rows || coord.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinate stored at a flat index.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<TileCoord> {
        self.tiles.get(index).map(Tile::coord)
    }

    /// Looks up the tile at the provided coordinate.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index_of(coord).and_then(|index| self.tiles.get(index))
    }

    /// Resolves a world-space point to the tile containing it.
    ///
    /// Tiles extend half a tile on each side of their centre, so the first
    /// row begins half a tile above the vertical offset.
    #[must_use]
    pub fn tile_at_point(&self, x: i32, y: i32) -> Option<TileCoord> {
        let top = self.offset_y - self.tile_size / 2.0;
        let local_x = x as f32;
        let local_y = y as f32 - top;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }

        let column = (local_x / self.tile_size).floor();
        let row = (local_y / self.tile_size).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(TileCoord::new(row as u32, column as u32))
    }

    /// Read-only view over the parent chain left by the last search.
    #[must_use]
    pub fn path_view(&self) -> PathView<'_> {
        PathView { graph: self }
    }

    pub(crate) fn reset_search_state(&mut self) {
        for tile in &mut self.tiles {
            tile.search = SearchState::default();
        }
    }
}

/// Read-only view over the parent chain of the most recent search.
///
/// Following parents from any reached tile leads back to the search origin,
/// which is the base for every search the grid controller runs.
#[derive(Clone, Copy, Debug)]
pub struct PathView<'a> {
    graph: &'a TileGraph,
}

impl<'a> PathView<'a> {
    /// Tile every chain ends at, the base.
    #[must_use]
    pub fn root(&self) -> TileCoord {
        self.graph.base()
    }

    /// Tile the active path starts from.
    #[must_use]
    pub fn entry(&self) -> TileCoord {
        self.graph.start()
    }

    /// Next tile along the chain, or `None` at the chain's root.
    ///
    /// Tiles the last search never reached have no parent either.
    #[must_use]
    pub fn parent_of(&self, tile: TileCoord) -> Option<TileCoord> {
        let parent = self.graph.tile(tile)?.search.parent?;
        self.graph.tiles.get(parent).map(Tile::coord)
    }

    /// World-space centre of the provided tile.
    #[must_use]
    pub fn position_of(&self, tile: TileCoord) -> Option<Vec2> {
        self.graph.tile(tile).map(Tile::position)
    }

    /// Walks the chain starting at `tile`, yielding `tile` itself first.
    ///
    /// The walk never yields more items than the grid holds tiles.
    #[must_use]
    pub fn chain_from(&self, tile: TileCoord) -> Chain<'a> {
        Chain {
            graph: self.graph,
            next: self.graph.index_of(tile),
            remaining: self.graph.tiles.len(),
        }
    }
}

/// Iterator over a parent chain produced by [`PathView::chain_from`].
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    graph: &'a TileGraph,
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for Chain<'_> {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tile = self.graph.tiles.get(self.next?)?;
        self.remaining -= 1;
        self.next = tile.search.parent;
        Some(tile.coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(rows: u32, columns: u32) -> TileGraph {
        TileGraph::new(&GridConfig {
            rows,
            columns,
            start: TileCoord::new(0, 0),
            base: TileCoord::new(rows - 1, columns - 1),
            ..GridConfig::default()
        })
    }

    #[test]
    fn adjacency_is_symmetric() {
        let graph = graph(7, 16);
        for (index, tile) in graph.tiles().iter().enumerate() {
            for &neighbour in tile.adjacent() {
                assert!(
                    graph.tiles()[neighbour].adjacent().contains(&index),
                    "{:?} is not adjacent back to {:?}",
                    graph.tiles()[neighbour].coord(),
                    tile.coord()
                );
            }
        }
    }

    #[test]
    fn flat_indices_round_trip_through_coordinates() {
        let graph = graph(4, 5);
        for index in 0..graph.tiles().len() {
            let coord = graph.coord_of(index).expect("index in range");
            assert_eq!(graph.index_of(coord), Some(index));
        }
        assert_eq!(graph.coord_of(20), None);
        assert_eq!(graph.index_of(TileCoord::new(4, 0)), None);
    }

    #[test]
    fn corner_and_interior_neighbour_counts() {
        let graph = graph(3, 3);
        let count = |row, column| {
            graph
                .tile(TileCoord::new(row, column))
                .map(|tile| tile.adjacent().len())
        };
        assert_eq!(count(0, 0), Some(2));
        assert_eq!(count(0, 1), Some(3));
        assert_eq!(count(1, 1), Some(4));
    }

    #[test]
    fn neighbours_are_ordered_up_down_left_right() {
        let graph = graph(3, 3);
        let centre = graph.tile(TileCoord::new(1, 1)).expect("centre tile");
        let coords: Vec<_> = centre
            .adjacent()
            .iter()
            .map(|&index| graph.tiles()[index].coord())
            .collect();
        assert_eq!(
            coords,
            vec![
                TileCoord::new(0, 1),
                TileCoord::new(2, 1),
                TileCoord::new(1, 0),
                TileCoord::new(1, 2),
            ]
        );
    }

    #[test]
    fn positions_follow_tile_size_and_offset() {
        let graph = graph(7, 16);
        let tile = graph.tile(TileCoord::new(3, 15)).expect("tile");
        assert_eq!(tile.position(), Vec2::new(32.0 + 15.0 * 64.0, 192.0 + 3.0 * 64.0));
    }

    #[test]
    fn endpoints_receive_their_roles() {
        let graph = graph(4, 5);
        assert_eq!(graph.start(), TileCoord::new(0, 0));
        assert_eq!(graph.base(), TileCoord::new(3, 4));
        assert_eq!(
            graph.tile(graph.start()).map(Tile::role),
            Some(TileRole::Start)
        );
        assert_eq!(graph.tile(graph.base()).map(Tile::role), Some(TileRole::Base));

        let view = graph.path_view();
        assert_eq!(view.entry(), graph.start());
        assert_eq!(view.root(), graph.base());
    }

    #[test]
    fn tile_at_point_maps_pixels_to_tiles() {
        let graph = graph(7, 16);
        assert_eq!(graph.tile_at_point(0, 160), Some(TileCoord::new(0, 0)));
        assert_eq!(graph.tile_at_point(63, 223), Some(TileCoord::new(0, 0)));
        assert_eq!(graph.tile_at_point(64, 224), Some(TileCoord::new(1, 1)));
        assert_eq!(graph.tile_at_point(100, 159), None);
        assert_eq!(graph.tile_at_point(-5, 200), None);
        assert_eq!(graph.tile_at_point(16 * 64, 200), None);
        assert_eq!(graph.tile_at_point(10, 160 + 7 * 64), None);
    }

    #[test]
    fn chain_stops_at_root_and_is_bounded() {
        let mut graph = graph(1, 3);
        graph.tiles[2].search.parent = Some(1);
        graph.tiles[1].search.parent = Some(0);
        let chain: Vec<_> = graph.path_view().chain_from(TileCoord::new(0, 2)).collect();
        assert_eq!(
            chain,
            vec![
                TileCoord::new(0, 2),
                TileCoord::new(0, 1),
                TileCoord::new(0, 0)
            ]
        );

        graph.tiles[0].search.parent = Some(2);
        let cyclic = graph.path_view().chain_from(TileCoord::new(0, 2)).count();
        assert_eq!(cyclic, 3);
    }
}
