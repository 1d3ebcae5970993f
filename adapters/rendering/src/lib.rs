#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Defence adapters.
//!
//! Adapters draw from a [`Scene`] captured after the simulation step. The
//! scene is a plain snapshot: it holds no references into the world, so a
//! backend may keep it across frames.

use glam::Vec2;
use tile_defence_core::{TileCoord, TileRole};
use tile_defence_world::{query, GridController};

/// Texture used to draw a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileAppearance {
    /// Buildable ground.
    Ground,
    /// Buildable ground under the selection highlight.
    GroundSelected,
    /// Tile on the current path.
    Path,
    /// Path tile under the selection highlight.
    PathSelected,
    /// Enemy entry tile.
    Start,
    /// Tile enemies walk toward.
    Base,
}

impl TileAppearance {
    /// Appearance for a tile with the provided role and selection state.
    ///
    /// Endpoints are never highlighted.
    #[must_use]
    pub const fn for_tile(role: TileRole, selected: bool) -> Self {
        match (role, selected) {
            (TileRole::Start, _) => Self::Start,
            (TileRole::Base, _) => Self::Base,
            (TileRole::Path, false) => Self::Path,
            (TileRole::Path, true) => Self::PathSelected,
            (TileRole::Default, false) => Self::Ground,
            (TileRole::Default, true) => Self::GroundSelected,
        }
    }

    /// Asset key of the texture backing this appearance.
    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Self::Ground => "TileBrown.png",
            Self::GroundSelected => "TileBrownSelected.png",
            Self::Path => "TileGrey.png",
            Self::PathSelected => "TileGreySelected.png",
            Self::Start => "TileTan.png",
            Self::Base => "TileGreen.png",
        }
    }
}

/// One tile as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSprite {
    /// Grid coordinate of the tile.
    pub tile: TileCoord,
    /// World-space centre of the tile.
    pub position: Vec2,
    /// Texture to draw.
    pub appearance: TileAppearance,
    /// Whether a tower occupies the tile and should be drawn over it.
    pub blocked: bool,
}

/// Snapshot of everything a backend needs to draw the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Side length of a tile in world units.
    pub tile_size: f32,
    /// Tiles in row-major order.
    pub tiles: Vec<TileSprite>,
}

impl Scene {
    /// Captures the grid as it currently stands.
    #[must_use]
    pub fn capture(controller: &GridController) -> Self {
        let graph = query::tile_graph(controller);
        let tiles = graph
            .tiles()
            .iter()
            .map(|tile| TileSprite {
                tile: tile.coord(),
                position: tile.position(),
                appearance: TileAppearance::for_tile(tile.role(), tile.is_selected()),
                blocked: tile.is_blocked(),
            })
            .collect();

        Self {
            tile_size: graph.tile_size(),
            tiles,
        }
    }

    /// Sprites of tiles occupied by towers.
    pub fn towers(&self) -> impl Iterator<Item = &TileSprite> + '_ {
        self.tiles.iter().filter(|sprite| sprite.blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_defence_core::GridConfig;

    #[test]
    fn selection_only_changes_buildable_tiles() {
        assert_eq!(
            TileAppearance::for_tile(TileRole::Default, true),
            TileAppearance::GroundSelected
        );
        assert_eq!(
            TileAppearance::for_tile(TileRole::Path, true),
            TileAppearance::PathSelected
        );
        assert_eq!(
            TileAppearance::for_tile(TileRole::Start, true),
            TileAppearance::Start
        );
        assert_eq!(
            TileAppearance::for_tile(TileRole::Base, false),
            TileAppearance::Base
        );
    }

    #[test]
    fn assets_are_distinct() {
        let appearances = [
            TileAppearance::Ground,
            TileAppearance::GroundSelected,
            TileAppearance::Path,
            TileAppearance::PathSelected,
            TileAppearance::Start,
            TileAppearance::Base,
        ];
        let mut assets: Vec<_> = appearances.iter().map(|a| a.asset()).collect();
        assets.sort_unstable();
        assets.dedup();
        assert_eq!(assets.len(), appearances.len());
        assert_eq!(TileAppearance::Ground.asset(), "TileBrown.png");
        assert_eq!(TileAppearance::Path.asset(), "TileGrey.png");
        assert_eq!(TileAppearance::Base.asset(), "TileGreen.png");
    }

    #[test]
    fn capture_covers_every_tile_in_row_major_order() {
        let controller = GridController::new(GridConfig::default()).expect("grid");
        let scene = Scene::capture(&controller);

        assert_eq!(scene.tiles.len(), 7 * 16);
        assert_eq!(scene.tile_size, 64.0);
        assert_eq!(scene.tiles[0].tile, TileCoord::new(0, 0));
        assert_eq!(scene.tiles[17].tile, TileCoord::new(1, 1));
        assert_eq!(scene.tiles[3 * 16].appearance, TileAppearance::Start);
        assert_eq!(scene.tiles[3 * 16 + 15].appearance, TileAppearance::Base);
        assert_eq!(scene.tiles[3 * 16 + 7].appearance, TileAppearance::Path);
        assert_eq!(scene.tiles[0].appearance, TileAppearance::Ground);
        assert_eq!(scene.towers().count(), 0);
    }

    #[test]
    fn capture_reflects_towers_and_selection() {
        let mut controller = GridController::new(GridConfig::default()).expect("grid");
        assert!(controller.request_build_at(TileCoord::new(3, 7)).is_ok());
        assert!(controller.select_tile(TileCoord::new(0, 2)));

        let scene = Scene::capture(&controller);
        let towers: Vec<_> = scene.towers().map(|sprite| sprite.tile).collect();
        assert_eq!(towers, vec![TileCoord::new(3, 7)]);
        assert_eq!(scene.tiles[3 * 16 + 7].appearance, TileAppearance::Ground);
        assert_eq!(scene.tiles[2].appearance, TileAppearance::GroundSelected);
        assert_eq!(scene.tiles[2].position, Vec2::new(160.0, 192.0));
    }
}
