#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-actor steering that walks the grid's parent chain toward the base.

use std::time::Duration;

use glam::Vec2;
use tile_defence_core::{NavigatorConfig, Pose, TileCoord};
use tile_defence_world::PathView;

/// Steers one actor from tile to tile along the active parent chain.
///
/// The navigator only remembers the tile it is heading for. Each time the
/// actor comes within the arrival tolerance of that tile, the navigator looks
/// up the tile's parent in the current chain and turns toward it, so a path
/// recomputed mid-walk is picked up at the next waypoint. A waypoint the new
/// search never reached (for instance one a tower was built on) has no
/// parent; the actor then heads for the nearest tile on the active path.
#[derive(Clone, Debug)]
pub struct Navigator {
    config: NavigatorConfig,
    waypoint: Option<TileCoord>,
}

impl Navigator {
    /// Creates an idle navigator.
    #[must_use]
    pub const fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            waypoint: None,
        }
    }

    /// Tile the actor is currently heading for.
    #[must_use]
    pub fn waypoint(&self) -> Option<TileCoord> {
        self.waypoint
    }

    /// Begins walking from `start`, turning the actor toward its parent.
    ///
    /// When `start` has no parent the waypoint stays empty and later updates
    /// never change the actor's heading.
    pub fn start_path(&mut self, path: &PathView<'_>, start: TileCoord, pose: &mut Pose) {
        self.waypoint = path.parent_of(start);
        self.face_waypoint(path, pose);
    }

    /// Advances the waypoint if it was reached, then moves the actor forward.
    pub fn update(&mut self, dt: Duration, path: &PathView<'_>, pose: &mut Pose) {
        if let Some(waypoint) = self.waypoint {
            let reached = path
                .position_of(waypoint)
                .is_some_and(|target| {
                    pose.position.distance(target) <= self.config.arrival_tolerance
                });
            if reached {
                let next = match path.parent_of(waypoint) {
                    Some(next) => Some(next),
                    // The base has no parent, so the final waypoint is kept.
                    None if waypoint == path.root() => None,
                    None => rejoin(path, waypoint, pose.position),
                };
                if let Some(next) = next {
                    self.waypoint = Some(next);
                    self.face_waypoint(path, pose);
                }
            }
        }

        pose.advance(self.config.speed * dt.as_secs_f32());
    }

    fn face_waypoint(&self, path: &PathView<'_>, pose: &mut Pose) {
        if let Some(target) = self.waypoint.and_then(|tile| path.position_of(tile)) {
            pose.face(target);
        }
    }
}

/// Tile on the active path closest to `position`, skipping `cut_off`.
///
/// Ties go to the tile further along the path, so the actor keeps heading
/// toward the base.
fn rejoin(path: &PathView<'_>, cut_off: TileCoord, position: Vec2) -> Option<TileCoord> {
    let mut best: Option<(TileCoord, f32)> = None;
    for tile in path.chain_from(path.entry()) {
        if tile == cut_off {
            continue;
        }
        let Some(centre) = path.position_of(tile) else {
            continue;
        };
        let distance_sq = centre.distance_squared(position);
        match best {
            Some((_, best_sq)) if distance_sq > best_sq => {}
            _ => best = Some((tile, distance_sq)),
        }
    }
    best.map(|(tile, _)| tile)
}
