#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy registry that turns grid spawn signals into navigating enemies.
//!
//! The registry is owned by the surrounding simulation and handed by
//! reference to whichever system needs enemy positions, such as tower
//! targeting. Enemies are kept in spawn order so queries are deterministic.

use std::time::Duration;

use glam::Vec2;
use tile_defence_core::{EnemyId, EnemySnapshot, Event, NavigatorConfig, Pose, ARRIVAL_RADIUS};
use tile_defence_system_navigation::Navigator;
use tile_defence_world::PathView;
use tracing::debug;

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    pose: Pose,
    navigator: Navigator,
}

impl Enemy {
    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.pose.position,
        }
    }
}

/// Active enemies and the identifier allocator for new ones.
#[derive(Clone, Debug)]
pub struct Enemies {
    navigator_config: NavigatorConfig,
    entries: Vec<Enemy>,
    next_id: u32,
}

impl Enemies {
    /// Creates an empty registry whose enemies steer with `navigator_config`.
    #[must_use]
    pub fn new(navigator_config: NavigatorConfig) -> Self {
        Self {
            navigator_config,
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Spawns one enemy for every spawn request among `events`.
    ///
    /// Each enemy starts on the requested tile and immediately turns toward
    /// that tile's parent in the current chain.
    pub fn handle(&mut self, events: &[Event], path: &PathView<'_>) {
        for event in events {
            let Event::EnemySpawnRequested { tile, position } = event else {
                continue;
            };

            let id = EnemyId::new(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);

            let mut pose = Pose::at(*position);
            let mut navigator = Navigator::new(self.navigator_config);
            navigator.start_path(path, *tile, &mut pose);
            debug!(enemy = id.get(), ?tile, "enemy spawned");

            self.entries.push(Enemy {
                id,
                pose,
                navigator,
            });
        }
    }

    /// Moves every enemy and removes the ones that reached the base.
    ///
    /// Identifiers of removed enemies are appended to `arrived`.
    pub fn update(
        &mut self,
        dt: Duration,
        path: &PathView<'_>,
        base_position: Vec2,
        arrived: &mut Vec<EnemyId>,
    ) {
        for enemy in &mut self.entries {
            enemy.navigator.update(dt, path, &mut enemy.pose);
        }

        self.entries.retain(|enemy| {
            if enemy.pose.position.distance(base_position) > ARRIVAL_RADIUS {
                return true;
            }
            debug!(enemy = enemy.id.get(), "enemy reached the base");
            arrived.push(enemy.id);
            false
        });
    }

    /// Enemy closest to `position`, preferring the earliest spawned on ties.
    #[must_use]
    pub fn nearest(&self, position: Vec2) -> Option<EnemySnapshot> {
        let mut best: Option<(&Enemy, f32)> = None;
        for enemy in &self.entries {
            let distance_sq = enemy.pose.position.distance_squared(position);
            match best {
                Some((_, best_sq)) if distance_sq >= best_sq => {}
                _ => best = Some((enemy, distance_sq)),
            }
        }
        best.map(|(enemy, _)| enemy.snapshot())
    }

    /// Removes the enemy with the provided identifier.
    ///
    /// Returns `false` when no such enemy exists.
    pub fn remove(&mut self, id: EnemyId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|enemy| enemy.id != id);
        self.entries.len() != before
    }

    /// Iterator over the enemies in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = EnemySnapshot> + '_ {
        self.entries.iter().map(Enemy::snapshot)
    }

    /// Number of active enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no enemy is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_defence_core::{GridConfig, TileCoord};
    use tile_defence_world::{query, GridController};

    fn place(enemies: &mut Enemies, path: &PathView<'_>, positions: &[Vec2]) {
        let events: Vec<_> = positions
            .iter()
            .map(|&position| Event::EnemySpawnRequested {
                tile: TileCoord::new(0, 0),
                position,
            })
            .collect();
        enemies.handle(&events, path);
    }

    #[test]
    fn nearest_prefers_earliest_on_ties() {
        let controller = GridController::new(GridConfig::default()).expect("grid");
        let path = query::path_view(&controller);
        let mut enemies = Enemies::new(NavigatorConfig::default());
        place(
            &mut enemies,
            &path,
            &[
                Vec2::new(10.0, 0.0),
                Vec2::new(-10.0, 0.0),
                Vec2::new(50.0, 0.0),
            ],
        );

        let nearest = enemies.nearest(Vec2::ZERO).expect("enemy");
        assert_eq!(nearest.id, EnemyId::new(0));
        let nearest = enemies.nearest(Vec2::new(40.0, 0.0)).expect("enemy");
        assert_eq!(nearest.id, EnemyId::new(2));
    }

    #[test]
    fn remove_reports_missing_enemies() {
        let controller = GridController::new(GridConfig::default()).expect("grid");
        let path = query::path_view(&controller);
        let mut enemies = Enemies::new(NavigatorConfig::default());
        place(&mut enemies, &path, &[Vec2::ZERO]);

        assert!(enemies.remove(EnemyId::new(0)));
        assert!(!enemies.remove(EnemyId::new(0)));
        assert!(enemies.is_empty());
        assert_eq!(enemies.nearest(Vec2::ZERO), None);
    }
}
