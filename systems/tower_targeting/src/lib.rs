#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower attack cadence and nearest-enemy targeting.

use std::time::Duration;

use glam::Vec2;
use tile_defence_core::{EnemyId, EnemySnapshot, Event, TowerConfig, TowerId};
use tracing::debug;

/// Attack decision produced when a tower's cooldown elapses with an enemy in range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Tower that fired.
    pub tower: TowerId,
    /// Enemy the tower aimed at.
    pub enemy: EnemyId,
    /// World-space origin of the shot.
    pub origin: Vec2,
    /// Heading of the shot in radians, using the same convention as poses.
    pub rotation: f32,
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// World-space centre of the tower.
    pub position: Vec2,
    /// Heading the tower last aimed along.
    pub rotation: f32,
}

#[derive(Clone, Debug)]
struct Tower {
    id: TowerId,
    position: Vec2,
    rotation: f32,
    cooldown: Duration,
}

/// Registry of placed towers that decides when and at whom they fire.
#[derive(Clone, Debug)]
pub struct TowerTargeting {
    config: TowerConfig,
    towers: Vec<Tower>,
    next_id: u32,
}

impl TowerTargeting {
    /// Creates a targeting system with no towers.
    #[must_use]
    pub fn new(config: TowerConfig) -> Self {
        Self {
            config,
            towers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers placed towers and advances every tower's attack cooldown.
    ///
    /// When a cooldown elapses the tower asks `nearest` for the closest enemy
    /// and fires if that enemy is strictly inside the attack range. The
    /// cooldown restarts whether or not a shot was fired.
    pub fn handle<F>(&mut self, events: &[Event], mut nearest: F, out: &mut Vec<Shot>)
    where
        F: FnMut(Vec2) -> Option<EnemySnapshot>,
    {
        for event in events {
            match event {
                Event::TowerPlaced { position, .. } => self.register(*position),
                Event::TimeAdvanced { dt } => self.advance(*dt, &mut nearest, out),
                _ => {}
            }
        }
    }

    /// Iterator over the towers in placement order.
    pub fn iter(&self) -> impl Iterator<Item = TowerSnapshot> + '_ {
        self.towers.iter().map(|tower| TowerSnapshot {
            id: tower.id,
            position: tower.position,
            rotation: tower.rotation,
        })
    }

    fn register(&mut self, position: Vec2) {
        let id = TowerId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.towers.push(Tower {
            id,
            position,
            rotation: 0.0,
            cooldown: self.config.attack_interval,
        });
    }

    fn advance<F>(&mut self, dt: Duration, nearest: &mut F, out: &mut Vec<Shot>)
    where
        F: FnMut(Vec2) -> Option<EnemySnapshot>,
    {
        for tower in &mut self.towers {
            tower.cooldown = tower.cooldown.saturating_sub(dt);
            if !tower.cooldown.is_zero() {
                continue;
            }
            tower.cooldown = self.config.attack_interval;

            let Some(enemy) = nearest(tower.position) else {
                continue;
            };
            let direction = enemy.position - tower.position;
            if direction.length() >= self.config.attack_range {
                continue;
            }

            tower.rotation = (-direction.y).atan2(direction.x);
            debug!(tower = tower.id.get(), enemy = enemy.id.get(), "tower fired");
            out.push(Shot {
                tower: tower.id,
                enemy: enemy.id,
                origin: tower.position,
                rotation: tower.rotation,
            });
        }
    }
}
