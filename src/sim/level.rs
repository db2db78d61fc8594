//! Level layout as data
//!
//! A `LevelConfig` is everything needed to (re)build the live entities:
//! dimensions, spawn point, platform/coin/enemy placements, and the seed
//! that decides which way each enemy initially walks. It is serde-backed so
//! a page can embed an alternative layout as JSON.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Coin, Enemy, Platform};
use crate::consts::{COIN_SIZE, ENEMY_SIZE};

/// One platform placement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Landing here wins the run
    #[serde(default)]
    pub goal: bool,
}

/// One enemy placement; patrol speed and range are level-wide
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
}

/// Complete level description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub width: f32,
    pub height: f32,
    pub spawn: Vec2,
    /// Seeds the per-enemy patrol directions
    pub seed: u64,
    pub platforms: Vec<PlatformSpec>,
    /// Coin top-left corners
    pub coins: Vec<Vec2>,
    pub enemies: Vec<EnemySpec>,
    pub enemy_speed: f32,
    pub enemy_range: f32,
}

impl LevelConfig {
    /// The hand-placed layout the game ships with: a long ground run with a
    /// staircase of floating ledges and the goal at the far right.
    pub fn classic() -> Self {
        let mut platforms = vec![PlatformSpec {
            x: 0.0,
            y: 550.0,
            w: 800.0,
            h: 50.0,
            goal: false,
        }];
        let ledges: [(f32, f32, f32); 9] = [
            (200.0, 450.0, 100.0),
            (400.0, 400.0, 100.0),
            (600.0, 350.0, 100.0),
            (800.0, 300.0, 100.0),
            (1000.0, 350.0, 100.0),
            (1200.0, 400.0, 100.0),
            (1400.0, 350.0, 200.0),
            (1700.0, 450.0, 100.0),
            (1900.0, 400.0, 150.0),
        ];
        for (x, y, w) in ledges {
            platforms.push(PlatformSpec {
                x,
                y,
                w,
                h: 20.0,
                goal: false,
            });
        }
        platforms.push(PlatformSpec {
            x: 800.0,
            y: 550.0,
            w: 1600.0,
            h: 50.0,
            goal: false,
        });
        platforms.push(PlatformSpec {
            x: 2200.0,
            y: 550.0,
            w: 200.0,
            h: 50.0,
            goal: true,
        });

        let coins = [
            // One above each ledge
            (220.0, 420.0),
            (420.0, 370.0),
            (620.0, 320.0),
            (820.0, 270.0),
            (1020.0, 320.0),
            (1220.0, 370.0),
            (1500.0, 320.0),
            (1720.0, 420.0),
            (1950.0, 370.0),
            // Scattered along the route
            (120.0, 480.0),
            (300.0, 425.0),
            (500.0, 375.0),
            (700.0, 325.0),
            (900.0, 325.0),
            (1100.0, 385.0),
            (1300.0, 375.0),
            (1600.0, 400.0),
            (1800.0, 400.0),
            (2050.0, 480.0),
            // Bonus pickups off the main line
            (50.0, 450.0),
            (750.0, 280.0),
            (1450.0, 300.0),
            (2100.0, 450.0),
        ]
        .into_iter()
        .map(|(x, y)| Vec2::new(x, y))
        .collect();

        let enemies = (0..10)
            .map(|i| EnemySpec {
                x: 300.0 + i as f32 * 200.0,
                y: 520.0,
            })
            .collect();

        Self {
            width: 2400.0,
            height: 600.0,
            spawn: Vec2::new(50.0, 0.0),
            seed: 0x4c48,
            platforms,
            coins,
            enemies,
            enemy_speed: 2.0,
            enemy_range: 100.0,
        }
    }

    pub fn build_platforms(&self) -> Vec<Platform> {
        self.platforms
            .iter()
            .map(|spec| Platform {
                body: Rect::new(spec.x, spec.y, spec.w, spec.h),
                is_goal: spec.goal,
            })
            .collect()
    }

    pub fn build_coins(&self) -> Vec<Coin> {
        self.coins
            .iter()
            .map(|pos| Coin {
                body: Rect::new(pos.x, pos.y, COIN_SIZE, COIN_SIZE),
                collected: false,
            })
            .collect()
    }

    /// Enemies start walking left or right by seed, so a given config always
    /// produces the same patrol pattern.
    pub fn build_enemies(&self) -> Vec<Enemy> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        self.enemies
            .iter()
            .map(|spec| {
                let dir = if rng.random::<bool>() { 1.0 } else { -1.0 };
                Enemy {
                    body: Rect::new(spec.x, spec.y, ENEMY_SIZE, ENEMY_SIZE),
                    vx: self.enemy_speed * dir,
                    start_x: spec.x,
                    range: self.enemy_range,
                }
            })
            .collect()
    }

    pub fn total_coins(&self) -> usize {
        self.coins.len()
    }
}
