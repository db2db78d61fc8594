//! Session state and entity types
//!
//! Everything the simulation mutates lives here: the phase machine, the
//! player, and the level entities. Physics and collision code borrow the
//! session mutably for one sub-step at a time; rendering and the HUD only
//! ever read it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::LevelConfig;
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen up, nothing loaded yet
    NotStarted,
    /// Asset batch in flight
    Loading,
    /// Active gameplay
    Playing,
    /// Frozen; explicit pause or lost tab visibility
    Paused,
    /// Out of lives. Terminal until reset.
    GameOver,
    /// Landed on the goal platform. Terminal until reset.
    Won,
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Something the outside world should react to (sounds, HUD updates).
/// Returned from each tick; the simulation itself never plays or draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player left the ground
    Jumped,
    /// A coin flipped to collected
    CoinCollected,
    /// Player touched an enemy or fell off; carries the remaining lives
    Hurt { lives_left: u32 },
    /// Last life spent
    GameOver,
    /// Goal platform reached
    Won,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Rect,
    pub vel: Vec2,
    /// Horizontal acceleration from held input, in vx units per second
    pub speed: f32,
    /// Launch velocity applied on jump (negated; up is -y)
    pub jump_power: f32,
    pub is_jumping: bool,
    pub lives: u32,
    pub facing: Facing,
}

impl Player {
    fn at_spawn(spawn: Vec2) -> Self {
        Self {
            body: Rect {
                pos: spawn,
                size: Vec2::splat(PLAYER_SIZE),
            },
            vel: Vec2::ZERO,
            speed: PLAYER_SPEED,
            jump_power: PLAYER_JUMP_POWER,
            is_jumping: false,
            lives: START_LIVES,
            facing: Facing::Right,
        }
    }
}

/// A static platform; the goal platform ends the run on landing
#[derive(Debug, Clone)]
pub struct Platform {
    pub body: Rect,
    pub is_goal: bool,
}

/// A collectible. `collected` flips once and never back.
#[derive(Debug, Clone)]
pub struct Coin {
    pub body: Rect,
    pub collected: bool,
}

/// A patrolling hazard, bouncing between `start_x ± range`
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Rect,
    pub vx: f32,
    pub start_x: f32,
    pub range: f32,
}

/// Horizontal scroll offset into the level
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Center the viewport on `target`, clamped to the level bounds
    pub fn follow(&mut self, target: &Rect, level_width: f32, viewport_width: f32) {
        let centered = target.pos.x - viewport_width / 2.0 + target.size.x / 2.0;
        self.x = centered.clamp(0.0, (level_width - viewport_width).max(0.0));
    }
}

/// One run of the game: phase machine plus the live level
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: GamePhase,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub camera: Camera,
    pub score: u32,
    /// Sub-steps executed since the session became Playing
    pub ticks: u64,
    pub level: LevelConfig,
    pub tuning: Tuning,
    /// Armed on resume: the first sub-step back integrates movement but
    /// skips collision resolution, so stale overlap can't trigger a hit.
    pub(crate) skip_collisions_once: bool,
}

impl Session {
    pub fn new(level: LevelConfig, tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            player: Player::at_spawn(level.spawn),
            platforms: level.build_platforms(),
            coins: level.build_coins(),
            enemies: level.build_enemies(),
            camera: Camera::default(),
            score: 0,
            ticks: 0,
            level,
            tuning,
            skip_collisions_once: false,
        }
    }

    /// NotStarted -> Loading. The caller kicks off the asset batch.
    pub fn begin_loading(&mut self) {
        if self.phase == GamePhase::NotStarted {
            self.phase = GamePhase::Loading;
            log::info!("loading assets");
        }
    }

    /// Loading -> Playing. Assets have resolved (or failed into fallbacks);
    /// the live entities are materialized fresh from the level config.
    pub fn finish_loading(&mut self) {
        if self.phase == GamePhase::Loading {
            self.player = Player::at_spawn(self.level.spawn);
            self.platforms = self.level.build_platforms();
            self.coins = self.level.build_coins();
            self.enemies = self.level.build_enemies();
            self.phase = GamePhase::Playing;
            log::info!(
                "level start: {} platforms, {} coins, {} enemies",
                self.platforms.len(),
                self.coins.len(),
                self.enemies.len()
            );
        }
    }

    /// Flip between Playing and Paused. Returns whether a transition
    /// happened, so the caller can reset its frame clock on resume.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                log::info!("paused");
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                // One collision-free step guards against stale positions
                self.skip_collisions_once = true;
                log::info!("resumed");
                true
            }
            _ => false,
        }
    }

    /// Pause triggered by losing tab visibility or window focus. Only fires
    /// from Playing; a hidden tab on the start screen changes nothing.
    pub fn auto_pause(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::info!("auto-paused");
            true
        } else {
            false
        }
    }

    /// Rebuild the whole session from its stored configuration, back to the
    /// start screen. No page reload involved.
    pub fn reset(&mut self) {
        log::info!("session reset at score {}", self.score);
        *self = Session::new(self.level.clone(), self.tuning);
    }

    /// Coins collected so far
    pub fn collected_coins(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }
}
