//! Ledge Hopper - a side-scrolling coin-collecting platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `render`: Frame composition behind the `Surface` canvas abstraction
//! - `sprite`: Sheet-based animation with draw-call frame advance
//! - `assets`: Async image/sound loading with per-item failure tolerance
//! - `clock`: Frame deltas capped and subdivided into physics sub-steps
//! - `tuning`: Data-driven physics balance

pub mod assets;
pub mod clock;
pub mod render;
pub mod sim;
pub mod sprite;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use sim::{GamePhase, Session};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible canvas size in CSS pixels
    pub const VIEWPORT_W: f32 = 800.0;
    pub const VIEWPORT_H: f32 = 600.0;

    /// Player body and balance defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 9.0;
    pub const PLAYER_JUMP_POWER: f32 = 12.0;
    pub const START_LIVES: u32 = 3;

    /// Collectibles and hazards
    pub const COIN_SIZE: f32 = 20.0;
    pub const ENEMY_SIZE: f32 = 30.0;

    /// Sprite sheets are horizontal strips; frames advance every `HOLD` draws
    pub const PLAYER_FRAMES: u32 = 4;
    pub const PLAYER_FRAME_HOLD: u32 = 10;
    pub const ENEMY_FRAMES: u32 = 2;
    pub const ENEMY_FRAME_HOLD: u32 = 20;
    pub const COIN_FRAMES: u32 = 1;
    pub const COIN_FRAME_HOLD: u32 = 1;

    /// Animation only plays while the player is actually moving
    pub const RUN_ANIM_THRESHOLD: f32 = 0.1;
}
