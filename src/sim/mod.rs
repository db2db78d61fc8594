//! Headless game core
//!
//! The phase machine, entities, level layouts, per-sub-step update, and
//! collision resolution all live below this module. Nothing in here touches
//! the canvas or the DOM: given a level config, a tuning, and an input
//! sequence, a run plays out the same way every time, on any target.

pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use level::LevelConfig;
pub use rect::Rect;
pub use state::{Camera, Coin, Enemy, Facing, GameEvent, GamePhase, Platform, Player, Session};
pub use tick::{TickInput, tick};
