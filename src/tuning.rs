//! Physics balance knobs
//!
//! The integrator multiplies velocities and deltas by fixed scale factors
//! that were tuned by feel rather than derived from consistent units. They
//! live here as data so the feel can be adjusted without touching the
//! integrator, and so a page can override them wholesale.

use serde::{Deserialize, Serialize};

/// World physics constants. All fields have gameplay-tuned defaults; a JSON
/// override may supply any subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration, applied as `vy += gravity * dt * rate`
    pub gravity: f32,
    /// Horizontal velocity retention per step, `vx *= friction^(dt * rate)`
    pub friction: f32,
    /// Rate constant shared by the gravity and friction terms
    pub rate: f32,
    /// Horizontal position scale: `x += vx * dt * pos_scale_x`
    pub pos_scale_x: f32,
    /// Vertical position scale: `y += vy * dt * pos_scale_y`
    pub pos_scale_y: f32,
    /// Enemy patrol position scale
    pub enemy_scale: f32,
    /// Longest frame delta the scheduler will integrate, in seconds
    pub max_frame_delta: f32,
    /// Upper bound on a single physics sub-step, in seconds
    pub max_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            friction: 0.8,
            rate: 80.0,
            pos_scale_x: 450.0,
            pos_scale_y: 80.0,
            enemy_scale: 60.0,
            max_frame_delta: 0.2,
            max_step: 1.0 / 60.0,
        }
    }
}
