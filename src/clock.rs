//! Frame clock
//!
//! Turns animation-frame timestamps into bounded physics sub-steps. A frame
//! that took longer than one sub-step is split into several equal steps of
//! at most 1/60s, so a slow frame cannot tunnel the player through a thin
//! ledge. Deltas above the cap (a backgrounded tab waking up) are clamped
//! before splitting.

use crate::tuning::Tuning;

/// Floor for the configured sub-step size. A zero override would otherwise
/// split one frame into an unbounded number of sub-steps.
const MIN_STEP: f32 = 1e-3;

/// How to advance the simulation for one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubstepPlan {
    /// Number of equal sub-steps to run
    pub count: u32,
    /// Size of each sub-step in seconds
    pub dt: f32,
}

/// Wall-clock bookkeeping between animation frames.
pub struct FrameClock {
    last: Option<f64>,
    max_frame_delta: f32,
    max_step: f32,
    /// Frames observed, including the first (unmeasurable) one
    pub frames: u64,
    /// Sub-steps handed out across all frames
    pub ticks: u64,
    /// Frames whose delta hit the cap
    pub capped_frames: u64,
}

impl FrameClock {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            last: None,
            max_frame_delta: tuning.max_frame_delta,
            max_step: tuning.max_step.max(MIN_STEP),
            frames: 0,
            ticks: 0,
            capped_frames: 0,
        }
    }

    /// Forget the previous timestamp.
    ///
    /// Called on resume and on session reset: the next frame after a pause
    /// must not see the whole paused interval as its delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Account for a new frame at `now_ms` (a DOMHighResTimeStamp).
    ///
    /// Returns `None` on the first frame after `new`/`reset`, when there is
    /// nothing to measure against, or when the timestamp did not move.
    pub fn advance(&mut self, now_ms: f64) -> Option<SubstepPlan> {
        self.frames += 1;
        let Some(last) = self.last.replace(now_ms) else {
            return None;
        };

        let mut dt = ((now_ms - last) / 1000.0) as f32;
        if dt <= 0.0 {
            return None;
        }
        if dt > self.max_frame_delta {
            log::warn!("frame delta {dt:.3}s capped to {:.3}s", self.max_frame_delta);
            dt = self.max_frame_delta;
            self.capped_frames += 1;
        }

        let count = (dt / self.max_step).ceil().max(1.0) as u32;
        self.ticks += u64::from(count);
        Some(SubstepPlan {
            count,
            dt: dt / count as f32,
        })
    }
}
