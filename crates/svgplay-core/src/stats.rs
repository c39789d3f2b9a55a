//! Playback statistics reported to hosts.

use std::time::Instant;

use serde::Serialize;

/// Performance counters for the current document. Snapshot type returned by
/// `AnimationController::stats()`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnimationStats {
    /// Host-reported render cost of the last frame, in milliseconds
    pub render_time_ms: f64,
    /// Time spent inside the last `update()` call, in milliseconds
    pub update_time_ms: f64,
    /// Current timeline position, in milliseconds
    pub animation_time_ms: f64,
    /// Current frame index (0-based)
    pub current_frame: usize,
    /// Total frames in the document
    pub total_frames: usize,
    /// Update frequency derived from wall-clock spacing of `update()` calls
    pub fps: f64,
    /// Updates whose global frame index advanced by more than one frame
    pub frame_skips: u64,
}

impl AnimationStats {
    /// Reset all counters, keeping the document's frame total.
    pub fn reset(&mut self, total_frames: usize) {
        *self = Self {
            total_frames,
            ..Self::default()
        };
    }
}

/// Wall-clock tracker for the fps counter. Timeline time is caller-driven,
/// but fps measures how often the caller actually ticks us.
#[derive(Debug, Clone)]
pub(crate) struct UpdateClock {
    last_update: Instant,
}

impl UpdateClock {
    pub(crate) fn new() -> Self {
        Self {
            last_update: Instant::now(),
        }
    }

    /// Record one `update()` call and return the measured rate, if any time
    /// has passed since the previous call.
    pub(crate) fn tick(&mut self) -> Option<f64> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        (elapsed > 0.0).then(|| 1.0 / elapsed)
    }

    pub(crate) fn restart(&mut self) {
        self.last_update = Instant::now();
    }
}
