//! Configuration for the animation controller.

use serde::{Deserialize, Serialize};

/// Tunables for timeline behavior and input validation.
/// Defaults match SMIL frame-cycling content produced by the exporter
/// pipeline; override per controller when hosting unusual documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Nominal frame rate used when a document carries no animations or an
    /// unusable values/duration ratio.
    pub default_frame_rate: f32,
    /// Lower clamp for the derived document frame rate.
    pub min_frame_rate: f32,
    /// Upper clamp for the derived document frame rate.
    pub max_frame_rate: f32,
    /// Minimum playback-rate magnitude accepted by `set_playback_rate`.
    pub min_rate_magnitude: f32,
    /// Maximum playback-rate magnitude accepted by `set_playback_rate`.
    pub max_rate_magnitude: f32,
    /// Largest delta accepted by a single `update()` call, in seconds.
    /// Protects the timeline from debugger pauses and clock glitches.
    pub max_update_delta: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_frame_rate: 30.0,
            min_frame_rate: 1.0,
            max_frame_rate: 240.0,
            min_rate_magnitude: 0.1,
            max_rate_magnitude: 10.0,
            max_update_delta: 0.25,
        }
    }
}
