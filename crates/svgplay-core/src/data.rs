//! Parsed animation records and resolved per-tick outputs.

use serde::{Deserialize, Serialize};

/// One parsed `<animate>` element. Immutable after parsing.
///
/// `values` is never empty: the parser drops records without values before
/// they reach the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmilAnimation {
    /// Id of the element to animate (e.g. "frame1", or a synthetic id)
    pub target_id: String,
    /// Attribute to animate (e.g. "xlink:href", "opacity")
    pub attribute_name: String,
    /// Discrete values cycled through over the duration
    pub values: Vec<String>,
    /// Total animation duration in seconds
    pub duration: f64,
    /// This record's own infinite-repeat hint, independent of the
    /// controller's global repeat mode
    pub repeat: bool,
    /// Interpolation mode from `calcMode`; only "discrete" stepping is
    /// evaluated, other modes fall back to the same stepwise cycling
    pub calc_mode: String,
}

impl SmilAnimation {
    /// Number of discrete values/frames in this record.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.values.len()
    }
}

/// Resolved attribute value for one target element, returned to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Element id to update
    pub target_id: String,
    /// Attribute to modify
    pub attribute_name: String,
    /// Current value to set
    pub value: String,
}

/// A per-animation frame transition observed by the latest `update()` (or
/// `track_frames_at()`) call. Consumed by dirty-region style optimizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameChange {
    pub target_id: String,
    pub previous_frame: usize,
    pub current_frame: usize,
}
