use serde::{Deserialize, Serialize};

/// Playback state of the animation timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Timeline is not advancing; `stop()` also resets it to 0
    Stopped,
    /// Timeline advancing (direction follows rate sign and ping-pong phase)
    Playing,
    /// Timeline frozen at its current position
    Paused,
}

impl PlaybackState {
    /// Get the name of this playback state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    /// Check if the timeline is actively advancing
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if `play()` would be a state change
    #[inline]
    pub fn can_resume(&self) -> bool {
        matches!(self, Self::Stopped | Self::Paused)
    }

    /// Check if `pause()` would be a state change
    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Behavior when the timeline reaches a duration boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Play one traversal and stop at the boundary
    None,
    /// Wrap back to the opposite boundary and keep playing
    Loop,
    /// Reverse direction at each boundary (ping-pong)
    Reverse,
    /// Repeat a fixed number of traversals, then stop
    Count,
}

impl RepeatMode {
    /// Get the name of this repeat mode
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Loop => "loop",
            Self::Reverse => "reverse",
            Self::Count => "count",
        }
    }

    /// Check if this mode ever reaches a terminal state
    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::None | Self::Count)
    }
}
