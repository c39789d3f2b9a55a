//! Discrete value resolution for SMIL records.
//!
//! Model:
//! - A record's duration is divided into `values.len()` equal slices; the
//!   active index is the slice containing the elapsed time.
//! - Records flagged `repeat` wrap elapsed modulo their own duration (the
//!   per-record hint, not the controller's repeat mode).
//! - Non-repeating records hold their first value before 0 and their last
//!   value past the end.
//!
//! Pure functions of `(record, elapsed)`: no hidden state, idempotent.

use crate::data::SmilAnimation;

/// Euclidean remainder; keeps reverse-playback times inside [0, period).
fn wrap(t: f64, period: f64) -> f64 {
    if period <= 0.0 {
        return 0.0;
    }
    let m = t % period;
    if m < 0.0 {
        m + period
    } else {
        m
    }
}

/// Active value index (0-based) for a record at `elapsed` seconds.
pub fn frame_index_at(anim: &SmilAnimation, elapsed: f64) -> usize {
    let n = anim.values.len();
    if n == 0 || anim.duration <= 0.0 {
        return 0;
    }

    let t = if anim.repeat {
        wrap(elapsed, anim.duration)
    } else if elapsed >= anim.duration {
        return n - 1;
    } else if elapsed < 0.0 {
        return 0;
    } else {
        elapsed
    };

    let slice = anim.duration / n as f64;
    // Clamp absorbs floating-point edge effects at t == duration.
    ((t / slice) as usize).min(n - 1)
}

/// Active value for a record at `elapsed` seconds. `None` only for a record
/// with no values, which the parser never emits.
pub fn value_at(anim: &SmilAnimation, elapsed: f64) -> Option<&str> {
    if anim.values.is_empty() {
        return None;
    }
    Some(anim.values[frame_index_at(anim, elapsed)].as_str())
}
