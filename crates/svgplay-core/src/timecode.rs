//! Time↔frame conversion helpers shared by the controller and its callers.

/// Frame index (0-based) for a time position, given the document duration and
/// frame count. Clamped to `[0, total_frames - 1]`.
#[inline]
pub fn frame_for_time(time: f64, duration: f64, total_frames: usize) -> usize {
    if total_frames == 0 || duration <= 0.0 {
        return 0;
    }
    let frame_time = duration / total_frames as f64;
    // The epsilon absorbs rounding from time_for_frame round-trips, which
    // would otherwise land a hair below the frame boundary.
    ((time / frame_time + 1e-9).floor().max(0.0) as usize).min(total_frames - 1)
}

/// Time position (seconds) at which a frame begins. The index is clamped to
/// `[0, total_frames - 1]` first.
#[inline]
pub fn time_for_frame(frame: usize, duration: f64, total_frames: usize) -> f64 {
    if total_frames == 0 || duration <= 0.0 {
        return 0.0;
    }
    let frame = frame.min(total_frames - 1);
    frame as f64 * (duration / total_frames as f64)
}

/// Format seconds as an `MM:SS.mmm` display string.
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds as u64) / 60;
    let secs = (seconds as u64) % 60;
    let millis = ((seconds - seconds.floor()) * 1000.0) as u64;
    format!("{mins:02}:{secs:02}.{millis:03}")
}
