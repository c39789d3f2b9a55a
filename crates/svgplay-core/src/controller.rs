//! The animation controller: document lifecycle plus the playback timeline.
//!
//! A controller owns at most one preprocessed SVG document at a time. Hosts
//! drive it with wall-clock deltas via [`AnimationController::update`] and
//! read back resolved attribute values with
//! [`AnimationController::current_animation_states`]; rendering itself stays
//! on the host's side.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use crate::config::ControllerConfig;
use crate::data::{AnimationState, FrameChange, SmilAnimation};
use crate::error::AnimationError;
use crate::state::{PlaybackState, RepeatMode};
use crate::stats::{AnimationStats, UpdateClock};
use crate::{parse, preprocess, sampling, timecode};

/// Invoked on every playback-state transition with `(previous, next)`.
pub type StateChangeCallback = Box<dyn FnMut(PlaybackState, PlaybackState)>;
/// Invoked each time the timeline wraps or bounces, with the new loop count.
pub type LoopCallback = Box<dyn FnMut(u32)>;
/// Invoked once when playback reaches its terminal boundary.
pub type EndCallback = Box<dyn FnMut()>;

/// Everything derived from one loaded SVG document.
struct Document {
    original: String,
    processed: String,
    synthetic_ids: BTreeMap<usize, String>,
    animations: Vec<SmilAnimation>,
    duration: f64,
    total_frames: usize,
    frame_rate: f32,
}

/// Playback controller for SMIL frame-cycling SVG documents.
///
/// Single-threaded by design: the host owns the controller and calls it from
/// its render loop. Callbacks run synchronously inside the mutating call that
/// triggered them, in a fixed order (state change, then loops, then end).
pub struct AnimationController {
    config: ControllerConfig,
    document: Option<Document>,

    state: PlaybackState,
    repeat_mode: RepeatMode,
    repeat_count: u32,
    completed_loops: u32,
    playing_forward: bool,
    playback_rate: f32,
    current_time: f64,
    /// Pre-scrub playback state, `Some` while a scrub gesture is active.
    scrub: Option<PlaybackState>,

    /// Last observed frame index per animation record, parallel to
    /// `document.animations`.
    track_frames: Vec<usize>,
    last_changes: Vec<FrameChange>,

    stats: AnimationStats,
    clock: UpdateClock,

    on_state_change: Option<StateChangeCallback>,
    on_loop: Option<LoopCallback>,
    on_end: Option<EndCallback>,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationController {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            document: None,
            state: PlaybackState::Stopped,
            repeat_mode: RepeatMode::None,
            repeat_count: 1,
            completed_loops: 0,
            playing_forward: true,
            playback_rate: 1.0,
            current_time: 0.0,
            scrub: None,
            track_frames: Vec::new(),
            last_changes: Vec::new(),
            stats: AnimationStats::default(),
            clock: UpdateClock::new(),
            on_state_change: None,
            on_loop: None,
            on_end: None,
        }
    }

    // ---- document lifecycle ----

    /// Load a document from SVG text. Replaces any previously loaded
    /// document and resets the timeline; repeat mode, repeat count and
    /// playback rate persist across loads.
    ///
    /// Malformed `<animate>` records are skipped, not fatal. A document with
    /// no usable animations loads as a static image with duration 0.
    pub fn load_from_content(&mut self, content: &str) -> crate::Result<()> {
        if !content.contains("<svg") {
            return Err(AnimationError::MissingSvgRoot);
        }

        let pre = preprocess::preprocess_svg(content);
        let animations = parse::parse_animations(&pre.content);

        let (duration, total_frames, frame_rate) = if animations.is_empty() {
            (0.0, 1, self.config.default_frame_rate)
        } else {
            // Parsed records always carry a positive duration.
            let duration = animations.iter().map(|a| a.duration).fold(0.0_f64, f64::max);
            let total_frames = animations
                .iter()
                .map(SmilAnimation::frame_count)
                .max()
                .unwrap_or(1);
            let derived = (total_frames as f64 / duration) as f32;
            let frame_rate =
                derived.clamp(self.config.min_frame_rate, self.config.max_frame_rate);
            if derived != frame_rate {
                log::warn!(
                    "Derived frame rate {derived:.2} fps outside [{:.1}, {:.1}], clamping",
                    self.config.min_frame_rate,
                    self.config.max_frame_rate
                );
            }
            for anim in &animations {
                let record_rate = (anim.frame_count() as f64 / anim.duration) as f32;
                if (record_rate - derived).abs() > 0.1 {
                    log::warn!(
                        "Animation targeting {:?} runs at {record_rate:.2} fps, document rate is {derived:.2} fps",
                        anim.target_id
                    );
                }
            }
            (duration, total_frames, frame_rate)
        };

        log::debug!(
            "Loaded SVG document: {} animation(s), {total_frames} frame(s), {duration:.3}s",
            animations.len()
        );

        self.track_frames = vec![0; animations.len()];
        self.document = Some(Document {
            original: content.to_string(),
            processed: pre.content,
            synthetic_ids: pre.synthetic_ids,
            animations,
            duration,
            total_frames,
            frame_rate,
        });

        self.current_time = 0.0;
        self.completed_loops = 0;
        self.playing_forward = true;
        self.scrub = None;
        self.last_changes.clear();
        self.stats.reset(total_frames);
        self.clock.restart();
        self.transition(PlaybackState::Stopped);
        Ok(())
    }

    /// Read a file and load its contents. See [`Self::load_from_content`].
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> crate::Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.load_from_content(&content)
    }

    /// Drop the current document and return to the unloaded state.
    pub fn unload(&mut self) {
        self.transition(PlaybackState::Stopped);
        self.document = None;
        self.current_time = 0.0;
        self.completed_loops = 0;
        self.playing_forward = true;
        self.scrub = None;
        self.track_frames.clear();
        self.last_changes.clear();
        self.stats.reset(0);
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Preprocessed document text, ready to hand to a renderer.
    pub fn processed_content(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.processed.as_str())
    }

    /// Document text exactly as loaded.
    pub fn original_content(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.original.as_str())
    }

    /// Synthetic-id table produced by preprocessing, keyed by the byte
    /// offset of each rewritten `<use>` tag.
    pub fn synthetic_ids(&self) -> Option<&BTreeMap<usize, String>> {
        self.document.as_ref().map(|d| &d.synthetic_ids)
    }

    /// Document duration in seconds; 0 when unloaded or static.
    pub fn duration(&self) -> f64 {
        self.document.as_ref().map_or(0.0, |d| d.duration)
    }

    /// Total frames in the document; 1 for a static document, 0 when
    /// unloaded.
    pub fn total_frames(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.total_frames)
    }

    /// Frame rate derived from the document's densest animation record.
    pub fn frame_rate(&self) -> f32 {
        self.document
            .as_ref()
            .map_or(self.config.default_frame_rate, |d| d.frame_rate)
    }

    pub fn animations(&self) -> &[SmilAnimation] {
        self.document.as_ref().map_or(&[], |d| d.animations.as_slice())
    }

    pub fn has_animations(&self) -> bool {
        !self.animations().is_empty()
    }

    // ---- transport ----

    /// Start or resume playback. No-op while unloaded or scrubbing. Starting
    /// from the terminal boundary rewinds to the start of travel first.
    pub fn play(&mut self) {
        let Some(duration) = self.document.as_ref().map(|d| d.duration) else {
            return;
        };
        if self.scrub.is_some() || self.state.is_playing() {
            return;
        }
        if self.state == PlaybackState::Stopped && self.repeat_mode.is_finite() {
            if self.effective_direction() > 0.0 && self.current_time >= duration {
                self.completed_loops = 0;
                self.apply_time(0.0);
            } else if self.effective_direction() < 0.0 && self.current_time <= 0.0 {
                self.completed_loops = 0;
                self.apply_time(duration);
            }
        }
        self.clock.restart();
        self.transition(PlaybackState::Playing);
    }

    /// Pause playback, keeping the playhead where it is.
    pub fn pause(&mut self) {
        if self.state.can_pause() {
            self.transition(PlaybackState::Paused);
        }
    }

    /// Halt playback and rewind to time zero. Also resets the loop counter
    /// and travel direction, and cancels any active scrub.
    pub fn stop(&mut self) {
        if self.document.is_none() {
            return;
        }
        self.scrub = None;
        self.completed_loops = 0;
        self.playing_forward = true;
        self.apply_time(0.0);
        self.transition(PlaybackState::Stopped);
    }

    pub fn toggle_playback(&mut self) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state == PlaybackState::Stopped
    }

    // ---- repeat and rate ----

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// Set the loop total for [`RepeatMode::Count`]. Clamped to at least 1.
    pub fn set_repeat_count(&mut self, count: u32) {
        self.repeat_count = count.max(1);
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Boundary crossings completed since the last stop or load.
    pub fn completed_loops(&self) -> u32 {
        self.completed_loops
    }

    /// Current travel direction; flips on each [`RepeatMode::Reverse`]
    /// bounce, independent of playback-rate sign.
    pub fn is_playing_forward(&self) -> bool {
        self.playing_forward
    }

    /// Set the playback rate. The magnitude is clamped to the configured
    /// range, the sign is preserved; a negative rate plays backward. Zero
    /// and non-finite rates are rejected.
    pub fn set_playback_rate(&mut self, rate: f32) {
        if !rate.is_finite() || rate == 0.0 {
            log::warn!("Ignoring unusable playback rate {rate}");
            return;
        }
        let magnitude = rate
            .abs()
            .clamp(self.config.min_rate_magnitude, self.config.max_rate_magnitude);
        self.playback_rate = magnitude.copysign(rate);
    }

    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    // ---- the tick ----

    /// Advance the timeline by `dt` wall-clock seconds. Returns `true` when
    /// the visible frame of any animation changed.
    ///
    /// `dt` is untrusted input: negative deltas are ignored and large ones
    /// are clamped to `max_update_delta`, so a debugger pause does not fling
    /// the playhead. Does nothing unless the controller is playing.
    pub fn update(&mut self, dt: f64) -> bool {
        let started = Instant::now();
        let Some(duration) = self.document.as_ref().map(|d| d.duration) else {
            return false;
        };
        if self.state != PlaybackState::Playing || self.scrub.is_some() {
            return false;
        }

        if let Some(fps) = self.clock.tick() {
            self.stats.fps = fps;
        }
        let dt = dt.clamp(0.0, self.config.max_update_delta);

        let mut pending_loops: Vec<u32> = Vec::new();
        let mut reached_end = false;

        if duration > 0.0 {
            let mut time = self.current_time
                + dt * f64::from(self.playback_rate.abs()) * self.effective_direction();

            // Normalize overshoot one boundary crossing at a time so every
            // wrap is counted even under a large rate.
            loop {
                if time > duration {
                    match self.repeat_mode {
                        RepeatMode::None => {
                            time = duration;
                            reached_end = true;
                        }
                        RepeatMode::Loop => {
                            time -= duration;
                            self.completed_loops += 1;
                            pending_loops.push(self.completed_loops);
                            continue;
                        }
                        RepeatMode::Reverse => {
                            time = duration - (time - duration);
                            self.playing_forward = !self.playing_forward;
                            self.completed_loops += 1;
                            pending_loops.push(self.completed_loops);
                            continue;
                        }
                        RepeatMode::Count => {
                            self.completed_loops += 1;
                            pending_loops.push(self.completed_loops);
                            if self.completed_loops >= self.repeat_count {
                                time = duration;
                                reached_end = true;
                            } else {
                                time -= duration;
                                continue;
                            }
                        }
                    }
                } else if time < 0.0 {
                    match self.repeat_mode {
                        RepeatMode::None => {
                            time = 0.0;
                            reached_end = true;
                        }
                        RepeatMode::Loop => {
                            time += duration;
                            self.completed_loops += 1;
                            pending_loops.push(self.completed_loops);
                            continue;
                        }
                        RepeatMode::Reverse => {
                            time = -time;
                            self.playing_forward = !self.playing_forward;
                            self.completed_loops += 1;
                            pending_loops.push(self.completed_loops);
                            continue;
                        }
                        RepeatMode::Count => {
                            self.completed_loops += 1;
                            pending_loops.push(self.completed_loops);
                            if self.completed_loops >= self.repeat_count {
                                time = 0.0;
                                reached_end = true;
                            } else {
                                time += duration;
                                continue;
                            }
                        }
                    }
                }
                break;
            }

            self.current_time = time.clamp(0.0, duration);
        }

        let changed = self.refresh_frames(true);
        self.stats.animation_time_ms = self.current_time * 1000.0;

        if reached_end {
            self.transition(PlaybackState::Stopped);
        }
        for count in pending_loops {
            if let Some(cb) = self.on_loop.as_mut() {
                cb(count);
            }
        }
        if reached_end {
            if let Some(cb) = self.on_end.as_mut() {
                cb();
            }
        }

        self.stats.update_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        changed
    }

    // ---- seeking ----

    /// Move the playhead to an absolute time, clamped to the document
    /// bounds. Playback state is untouched; a playing controller keeps
    /// playing from the new position.
    pub fn seek_to(&mut self, time: f64) {
        if self.document.is_none() {
            return;
        }
        self.apply_time(time);
    }

    pub fn seek_to_frame(&mut self, frame: usize) {
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        let time = timecode::time_for_frame(frame, doc.duration, doc.total_frames);
        self.apply_time(time);
    }

    /// `progress` in `[0, 1]`, clamped.
    pub fn seek_to_progress(&mut self, progress: f64) {
        let duration = self.duration();
        if self.document.is_none() {
            return;
        }
        self.apply_time(progress.clamp(0.0, 1.0) * duration);
    }

    pub fn seek_to_start(&mut self) {
        self.seek_to(0.0);
    }

    pub fn seek_to_end(&mut self) {
        self.seek_to(self.duration());
    }

    pub fn seek_forward_by_time(&mut self, seconds: f64) {
        self.seek_to(self.current_time + seconds.max(0.0));
    }

    pub fn seek_backward_by_time(&mut self, seconds: f64) {
        self.seek_to(self.current_time - seconds.max(0.0));
    }

    pub fn seek_forward_by_fraction(&mut self, fraction: f64) {
        self.seek_to(self.current_time + fraction.max(0.0) * self.duration());
    }

    pub fn seek_backward_by_fraction(&mut self, fraction: f64) {
        self.seek_to(self.current_time - fraction.max(0.0) * self.duration());
    }

    // ---- stepping ----

    /// Jump a signed number of frames and pause. Stepping always lands the
    /// controller in [`PlaybackState::Paused`], whatever state it was in.
    pub fn step_by_frames(&mut self, frames: i64) {
        let Some((duration, total)) = self
            .document
            .as_ref()
            .map(|d| (d.duration, d.total_frames))
        else {
            return;
        };
        self.transition(PlaybackState::Paused);
        let current = timecode::frame_for_time(self.current_time, duration, total) as i64;
        let target = (current + frames).clamp(0, total as i64 - 1) as usize;
        self.apply_time(timecode::time_for_frame(target, duration, total));
    }

    pub fn step_forward(&mut self) {
        self.step_by_frames(1);
    }

    pub fn step_backward(&mut self) {
        self.step_by_frames(-1);
    }

    // ---- scrubbing ----

    /// Enter scrub mode: playback pauses and the pre-scrub state is
    /// remembered for [`Self::end_scrubbing`].
    pub fn begin_scrubbing(&mut self) {
        if self.document.is_none() || self.scrub.is_some() {
            return;
        }
        let prior = self.state;
        self.transition(PlaybackState::Paused);
        self.scrub = Some(prior);
    }

    /// Move the playhead while scrubbing. No-op outside a scrub gesture.
    pub fn scrub_to_progress(&mut self, progress: f64) {
        if self.scrub.is_none() {
            return;
        }
        self.seek_to_progress(progress);
    }

    /// Leave scrub mode. With `resume`, playback continues if the
    /// controller was playing when the gesture began; otherwise it stays
    /// paused at the scrubbed position.
    pub fn end_scrubbing(&mut self, resume: bool) {
        let Some(prior) = self.scrub.take() else {
            return;
        };
        if resume && prior.is_playing() {
            self.clock.restart();
            self.transition(PlaybackState::Playing);
        }
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    // ---- playhead queries ----

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Normalized playhead position in `[0, 1]`; 0 for static documents.
    pub fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 {
            self.current_time / duration
        } else {
            0.0
        }
    }

    pub fn current_frame(&self) -> usize {
        self.document.as_ref().map_or(0, |d| {
            timecode::frame_for_time(self.current_time, d.duration, d.total_frames)
        })
    }

    /// Playhead position as `MM:SS.mmm`.
    pub fn formatted_time(&self) -> String {
        timecode::format_time(self.current_time)
    }

    /// Resolved attribute values for every animation at the current
    /// playhead, in document order.
    pub fn current_animation_states(&self) -> Vec<AnimationState> {
        let Some(doc) = self.document.as_ref() else {
            return Vec::new();
        };
        doc.animations
            .iter()
            .filter_map(|anim| {
                sampling::value_at(anim, self.current_time).map(|value| AnimationState {
                    target_id: anim.target_id.clone(),
                    attribute_name: anim.attribute_name.clone(),
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Frame transitions observed by the most recent `update()` call.
    /// Seeks and steps clear this list.
    pub fn frame_changes(&self) -> &[FrameChange] {
        &self.last_changes
    }

    /// Refresh the per-animation frame tracking from an externally driven
    /// clock. Rebuilds the frame-change list against the last tracked
    /// indices without moving the playhead, changing playback state, or
    /// firing callbacks. Returns the frame index of every animation record
    /// at `time`, in document order.
    pub fn track_frames_at(&mut self, time: f64) -> Vec<usize> {
        let Some(doc) = self.document.as_ref() else {
            return Vec::new();
        };
        let mut changes = Vec::new();
        let mut indices = Vec::with_capacity(doc.animations.len());
        for (i, anim) in doc.animations.iter().enumerate() {
            let index = sampling::frame_index_at(anim, time);
            if index != self.track_frames[i] {
                changes.push(FrameChange {
                    target_id: anim.target_id.clone(),
                    previous_frame: self.track_frames[i],
                    current_frame: index,
                });
                self.track_frames[i] = index;
            }
            indices.push(index);
        }
        self.last_changes = changes;
        indices
    }

    pub fn frame_for_time(&self, time: f64) -> usize {
        self.document.as_ref().map_or(0, |d| {
            timecode::frame_for_time(time, d.duration, d.total_frames)
        })
    }

    pub fn time_for_frame(&self, frame: usize) -> f64 {
        self.document.as_ref().map_or(0.0, |d| {
            timecode::time_for_frame(frame, d.duration, d.total_frames)
        })
    }

    // ---- stats ----

    pub fn stats(&self) -> &AnimationStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        let total = self.total_frames();
        self.stats.reset(total);
        self.stats.current_frame = self.current_frame();
        self.clock.restart();
    }

    /// Report the host's render cost for the last frame, in milliseconds.
    pub fn record_render_time(&mut self, ms: f64) {
        self.stats.render_time_ms = ms;
    }

    // ---- callbacks ----

    pub fn set_state_change_callback(
        &mut self,
        callback: impl FnMut(PlaybackState, PlaybackState) + 'static,
    ) {
        self.on_state_change = Some(Box::new(callback));
    }

    pub fn set_loop_callback(&mut self, callback: impl FnMut(u32) + 'static) {
        self.on_loop = Some(Box::new(callback));
    }

    pub fn set_end_callback(&mut self, callback: impl FnMut() + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    // ---- internals ----

    fn effective_direction(&self) -> f64 {
        let mut dir = if self.playing_forward { 1.0 } else { -1.0 };
        if self.playback_rate < 0.0 {
            dir = -dir;
        }
        dir
    }

    fn transition(&mut self, next: PlaybackState) {
        if next == self.state {
            return;
        }
        let prev = self.state;
        self.state = next;
        log::debug!("Playback state {} -> {}", prev.name(), next.name());
        if let Some(cb) = self.on_state_change.as_mut() {
            cb(prev, next);
        }
    }

    /// Set the playhead to a clamped time and silently resync the frame
    /// bookkeeping so the next `update()` reports deltas relative to the new
    /// position rather than the jump itself.
    fn apply_time(&mut self, time: f64) {
        let duration = self.duration();
        self.current_time = time.clamp(0.0, duration.max(0.0));
        self.refresh_frames(false);
        self.stats.animation_time_ms = self.current_time * 1000.0;
    }

    /// Recompute per-animation and global frame indices at `current_time`.
    /// With `record`, fills `last_changes` and counts frame skips; without,
    /// only resynchronizes. Returns whether anything changed.
    fn refresh_frames(&mut self, record: bool) -> bool {
        let Some(doc) = self.document.as_ref() else {
            return false;
        };
        let mut changes = Vec::new();
        let mut any = false;

        for (i, anim) in doc.animations.iter().enumerate() {
            let index = sampling::frame_index_at(anim, self.current_time);
            if index != self.track_frames[i] {
                any = true;
                if record {
                    changes.push(FrameChange {
                        target_id: anim.target_id.clone(),
                        previous_frame: self.track_frames[i],
                        current_frame: index,
                    });
                }
                self.track_frames[i] = index;
            }
        }

        let global = timecode::frame_for_time(self.current_time, doc.duration, doc.total_frames);
        if global != self.stats.current_frame {
            any = true;
            if record && global.abs_diff(self.stats.current_frame) > 1 {
                self.stats.frame_skips += 1;
            }
            self.stats.current_frame = global;
        }

        if record {
            self.last_changes = changes;
        } else {
            self.last_changes.clear();
        }
        any
    }
}
