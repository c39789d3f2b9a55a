//! Controller lifecycle, seeking, scrubbing and stats behavior.

use std::cell::RefCell;
use std::rc::Rc;

use svgplay_core::{AnimationController, PlaybackState};

const FLIPBOOK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg">
    <use id="f1" href="#sprite">
        <animate attributeName="xlink:href" values="a;b;c" dur="3s"/>
    </use>
</svg>"##;

fn loaded() -> AnimationController {
    let mut ctl = AnimationController::new();
    ctl.load_from_content(FLIPBOOK).unwrap();
    ctl
}

#[test]
fn load_exposes_content_and_records() {
    let ctl = loaded();
    assert_eq!(ctl.original_content(), Some(FLIPBOOK));
    assert_eq!(ctl.processed_content(), Some(FLIPBOOK));
    assert!(ctl.synthetic_ids().unwrap().is_empty());
    assert_eq!(ctl.animations().len(), 1);
    assert_eq!(ctl.total_frames(), 3);
    assert_eq!(ctl.duration(), 3.0);
}

#[test]
fn unload_returns_to_inert_state() {
    let mut ctl = loaded();
    ctl.play();
    ctl.unload();
    assert!(!ctl.is_loaded());
    assert!(ctl.is_stopped());
    assert_eq!(ctl.processed_content(), None);
    assert_eq!(ctl.current_time(), 0.0);
    assert!(ctl.animations().is_empty());
}

#[test]
fn transport_transitions() {
    let mut ctl = loaded();
    assert!(ctl.is_stopped());
    ctl.play();
    assert!(ctl.is_playing());
    ctl.pause();
    assert!(ctl.is_paused());
    ctl.toggle_playback();
    assert!(ctl.is_playing());
    ctl.toggle_playback();
    assert!(ctl.is_paused());
    ctl.stop();
    assert!(ctl.is_stopped());
    assert_eq!(ctl.current_time(), 0.0);
}

#[test]
fn stop_rewinds_and_clears_loop_state() {
    let mut ctl = loaded();
    ctl.seek_to(2.0);
    ctl.play();
    ctl.stop();
    assert_eq!(ctl.current_time(), 0.0);
    assert_eq!(ctl.completed_loops(), 0);
    assert!(ctl.is_playing_forward());
    assert_eq!(ctl.current_frame(), 0);
}

#[test]
fn seek_to_frame_round_trips_every_frame() {
    let mut ctl = loaded();
    for frame in 0..ctl.total_frames() {
        ctl.seek_to_frame(frame);
        assert_eq!(ctl.current_frame(), frame, "frame {frame} did not round-trip");
    }
}

#[test]
fn seek_to_progress_resolves_midpoint_value() {
    let mut ctl = loaded();
    ctl.seek_to_progress(0.5);
    assert_eq!(ctl.current_frame(), 1);
    assert!((ctl.progress() - 0.5).abs() < 1e-9);

    let states = ctl.current_animation_states();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].target_id, "f1");
    assert_eq!(states[0].attribute_name, "xlink:href");
    assert_eq!(states[0].value, "b");
}

#[test]
fn seeks_saturate_at_document_bounds() {
    let mut ctl = loaded();
    ctl.seek_to(-5.0);
    assert_eq!(ctl.current_time(), 0.0);
    ctl.seek_to(99.0);
    assert_eq!(ctl.current_time(), 3.0);
    ctl.seek_backward_by_time(1.0);
    assert_eq!(ctl.current_time(), 2.0);
    ctl.seek_forward_by_time(100.0);
    assert_eq!(ctl.current_time(), 3.0);
    ctl.seek_to_start();
    assert_eq!(ctl.current_time(), 0.0);
    ctl.seek_forward_by_fraction(0.5);
    assert!((ctl.current_time() - 1.5).abs() < 1e-9);
    ctl.seek_backward_by_fraction(1.0);
    assert_eq!(ctl.current_time(), 0.0);
    ctl.seek_to_end();
    assert_eq!(ctl.current_time(), 3.0);
}

#[test]
fn seeking_does_not_change_playback_state() {
    let mut ctl = loaded();
    ctl.play();
    ctl.seek_to_progress(0.9);
    assert!(ctl.is_playing());
    ctl.pause();
    ctl.seek_to_start();
    assert!(ctl.is_paused());
}

#[test]
fn scrub_gesture_pauses_then_resumes() {
    let mut ctl = loaded();
    ctl.play();
    ctl.begin_scrubbing();
    assert!(ctl.is_scrubbing());
    assert!(ctl.is_paused());

    // The timeline holds still while scrubbed, even if update() is ticked.
    assert!(!ctl.update(0.25));
    assert_eq!(ctl.current_time(), 0.0);

    ctl.scrub_to_progress(0.5);
    assert!((ctl.current_time() - 1.5).abs() < 1e-9);

    ctl.end_scrubbing(true);
    assert!(!ctl.is_scrubbing());
    assert!(ctl.is_playing());
    assert!((ctl.current_time() - 1.5).abs() < 1e-9);
}

#[test]
fn scrub_without_resume_stays_paused() {
    let mut ctl = loaded();
    ctl.play();
    ctl.begin_scrubbing();
    ctl.scrub_to_progress(1.0);
    ctl.end_scrubbing(false);
    assert!(ctl.is_paused());
    assert_eq!(ctl.current_time(), 3.0);
}

#[test]
fn scrub_from_paused_never_resumes() {
    let mut ctl = loaded();
    ctl.play();
    ctl.pause();
    ctl.begin_scrubbing();
    ctl.end_scrubbing(true);
    assert!(ctl.is_paused());
}

#[test]
fn scrub_to_progress_outside_gesture_is_ignored() {
    let mut ctl = loaded();
    ctl.scrub_to_progress(0.5);
    assert_eq!(ctl.current_time(), 0.0);
}

#[test]
fn update_reports_frame_changes() {
    let svg = r##"<svg>
        <use id="fast" href="#s">
            <animate attributeName="xlink:href" values="a;b;c" dur="0.3s"/>
        </use>
    </svg>"##;
    let mut ctl = AnimationController::new();
    ctl.load_from_content(svg).unwrap();
    ctl.play();

    // 0.25s into a 0.3s/3-frame doc jumps from frame 0 straight to frame 2.
    assert!(ctl.update(0.25));
    let changes = ctl.frame_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].target_id, "fast");
    assert_eq!(changes[0].previous_frame, 0);
    assert_eq!(changes[0].current_frame, 2);
    assert_eq!(ctl.stats().frame_skips, 1);
}

#[test]
fn update_within_a_frame_reports_no_change() {
    let mut ctl = loaded();
    ctl.play();
    assert!(!ctl.update(0.1));
    assert!(ctl.frame_changes().is_empty());
    assert_eq!(ctl.stats().frame_skips, 0);
}

#[test]
fn seeks_reset_the_change_list() {
    let mut ctl = loaded();
    ctl.play();
    ctl.update(0.25);
    ctl.seek_to_progress(0.9);
    assert!(ctl.frame_changes().is_empty());
    // Seeking is not a skip, whatever the distance.
    assert_eq!(ctl.stats().frame_skips, 0);
}

#[test]
fn external_frame_tracking_leaves_playback_alone() {
    let mut ctl = loaded();
    assert_eq!(ctl.track_frames_at(0.0), vec![0]);
    assert_eq!(ctl.track_frames_at(1.5), vec![1]);
    assert_eq!(ctl.track_frames_at(99.0), vec![2]);
    // Playhead and state never moved, only the tracking did.
    assert_eq!(ctl.current_time(), 0.0);
    assert!(ctl.is_stopped());

    let changes = ctl.frame_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].previous_frame, 1);
    assert_eq!(changes[0].current_frame, 2);
}

#[test]
fn frame_time_conversions_use_document_shape() {
    let ctl = loaded();
    assert_eq!(ctl.frame_for_time(1.5), 1);
    assert_eq!(ctl.time_for_frame(2), 2.0);
    assert_eq!(ctl.frame_for_time(99.0), 2);
}

#[test]
fn formatted_time_tracks_playhead() {
    let mut ctl = loaded();
    assert_eq!(ctl.formatted_time(), "00:00.000");
    ctl.seek_to(1.25);
    assert_eq!(ctl.formatted_time(), "00:01.250");
}

#[test]
fn stats_snapshot_and_reset() {
    let mut ctl = loaded();
    ctl.seek_to_frame(2);
    ctl.record_render_time(4.2);
    assert_eq!(ctl.stats().render_time_ms, 4.2);
    assert_eq!(ctl.stats().current_frame, 2);
    assert_eq!(ctl.stats().total_frames, 3);
    assert_eq!(ctl.stats().animation_time_ms, 2000.0);

    ctl.reset_stats();
    assert_eq!(ctl.stats().render_time_ms, 0.0);
    assert_eq!(ctl.stats().frame_skips, 0);
    // The reset keeps the document shape and playhead frame.
    assert_eq!(ctl.stats().total_frames, 3);
    assert_eq!(ctl.stats().current_frame, 2);
}

#[test]
fn stats_serialize_for_host_reporting() {
    let mut ctl = loaded();
    ctl.seek_to_frame(1);
    let json = serde_json::to_value(ctl.stats()).unwrap();
    assert_eq!(json["current_frame"], 1);
    assert_eq!(json["total_frames"], 3);
    assert_eq!(json["animation_time_ms"], 1000.0);
}

#[test]
fn state_change_callback_sees_each_transition() {
    let seen: Rc<RefCell<Vec<(PlaybackState, PlaybackState)>>> = Rc::default();
    let sink = Rc::clone(&seen);

    let mut ctl = loaded();
    ctl.set_state_change_callback(move |prev, next| sink.borrow_mut().push((prev, next)));
    ctl.play();
    ctl.pause();
    ctl.stop();

    assert_eq!(
        seen.borrow().as_slice(),
        &[
            (PlaybackState::Stopped, PlaybackState::Playing),
            (PlaybackState::Playing, PlaybackState::Paused),
            (PlaybackState::Paused, PlaybackState::Stopped),
        ]
    );
}

#[test]
fn redundant_transitions_do_not_fire() {
    let count = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&count);

    let mut ctl = loaded();
    ctl.set_state_change_callback(move |_, _| *sink.borrow_mut() += 1);
    ctl.play();
    ctl.play();
    ctl.pause();
    ctl.pause();
    assert_eq!(*count.borrow(), 2);
}
