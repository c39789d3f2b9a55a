//! Renderer-agnostic playback controller for SMIL frame-cycling SVG
//! documents.
//!
//! The crate takes SVG text using discrete `<animate>` value cycling (the
//! "flip-book" idiom produced by frame-export pipelines), preprocesses it
//! into renderer-friendly form, and drives a timeline over the parsed
//! animation records. Hosts tick [`AnimationController::update`] from their
//! render loop and apply the returned [`AnimationState`] values to their own
//! DOM or scene graph; no rendering or XML DOM dependency lives here.
//!
//! ```
//! use svgplay_core::{AnimationController, RepeatMode};
//!
//! let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
//!     <use id="frame" xlink:href="#f0">
//!         <animate attributeName="xlink:href" values="#f0;#f1;#f2" dur="3s"/>
//!     </use>
//! </svg>"##;
//!
//! let mut ctl = AnimationController::new();
//! ctl.load_from_content(svg).unwrap();
//! ctl.set_repeat_mode(RepeatMode::Loop);
//! ctl.play();
//!
//! ctl.seek_to(1.5);
//! let states = ctl.current_animation_states();
//! assert_eq!(states.len(), 1);
//! assert_eq!(states[0].target_id, "frame");
//! assert_eq!(states[0].value, "#f1");
//! ```

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod parse;
pub mod preprocess;
pub mod sampling;
pub mod state;
pub mod stats;
pub mod timecode;

pub use config::ControllerConfig;
pub use controller::{AnimationController, EndCallback, LoopCallback, StateChangeCallback};
pub use data::{AnimationState, FrameChange, SmilAnimation};
pub use error::AnimationError;
pub use preprocess::{preprocess_svg, PreprocessedSvg, SYNTHETIC_ID_PREFIX};
pub use state::{PlaybackState, RepeatMode};
pub use stats::AnimationStats;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnimationError>;
