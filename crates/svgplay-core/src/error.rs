//! Error types for the animation controller

use serde::{Deserialize, Serialize};

/// Error type covering load and parse failures.
///
/// Per-record parse problems never surface here during a load: a bad
/// `<animate>` is skipped and the rest of the document keeps parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Content was empty or too short to contain a recognizable SVG root.
    #[error("Content has no <svg> root element")]
    MissingSvgRoot,

    /// Duration string could not be parsed as `<number>s` or `<number>ms`.
    #[error("Invalid duration: {raw:?}")]
    InvalidDuration { raw: String },

    /// A required attribute was absent from an `<animate>` tag.
    #[error("Missing attribute {name:?} on <animate>")]
    MissingAttribute { name: String },

    /// IO error while reading a file path
    #[error("IO error: {reason}")]
    Io { reason: String },
}

impl From<std::io::Error> for AnimationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = AnimationError::InvalidDuration { raw: "bad".into() };
        assert_eq!(err.to_string(), "Invalid duration: \"bad\"");
        assert_eq!(
            AnimationError::MissingSvgRoot.to_string(),
            "Content has no <svg> root element"
        );
        assert_eq!(
            AnimationError::MissingAttribute { name: "dur".into() }.to_string(),
            "Missing attribute \"dur\" on <animate>"
        );
    }

    #[test]
    fn io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.svg");
        let err: AnimationError = io.into();
        assert!(matches!(err, AnimationError::Io { .. }));
    }
}
