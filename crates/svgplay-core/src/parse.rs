//! SMIL `<animate>` extraction from preprocessed SVG text.
//!
//! This is deliberately lightweight substring scanning, not a validating XML
//! parser: unrecognizable markup is skipped, never fatal. A record is kept
//! only when it has a resolvable target id, a non-empty values list, and a
//! parseable duration; everything else is dropped with a warning and the
//! scan continues.

use log::{debug, warn};

use crate::data::SmilAnimation;
use crate::error::AnimationError;

/// Parse a SMIL duration string ("1.5s", "500ms") to seconds.
///
/// Only the `s` and `ms` suffixes are accepted; unit-less, malformed, or
/// non-positive input is an explicit error so callers never guess a default.
pub fn parse_duration(raw: &str) -> Result<f64, AnimationError> {
    let raw = raw.trim();
    let invalid = || AnimationError::InvalidDuration {
        raw: raw.to_string(),
    };

    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .ok_or_else(invalid)?;
    let value: f64 = raw[..split].parse().map_err(|_| invalid())?;

    let seconds = match &raw[split..] {
        "s" => value,
        "ms" => value / 1000.0,
        _ => return Err(invalid()),
    };
    if seconds <= 0.0 || !seconds.is_finite() {
        return Err(invalid());
    }
    Ok(seconds)
}

/// Extract a quoted attribute value from a raw tag substring.
/// Accepts either quote style; the closing quote must match the opening one.
pub(crate) fn extract_attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    for quote in ['"', '\''] {
        let pattern = format!("{name}={quote}");
        if let Some(start) = tag.find(&pattern) {
            let value_start = start + pattern.len();
            let value_end = tag[value_start..].find(quote)?;
            return Some(&tag[value_start..value_start + value_end]);
        }
    }
    None
}

/// Resolve the target element id for an `<animate>` tag at byte offset `pos`.
///
/// An `xlink:href`/`href` of the form `#id` on the tag itself wins; otherwise
/// the nearest enclosing unclosed `<use>` before the tag is the parent, with
/// `<g >` as the fallback.
fn resolve_target_id(content: &str, pos: usize, tag: &str) -> Option<String> {
    let href = extract_attribute(tag, "xlink:href").or_else(|| extract_attribute(tag, "href"));
    if let Some(href) = href {
        if let Some(id) = href.strip_prefix('#') {
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }

    let before = &content[..pos];
    let parent_start = match before.rfind("<use") {
        // A </use> between the candidate and our tag means it was closed
        // before the <animate>; it cannot be the parent.
        Some(use_pos) if !before[use_pos..].contains("</use>") => Some(use_pos),
        _ => before.rfind("<g "),
    };

    let parent_start = parent_start?;
    let parent_end = before[parent_start..].find('>')?;
    let parent_tag = &before[parent_start..parent_start + parent_end];
    extract_attribute(parent_tag, "id").map(|id| id.to_string())
}

fn parse_repeat_flag(tag: &str) -> bool {
    match extract_attribute(tag, "repeatCount") {
        None => false,
        Some("indefinite") => true,
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(count) => count > 1.0,
            Err(_) => {
                warn!("unparseable repeatCount {raw:?}, treating as non-repeating");
                false
            }
        },
    }
}

/// Scan preprocessed content for `<animate>` elements, in appearance order.
pub fn parse_animations(content: &str) -> Vec<SmilAnimation> {
    let mut animations = Vec::new();
    let mut pos = 0;

    while let Some(found) = content[pos..].find("<animate") {
        let tag_start = pos + found;
        let Some(close) = content[tag_start..].find('>') else {
            break;
        };
        let mut tag_end = tag_start + close;
        pos = tag_end + 1;
        if content.as_bytes()[tag_end - 1] == b'/' {
            tag_end -= 1;
        }
        let tag = &content[tag_start..tag_end];

        let values: Vec<String> = extract_attribute(tag, "values")
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if values.is_empty() {
            debug!("skipping <animate> at offset {tag_start}: no values");
            continue;
        }

        let Some(target_id) = resolve_target_id(content, tag_start, tag) else {
            debug!("skipping <animate> at offset {tag_start}: no resolvable target");
            continue;
        };

        let duration = match extract_attribute(tag, "dur") {
            Some(raw) => match parse_duration(raw) {
                Ok(seconds) => seconds,
                Err(err) => {
                    warn!("skipping <animate> targeting {target_id:?}: {err}");
                    continue;
                }
            },
            None => {
                let err = AnimationError::MissingAttribute { name: "dur".into() };
                warn!("skipping <animate> targeting {target_id:?}: {err}");
                continue;
            }
        };

        let attribute_name = extract_attribute(tag, "attributeName")
            .unwrap_or("")
            .to_string();
        let calc_mode = extract_attribute(tag, "calcMode")
            .unwrap_or("discrete")
            .to_string();

        animations.push(SmilAnimation {
            target_id,
            attribute_name,
            values,
            duration,
            repeat: parse_repeat_flag(tag),
            calc_mode,
        });
    }

    animations
}
