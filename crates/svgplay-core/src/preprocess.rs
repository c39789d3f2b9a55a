//! SVG content rewriting applied before animation parsing.
//!
//! Two transformations, in this fixed order so synthetic-id offsets stay
//! deterministic:
//! 1. `<symbol>` elements become `<g>` (downstream renderers don't support
//!    `<symbol>`, and `<g>` behaves equivalently for frame-cycling content).
//! 2. `<use>` elements that lack an `id` but contain an `<animate>` child get
//!    a synthetic `id="_smil_target_N"`, so each instantiation of a shared
//!    symbol can be targeted independently.
//!
//! The rewriter is best-effort text processing: unterminated or malformed
//! tags are passed through untouched, never an error.

use std::collections::BTreeMap;

use log::debug;

/// Prefix for identifiers injected into id-less `<use>` elements.
pub const SYNTHETIC_ID_PREFIX: &str = "_smil_target_";

/// Result of preprocessing: rewritten text plus the synthetic-id table.
///
/// The table maps the byte offset of each rewritten `<use>` (in `content`,
/// before its own insertion) to the injected id. Re-running the preprocessor
/// on identical input yields an identical table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessedSvg {
    pub content: String,
    pub synthetic_ids: BTreeMap<usize, String>,
}

/// Rewrite `<symbol …>…</symbol>` to `<g …>…</g>`, keeping all attributes
/// and children verbatim.
pub fn convert_symbols_to_groups(content: &str) -> String {
    let mut result = content.to_string();
    let mut pos = 0;

    while let Some(found) = result[pos..].find("<symbol") {
        let start = pos + found;
        let Some(close) = result[start..].find('>') else {
            break;
        };
        let tag_end = start + close;
        let self_closing = result.as_bytes()[tag_end - 1] == b'/';

        result.replace_range(start..start + "<symbol".len(), "<g");
        if !self_closing {
            if let Some(close_tag) = result[start..].find("</symbol>") {
                let close_start = start + close_tag;
                result.replace_range(close_start..close_start + "</symbol>".len(), "</g>");
            }
        }
        pos = start + 2;
    }

    result
}

/// Preprocess raw SVG text. See the module docs for the transformation order.
pub fn preprocess_svg(content: &str) -> PreprocessedSvg {
    let mut result = convert_symbols_to_groups(content);
    let mut synthetic_ids = BTreeMap::new();
    let mut counter = 0usize;
    let mut search = 0usize;

    while let Some(found) = result[search..].find("<use") {
        let start = search + found;
        let Some(close) = result[start..].find('>') else {
            break;
        };
        let tag_end = start + close;
        let use_tag = &result[start..=tag_end];
        let self_closing = result.as_bytes()[tag_end - 1] == b'/';

        let has_id = use_tag.contains(" id=")
            || use_tag.contains("\tid=")
            || use_tag.contains("\nid=");

        if !has_id && !self_closing && has_animate_child(&result, tag_end) {
            let id = format!("{SYNTHETIC_ID_PREFIX}{counter}");
            counter += 1;
            let insertion = format!(" id=\"{id}\"");
            result.insert_str(start + "<use".len(), &insertion);
            debug!("injected synthetic id {id:?} into <use> at offset {start}");
            synthetic_ids.insert(start, id);
            search = tag_end + insertion.len() + 1;
            continue;
        }

        search = tag_end + 1;
    }

    PreprocessedSvg {
        content: result,
        synthetic_ids,
    }
}

/// Check whether an `<animate>` appears between a `<use>`'s opening tag (at
/// `tag_end`) and its close, tolerating unclosed `<use>` elements.
fn has_animate_child(content: &str, tag_end: usize) -> bool {
    let Some(animate) = content[tag_end..].find("<animate").map(|p| p + tag_end) else {
        return false;
    };
    match content[tag_end..].find("</use>").map(|p| p + tag_end) {
        Some(close_use) => animate < close_use,
        None => match content[tag_end + 1..].find("<use").map(|p| p + tag_end + 1) {
            Some(next_use) => animate < next_use,
            None => true,
        },
    }
}
