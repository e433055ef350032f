/*!
 * Markup handling for the translation pipeline.
 *
 * - `scanner`: byte-offset tag scanner shared by every stage
 * - `decompose`: splits a page into doctype, root attributes, head and body
 * - `shield`: hides math containers behind placeholders before translation
 * - `reassemble`: restores placeholders and rebuilds the translated page
 */

pub mod scanner;
pub mod decompose;
pub mod shield;
pub mod reassemble;

pub use decompose::{decompose, DecomposedParts, DEFAULT_DOCTYPE};
pub use reassemble::{Reassembled, Reassembler};
pub use shield::{shield, PlaceholderMap, Restoration, PLACEHOLDER_PREFIX};

/// Escape text for use as element content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Apply non-overlapping `(span, replacement)` edits to `src`.
///
/// Edits may be given in any order; overlapping edits after the first are ignored.
pub fn splice(src: &str, mut edits: Vec<(std::ops::Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(src.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        if range.start < cursor {
            continue;
        }
        out.push_str(&src[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&src[cursor..]);
    out
}
