//! Maximal attribute range discovery.

use crate::attributes::AttributeValue;
use crate::document::Document;
use crate::text::TextBuffer;
use crate::types::{PARAGRAPH_BREAK, Range};

/// Find the maximal range around `position` whose text carries `key = value`.
///
/// Walks backward from `position` while the char before it matches, then
/// forward while the char at the end matches. Any other value, a missing
/// attribute, or a paragraph break ends the walk. The walk advances run by
/// run, so its cost is bounded by the length of the annotation.
///
/// Callers are expected to have checked that `position` touches such text;
/// otherwise the result is the empty range at `position`.
pub fn find_attribute_range<T: TextBuffer>(
    doc: &Document<T>,
    position: usize,
    key: &str,
    value: &AttributeValue,
) -> Range {
    let runs = doc.runs().runs();
    let matches = |idx: usize| runs[idx].attrs.get(key) == Some(value);

    let mut start = position.min(doc.len_chars());
    while let Some(idx) = start.checked_sub(1).and_then(|p| doc.runs().index_at(p)) {
        if !matches(idx) {
            break;
        }
        let from = runs[idx].range.start;
        let chunk = doc.text(Range::new(from, start));
        match chunk.chars().rev().position(|c| c == PARAGRAPH_BREAK) {
            Some(back) => {
                start -= back;
                break;
            }
            None => start = from,
        }
    }

    let mut end = position.min(doc.len_chars());
    while let Some(idx) = doc.runs().index_at(end) {
        if !matches(idx) {
            break;
        }
        let to = runs[idx].range.end;
        let chunk = doc.text(Range::new(end, to));
        match chunk.chars().position(|c| c == PARAGRAPH_BREAK) {
            Some(ahead) => {
                end += ahead;
                break;
            }
            None => end = to,
        }
    }

    tracing::trace!(
        target: "weaver::footnotes",
        key,
        position,
        start,
        end,
        "resolved attribute range"
    );
    Range::new(start, end)
}
