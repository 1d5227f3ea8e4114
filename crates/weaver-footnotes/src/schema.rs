//! Which attributes may be set where.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::attributes::Attributes;
use crate::document::Document;
use crate::text::TextBuffer;
use crate::types::{PARAGRAPH_BREAK, Range};

/// Attribute rules for text, plus the inline items allowed next to it.
///
/// A key must be allowed on text before it can be set anywhere. On top of
/// that, a key can be blocked wherever another key is present, e.g. no
/// footnotes inside inline code.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    text_attributes: BTreeSet<SmolStr>,
    disallowed_with: Vec<(SmolStr, SmolStr)>,
    inline_items: BTreeSet<SmolStr>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `key` on text.
    pub fn allow_text_attribute(&mut self, key: impl Into<SmolStr>) -> &mut Self {
        self.text_attributes.insert(key.into());
        self
    }

    /// Forbid `key` on text that already carries `blocking_key`.
    pub fn disallow_attribute_with(
        &mut self,
        key: impl Into<SmolStr>,
        blocking_key: impl Into<SmolStr>,
    ) -> &mut Self {
        self.disallowed_with.push((key.into(), blocking_key.into()));
        self
    }

    /// Register an inline item that may go wherever text may.
    pub fn allow_inline(&mut self, name: impl Into<SmolStr>) -> &mut Self {
        self.inline_items.insert(name.into());
        self
    }

    /// Whether `name` may be inserted at the selection.
    ///
    /// Every paragraph accepts text, so this only depends on registration.
    pub fn check_child(&self, name: &str) -> bool {
        self.inline_items.contains(name)
    }

    pub fn is_text_attribute(&self, key: &str) -> bool {
        self.text_attributes.contains(key)
    }

    /// Whether `key` may be set on text carrying `attrs`.
    pub fn check_attribute(&self, attrs: &Attributes, key: &str) -> bool {
        self.is_text_attribute(key)
            && !self
                .disallowed_with
                .iter()
                .any(|(k, blocking)| k == key && attrs.contains(blocking))
    }

    /// Whether `key` can be applied to the document's current selection.
    ///
    /// Collapsed selections are checked against the typing attributes.
    /// Expanded selections pass if any char inside them accepts the key.
    pub fn check_attribute_in_selection<T: TextBuffer>(&self, doc: &Document<T>, key: &str) -> bool {
        let selection = doc.selection();
        if selection.is_collapsed() {
            return self.check_attribute(&doc.selection_attributes(), key);
        }
        !self.valid_ranges(doc, [selection.first_range()], key).is_empty()
    }

    /// Sub-ranges of `ranges` where `key` may be set.
    ///
    /// Ranges are split at paragraph breaks and around runs whose attributes
    /// block the key. Adjacent allowed stretches are joined.
    pub fn valid_ranges<T: TextBuffer>(
        &self,
        doc: &Document<T>,
        ranges: impl IntoIterator<Item = Range>,
        key: &str,
    ) -> Vec<Range> {
        let mut valid = Vec::new();
        if !self.is_text_attribute(key) {
            return valid;
        }
        for range in ranges {
            let mut current: Option<Range> = None;
            for (clip, attrs) in doc.runs().clipped(range) {
                if !self.check_attribute(attrs, key) {
                    valid.extend(current.take());
                    continue;
                }
                for (offset, ch) in doc.text(clip).chars().enumerate() {
                    let pos = clip.start + offset;
                    if ch == PARAGRAPH_BREAK {
                        valid.extend(current.take());
                        continue;
                    }
                    match current.as_mut() {
                        Some(r) if r.end == pos => r.end = pos + 1,
                        _ => {
                            valid.extend(current.take());
                            current = Some(Range::new(pos, pos + 1));
                        }
                    }
                }
            }
            valid.extend(current);
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeValue;
    use crate::types::Selection;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema
            .allow_text_attribute("footnotes")
            .allow_text_attribute("code")
            .disallow_attribute_with("footnotes", "code");
        schema
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let schema = schema();
        assert!(!schema.check_attribute(&Attributes::new(), "comment"));
        let doc = Document::from_text("abc");
        assert!(schema.valid_ranges(&doc, [Range::new(0, 3)], "comment").is_empty());
    }

    #[test]
    fn test_inline_items_need_registration() {
        let mut schema = schema();
        assert!(!schema.check_child("signature"));
        schema.allow_inline("signature");
        assert!(schema.check_child("signature"));
    }

    #[test]
    fn test_valid_ranges_split_at_paragraph_breaks() {
        let schema = schema();
        let doc = Document::from_text("ab\ncd");
        assert_eq!(
            schema.valid_ranges(&doc, [Range::new(0, 5)], "footnotes"),
            vec![Range::new(0, 2), Range::new(3, 5)]
        );
    }

    #[test]
    fn test_valid_ranges_skip_blocked_runs() {
        let schema = schema();
        let mut doc = Document::from_text("one two three");
        doc.change(|w| w.set_attribute("code", AttributeValue::Flag, Range::new(4, 7)));
        assert_eq!(
            schema.valid_ranges(&doc, [Range::new(0, 13)], "footnotes"),
            vec![Range::new(0, 4), Range::new(7, 13)]
        );
    }

    #[test]
    fn test_valid_ranges_join_across_run_boundaries() {
        let schema = schema();
        let mut doc = Document::from_text("abcdef");
        doc.change(|w| w.set_attribute("bold", AttributeValue::Flag, Range::new(2, 4)));
        assert_eq!(
            schema.valid_ranges(&doc, [Range::new(1, 6)], "footnotes"),
            vec![Range::new(1, 6)]
        );
    }

    #[test]
    fn test_check_attribute_in_selection() {
        let schema = schema();
        let mut doc = Document::from_text("code");
        doc.change(|w| {
            w.set_attribute("code", AttributeValue::Flag, Range::new(0, 4));
            w.set_selection(Selection::collapsed(2));
        });
        assert!(!schema.check_attribute_in_selection(&doc, "footnotes"));

        doc.change(|w| w.set_selection(Selection::new(0, 4)));
        assert!(!schema.check_attribute_in_selection(&doc, "footnotes"));

        doc.change(|w| {
            w.insert_content(" x", Attributes::new(), Range::caret(4));
            w.set_selection(Selection::new(0, 6));
        });
        assert!(schema.check_attribute_in_selection(&doc, "footnotes"));
    }
}
