//! Attributed document model with transactional writes.
//!
//! A `Document` pairs a [`TextBuffer`] with a [`RunList`] over the same char
//! offsets and owns the live selection. Reads go through `&Document`; every
//! mutation goes through a [`Writer`] handed out by [`Document::change`], so
//! a change is applied as one unit and never observed half-done.

use smol_str::SmolStr;

use crate::attributes::{AttributeValue, Attributes};
use crate::runs::RunList;
use crate::text::{EditorRope, TextBuffer};
use crate::types::{PARAGRAPH_BREAK, Range, Selection};

/// Live selection plus its typing-attribute override.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentSelection {
    selection: Selection,
    /// Explicit typing attributes. Only honoured while collapsed and dropped
    /// whenever the selection is moved.
    stored: Option<Attributes>,
}

impl DocumentSelection {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.is_collapsed()
    }

    pub fn first_range(&self) -> Range {
        self.selection.range()
    }

    pub fn first_position(&self) -> usize {
        self.selection.start()
    }
}

/// Document text with attribute runs and a selection.
#[derive(Clone)]
pub struct Document<T: TextBuffer = EditorRope> {
    buffer: T,
    runs: RunList,
    selection: DocumentSelection,
    version: u64,
}

impl Default for Document<EditorRope> {
    fn default() -> Self {
        Self::new(EditorRope::new())
    }
}

impl Document<EditorRope> {
    /// Plain, unattributed document.
    pub fn from_text(text: &str) -> Self {
        Self::new(EditorRope::from_str(text))
    }
}

impl<T: TextBuffer> Document<T> {
    /// Wrap an existing buffer. All text starts without attributes.
    pub fn new(buffer: T) -> Self {
        let runs = RunList::uniform(buffer.len_chars(), Attributes::new());
        Self {
            buffer,
            runs,
            selection: DocumentSelection::default(),
            version: 0,
        }
    }

    // === Queries ===

    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    pub fn runs(&self) -> &RunList {
        &self.runs
    }

    /// Number of committed transactions.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn content_string(&self) -> String {
        self.buffer.to_string()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.char_at(offset)
    }

    /// Text of `range`, or an empty string for an out-of-bounds range.
    pub fn text(&self, range: Range) -> SmolStr {
        self.buffer
            .slice(range.start..range.end)
            .unwrap_or_default()
    }

    /// Attributes of the char at `offset`.
    pub fn attributes_at(&self, offset: usize) -> Option<&Attributes> {
        self.runs.attributes_at(offset)
    }

    /// Attributes of the char at `offset` unless it is a paragraph break.
    ///
    /// Paragraph breaks separate sibling lists, so attribute lookups that
    /// walk "the node before/after" stop there.
    pub fn text_attributes_at(&self, offset: usize) -> Option<&Attributes> {
        match self.char_at(offset) {
            Some(PARAGRAPH_BREAK) | None => None,
            Some(_) => self.attributes_at(offset),
        }
    }

    pub fn selection(&self) -> &DocumentSelection {
        &self.selection
    }

    /// Attributes that apply to the selection, i.e. to the next typed text.
    ///
    /// Collapsed: an explicit override if one is stored, otherwise the
    /// attributes of the char before the caret, falling back to the char
    /// after it within the same paragraph. Expanded: the attributes of the
    /// first non-break char inside the selection.
    pub fn selection_attributes(&self) -> Attributes {
        let sel = self.selection.selection;
        if sel.is_collapsed() {
            if let Some(stored) = &self.selection.stored {
                return stored.clone();
            }
            let caret = sel.head;
            let before = caret.checked_sub(1).and_then(|i| self.text_attributes_at(i));
            return before
                .or_else(|| self.text_attributes_at(caret))
                .cloned()
                .unwrap_or_default();
        }
        let range = sel.range();
        (range.start..range.end)
            .find_map(|i| self.text_attributes_at(i))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_selection_attribute(&self, key: &str) -> bool {
        self.selection_attributes().contains(key)
    }

    pub fn selection_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.selection_attributes().get(key).cloned()
    }

    // === Mutation ===

    /// Run `f` as a single change transaction.
    pub fn change<R>(&mut self, f: impl FnOnce(&mut Writer<'_, T>) -> R) -> R {
        let out = f(&mut Writer { doc: self });
        self.version += 1;
        tracing::trace!(
            target: "weaver::footnotes",
            version = self.version,
            len = self.len_chars(),
            runs = self.runs.runs().len(),
            "change committed"
        );
        out
    }

    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.len_chars())
    }
}

/// Mutation handle, only available inside [`Document::change`].
pub struct Writer<'a, T: TextBuffer> {
    doc: &'a mut Document<T>,
}

impl<T: TextBuffer> Writer<'_, T> {
    /// Read access to the document being changed.
    pub fn document(&self) -> &Document<T> {
        &*self.doc
    }

    /// Replace `target` with `text` carrying exactly `attrs`.
    ///
    /// Paragraph breaks inside `text` are stored without attributes, so no
    /// run ever spans two paragraphs. Returns the range the inserted text
    /// occupies afterwards. The range is in char offsets, so it stays valid
    /// even when the new text merged with equal neighbours.
    pub fn insert_content(&mut self, text: &str, attrs: Attributes, target: Range) -> Range {
        let target = Range::new(self.doc.clamp(target.start), self.doc.clamp(target.end));
        self.delete(target);

        let len = text.chars().count();
        let at = target.start;
        if len > 0 {
            self.doc.buffer.insert(at, text);
            let mut offset = at;
            for (i, line) in text.split(PARAGRAPH_BREAK).enumerate() {
                if i > 0 {
                    self.doc.runs.insert(offset, 1, Attributes::new());
                    offset += 1;
                }
                let line_len = line.chars().count();
                self.doc.runs.insert(offset, line_len, attrs.clone());
                offset += line_len;
            }
            self.doc.selection.selection = self
                .doc
                .selection
                .selection
                .map(|p| if p >= at { p + len } else { p });
        }
        Range::new(at, at + len)
    }

    /// Remove the chars in `range`.
    pub fn delete(&mut self, range: Range) {
        let range = Range::new(self.doc.clamp(range.start), self.doc.clamp(range.end));
        if range.is_empty() {
            return;
        }
        self.doc.buffer.delete(range.start..range.end);
        self.doc.runs.delete(range);
        self.doc.selection.selection = self.doc.selection.selection.map(|p| {
            if p >= range.end {
                p - range.len()
            } else {
                p.min(range.start)
            }
        });
    }

    pub fn set_attribute(&mut self, key: &str, value: AttributeValue, range: Range) {
        self.doc.runs.set_attribute(range, key, &value);
    }

    pub fn remove_attribute(&mut self, key: &str, range: Range) {
        self.doc.runs.remove_attribute(range, key);
    }

    /// Move the selection. Drops any stored typing attributes.
    pub fn set_selection(&mut self, selection: impl Into<Selection>) {
        let selection = selection.into();
        let len = self.doc.len_chars();
        self.doc.selection = DocumentSelection {
            selection: selection.map(|p| p.min(len)),
            stored: None,
        };
    }

    /// Add `key` to the typing attributes of a collapsed selection.
    pub fn set_selection_attribute(&mut self, key: &str, value: AttributeValue) {
        let mut attrs = self.doc.selection_attributes();
        attrs.insert(key, value);
        self.doc.selection.stored = Some(attrs);
    }

    /// Drop `key` from the typing attributes of a collapsed selection.
    pub fn remove_selection_attribute(&mut self, key: &str) {
        let attrs = self.doc.selection_attributes().without(key);
        self.doc.selection.stored = Some(attrs);
    }
}

impl<T: TextBuffer> PartialEq for Document<T> {
    /// Tree equality: same text and same attribute runs. Selection and
    /// version are not part of the tree.
    fn eq(&self, other: &Self) -> bool {
        self.buffer.to_string() == other.buffer.to_string() && self.runs == other.runs
    }
}

impl<T: TextBuffer> std::fmt::Debug for Document<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.buffer.to_string())
            .field("runs", &self.runs)
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footnote(title: &str) -> Attributes {
        Attributes::new().with("footnotes", AttributeValue::text(title))
    }

    #[test]
    fn test_insert_content_returns_range() {
        let mut doc = Document::from_text("Hello world");
        let inserted = doc.change(|w| w.insert_content("note", footnote("src1"), Range::caret(5)));
        assert_eq!(inserted, Range::new(5, 9));
        assert_eq!(doc.content_string(), "Hellonote world");
        assert_eq!(doc.attributes_at(5), Some(&footnote("src1")));
        assert_eq!(doc.attributes_at(9), Some(&Attributes::new()));
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_insert_content_replaces_target() {
        let mut doc = Document::from_text("abcdef");
        let inserted = doc.change(|w| w.insert_content("XY", Attributes::new(), Range::new(1, 5)));
        assert_eq!(doc.content_string(), "aXYf");
        assert_eq!(inserted, Range::new(1, 3));
    }

    #[test]
    fn test_selection_follows_edits() {
        let mut doc = Document::from_text("hello world");
        doc.change(|w| w.set_selection(Selection::collapsed(8)));

        doc.change(|w| {
            w.insert_content("big ", Attributes::new(), Range::caret(6));
        });
        assert_eq!(doc.selection().selection(), Selection::collapsed(12));

        doc.change(|w| w.delete(Range::new(0, 6)));
        assert_eq!(doc.selection().selection(), Selection::collapsed(6));

        doc.change(|w| w.delete(Range::new(2, 10)));
        assert_eq!(doc.selection().selection(), Selection::collapsed(2));
    }

    #[test]
    fn test_collapsed_selection_attributes_prefer_char_before() {
        let mut doc = Document::from_text("ab");
        doc.change(|w| {
            w.set_attribute("bold", AttributeValue::Flag, Range::new(0, 1));
            w.set_selection(Selection::collapsed(1));
        });
        assert!(doc.has_selection_attribute("bold"));

        doc.change(|w| w.set_selection(Selection::collapsed(0)));
        // Nothing before the caret: take the char after it.
        assert!(doc.has_selection_attribute("bold"));

        doc.change(|w| w.set_selection(Selection::collapsed(2)));
        assert!(!doc.has_selection_attribute("bold"));
    }

    #[test]
    fn test_selection_attributes_stop_at_paragraph_break() {
        let mut doc = Document::from_text("ab\ncd");
        doc.change(|w| {
            w.set_attribute("bold", AttributeValue::Flag, Range::new(0, 2));
            w.set_selection(Selection::collapsed(3));
        });
        // Char before the caret is the break; char after is plain "c".
        assert!(!doc.has_selection_attribute("bold"));
    }

    #[test]
    fn test_inserted_paragraph_breaks_carry_no_attributes() {
        let mut doc = Document::from_text("xy");
        let title = Attributes::new().with("footnotes", AttributeValue::text("t"));
        let inserted = doc.change(|w| w.insert_content("a\nb", title.clone(), Range::caret(1)));

        assert_eq!(inserted, Range::new(1, 4));
        assert_eq!(doc.content_string(), "xa\nby");
        assert_eq!(doc.attributes_at(1), Some(&title));
        assert_eq!(doc.attributes_at(2), Some(&Attributes::new()));
        assert_eq!(doc.attributes_at(3), Some(&title));
        assert_eq!(doc.runs().runs().len(), 5);
    }

    #[test]
    fn test_expanded_selection_uses_first_char() {
        let mut doc = Document::from_text("abcdef");
        doc.change(|w| {
            w.set_attribute("footnotes", AttributeValue::text("x"), Range::new(2, 6));
            w.set_selection(Selection::new(5, 2));
        });
        assert_eq!(
            doc.selection_attribute("footnotes"),
            Some(AttributeValue::text("x"))
        );
    }

    #[test]
    fn test_stored_selection_attributes() {
        let mut doc = Document::from_text("note");
        doc.change(|w| {
            w.set_attribute("footnotes", AttributeValue::text("x"), Range::new(0, 4));
            w.set_selection(Selection::collapsed(4));
            w.remove_selection_attribute("footnotes");
        });
        assert!(!doc.has_selection_attribute("footnotes"));

        // Moving the selection drops the override.
        doc.change(|w| w.set_selection(Selection::collapsed(4)));
        assert!(doc.has_selection_attribute("footnotes"));

        doc.change(|w| w.set_selection_attribute("bold", AttributeValue::Flag));
        let attrs = doc.selection_attributes();
        assert!(attrs.contains("bold"));
        assert!(attrs.contains("footnotes"));
    }

    #[test]
    fn test_tree_equality_ignores_selection() {
        let a = Document::from_text("same");
        let mut b = Document::from_text("same");
        b.change(|w| w.set_selection(Selection::collapsed(2)));
        assert_eq!(a, b);

        b.change(|w| w.set_attribute("bold", AttributeValue::Flag, Range::new(0, 1)));
        assert_ne!(a, b);
    }
}
