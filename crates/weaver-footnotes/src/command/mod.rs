//! The footnote command: current footnote state and the edits that change it.
//!
//! `refresh` derives [`FootnoteCommand::value`] and [`FootnoteCommand::is_enabled`]
//! from the document selection. `execute` is the only way footnotes get
//! written. Callers refresh after every selection change or document change
//! and before executing, so `execute` can trust `value`.

use smol_str::SmolStr;

use crate::attributes::{AttributeValue, Attributes};
use crate::document::Document;
use crate::resolver::find_attribute_range;
use crate::schema::Schema;
use crate::text::TextBuffer;
use crate::types::{PARAGRAPH_BREAK, Range, Selection};


/// Default model attribute key for footnotes.
pub const FOOTNOTE_KEY: &str = "footnotes";

/// Zero-width joiner placed after a new footnote so the caret has an
/// unannotated spot to land on.
pub const FOOTNOTE_MARKER: char = '\u{200D}';

/// What the user submits: footnote text and its title (source).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FootnotePayload {
    pub text: SmolStr,
    pub title: SmolStr,
}

impl FootnotePayload {
    pub fn new(text: impl Into<SmolStr>, title: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
        }
    }
}

/// The footnote under the selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FootnoteValue {
    /// Text covered by `range`.
    pub text: SmolStr,
    /// Footnote title (attribute payload).
    pub title: SmolStr,
    /// Whole footnote for a caret, the selection itself for a range.
    pub range: Range,
}

#[derive(Clone, Debug)]
pub struct FootnoteCommand {
    key: SmolStr,
    marker: char,
    value: Option<FootnoteValue>,
    is_enabled: bool,
}

impl Default for FootnoteCommand {
    fn default() -> Self {
        Self::new(FOOTNOTE_KEY, FOOTNOTE_MARKER)
    }
}

impl FootnoteCommand {
    pub fn new(key: impl Into<SmolStr>, marker: char) -> Self {
        Self {
            key: key.into(),
            marker,
            value: None,
            is_enabled: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&FootnoteValue> {
        self.value.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Recompute `value` and `is_enabled` from the selection.
    pub fn refresh<T: TextBuffer>(&mut self, doc: &Document<T>, schema: &Schema) {
        self.value = self.current_value(doc);
        self.is_enabled = schema.check_attribute_in_selection(doc, &self.key);
        tracing::trace!(
            target: "weaver::footnotes",
            enabled = self.is_enabled,
            value = ?self.value,
            "footnote command refreshed"
        );
    }

    fn current_value<T: TextBuffer>(&self, doc: &Document<T>) -> Option<FootnoteValue> {
        let selection = doc.selection();
        let title = doc.selection_attributes().get_text(&self.key)?.clone();
        let attribute = AttributeValue::Text(title.clone());
        let footnote = find_attribute_range(doc, selection.first_position(), &self.key, &attribute);

        // A caret anywhere inside a footnote stands for the whole footnote.
        if selection.is_collapsed() {
            return Some(FootnoteValue {
                text: doc.text(footnote),
                title,
                range: footnote,
            });
        }

        // A range only counts when it stays inside one footnote, and then it
        // stands for exactly what is selected.
        let selected = selection.first_range();
        footnote.contains_range(&selected, true).then(|| FootnoteValue {
            text: doc.text(selected),
            title,
            range: selected,
        })
    }

    /// Apply `payload` to the document.
    ///
    /// - Caret inside a footnote: replace the whole footnote with
    ///   `payload.text` titled `payload.title`.
    /// - Caret elsewhere: insert a new footnote, keeping the other typing
    ///   attributes, followed by the zero-width marker. Empty text is a no-op.
    ///
    /// Paragraph breaks in `payload.text` become spaces in both caret cases.
    /// - Range: set the title on every part of the range that allows it.
    ///
    /// In every case the footnote key is removed from the typing attributes
    /// so further typing does not extend the footnote. Returns whether the
    /// document text or attributes changed.
    pub fn execute<T: TextBuffer>(
        &mut self,
        doc: &mut Document<T>,
        schema: &Schema,
        payload: &FootnotePayload,
    ) -> bool {
        let key = self.key.clone();
        let title = AttributeValue::Text(payload.title.clone());
        // A footnote lives inside one paragraph.
        let text = payload.text.replace(PARAGRAPH_BREAK, " ");
        let collapsed = doc.selection().is_collapsed();
        let value = self.value.clone();
        let marker = self.marker;

        let changed = doc.change(|w| {
            let changed = if collapsed {
                match value {
                    Some(value) => {
                        tracing::debug!(
                            target: "weaver::footnotes",
                            range = ?value.range,
                            "replacing footnote under caret"
                        );
                        let attrs = Attributes::new().with(key.clone(), title);
                        let inserted = w.insert_content(&text, attrs, value.range);
                        w.set_selection(Selection::collapsed(inserted.end));
                        true
                    }
                    None if !text.is_empty() => {
                        let position = w.document().selection().first_position();
                        let mut attrs = w.document().selection_attributes();
                        let plain = attrs.without(&key);
                        attrs.insert(key.clone(), title);
                        tracing::debug!(
                            target: "weaver::footnotes",
                            position,
                            "inserting footnote at caret"
                        );
                        let inserted =
                            w.insert_content(&text, attrs, Range::caret(position));
                        let mut buf = [0u8; 4];
                        let landing = w.insert_content(
                            marker.encode_utf8(&mut buf),
                            plain,
                            Range::caret(inserted.end),
                        );
                        w.set_selection(Selection::collapsed(landing.end));
                        true
                    }
                    None => false,
                }
            } else {
                let selected = w.document().selection().first_range();
                let ranges = schema.valid_ranges(w.document(), [selected], &key);
                tracing::debug!(
                    target: "weaver::footnotes",
                    ranges = ranges.len(),
                    "setting footnote on selection"
                );
                for range in &ranges {
                    w.set_attribute(&key, title.clone(), *range);
                }
                !ranges.is_empty()
            };
            w.remove_selection_attribute(&key);
            changed
        });

        self.refresh(doc, schema);
        changed
    }
}
