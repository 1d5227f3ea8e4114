//! Toolbar commands that drop a bracketed template token at the caret.
//!
//! Signatures insert `<value>`, newsletter forms insert `({[value]})` and
//! the footnote button inserts the empty `[Fn][/Fn]` pair. The value comes
//! from a configured list of types offered in a dropdown.

use smol_str::SmolStr;

use crate::attributes::Attributes;
use crate::document::Document;
use crate::schema::Schema;
use crate::text::TextBuffer;
use crate::types::Selection;

pub const SIGNATURE: &str = "signature";
pub const NEWSLETTER_FORM: &str = "newsletterform";
pub const FOOTNOTE_PLACEHOLDER: &str = "footnoteplaceholder";

/// Types offered when none are configured.
pub fn default_types() -> Vec<SmolStr> {
    vec!["date".into(), "first name".into(), "surname".into()]
}

#[derive(Clone, Debug)]
pub struct TemplateCommand {
    name: SmolStr,
    open: SmolStr,
    close: SmolStr,
    types: Vec<SmolStr>,
    is_enabled: bool,
}

impl TemplateCommand {
    pub fn new(
        name: impl Into<SmolStr>,
        open: impl Into<SmolStr>,
        close: impl Into<SmolStr>,
        types: Vec<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            open: open.into(),
            close: close.into(),
            types,
            is_enabled: false,
        }
    }

    /// `<value>`
    pub fn signature(types: Vec<SmolStr>) -> Self {
        Self::new(SIGNATURE, "<", ">", types)
    }

    /// `({[value]})`
    pub fn newsletter_form(types: Vec<SmolStr>) -> Self {
        Self::new(NEWSLETTER_FORM, "({[", "]})", types)
    }

    /// `[Fn][/Fn]`, executed with an empty value.
    pub fn footnote_placeholder() -> Self {
        Self::new(FOOTNOTE_PLACEHOLDER, "[Fn]", "[/Fn]", Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dropdown entries.
    pub fn types(&self) -> &[SmolStr] {
        &self.types
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn format(&self, value: &str) -> String {
        format!("{}{}{}", self.open, value, self.close)
    }

    pub fn refresh<T: TextBuffer>(&mut self, doc: &Document<T>, schema: &Schema) {
        self.is_enabled = schema.check_child(&self.name);
        tracing::trace!(
            target: "weaver::footnotes",
            command = %self.name,
            enabled = self.is_enabled,
            caret = doc.selection().first_position(),
            "template command refreshed"
        );
    }

    /// Insert the token for `value` in place of the selection, as plain text,
    /// and put the caret after it. Returns false while disabled.
    pub fn execute<T: TextBuffer>(&mut self, doc: &mut Document<T>, value: &str) -> bool {
        if !self.is_enabled {
            return false;
        }
        let token = self.format(value);
        tracing::debug!(
            target: "weaver::footnotes",
            command = %self.name,
            %token,
            "inserting template"
        );
        doc.change(|w| {
            let target = w.document().selection().first_range();
            let inserted = w.insert_content(&token, Attributes::new(), target);
            w.set_selection(Selection::collapsed(inserted.end));
        });
        true
    }
}
