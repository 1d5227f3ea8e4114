//! Footnote editor: wires config, schema, conversion, command and document.

use crate::actions::EditorAction;
use crate::command::{FootnoteCommand, FootnotePayload};
use crate::config::EditorConfig;
use crate::conversion::{Conversion, FlagElementConverter, FootnoteConverter};
use crate::document::Document;
use crate::error::ConversionError;
use crate::execute::execute_action;
use crate::schema::Schema;
use crate::template::{FOOTNOTE_PLACEHOLDER, NEWSLETTER_FORM, SIGNATURE, TemplateCommand};
use crate::types::Selection;

pub const BOLD_KEY: &str = "bold";
pub const ITALIC_KEY: &str = "italic";
pub const CODE_KEY: &str = "code";

/// Editor state with the footnote feature installed.
///
/// Every selection change and every mutation goes through this type, and
/// each one ends with a command refresh.
#[derive(Debug)]
pub struct FootnoteEditor {
    config: EditorConfig,
    schema: Schema,
    conversion: Conversion,
    command: FootnoteCommand,
    placeholder: TemplateCommand,
    signatures: TemplateCommand,
    newsletter_forms: TemplateCommand,
    document: Document,
}

impl Default for FootnoteEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FootnoteEditor {
    pub fn new(config: EditorConfig) -> Self {
        let key = config.attribute_key.clone();

        let mut schema = Schema::new();
        schema
            .allow_text_attribute(key.clone())
            .allow_text_attribute(BOLD_KEY)
            .allow_text_attribute(ITALIC_KEY)
            .allow_text_attribute(CODE_KEY)
            .disallow_attribute_with(key.clone(), CODE_KEY)
            .allow_inline(FOOTNOTE_PLACEHOLDER)
            .allow_inline(SIGNATURE)
            .allow_inline(NEWSLETTER_FORM);

        let mut conversion = Conversion::new();
        conversion
            .add(FootnoteConverter::new(
                key.clone(),
                config.element.clone(),
                config.class.clone(),
            ))
            .add(FlagElementConverter::new(BOLD_KEY, "strong").alias("b"))
            .add(FlagElementConverter::new(ITALIC_KEY, "i").alias("em"))
            .add(FlagElementConverter::new(CODE_KEY, "code"));

        let command = FootnoteCommand::new(key, config.marker);
        let placeholder = TemplateCommand::footnote_placeholder();
        let signatures = TemplateCommand::signature(config.signature_types.clone());
        let newsletter_forms = TemplateCommand::newsletter_form(config.newsletter_form_types.clone());

        let mut editor = Self {
            config,
            schema,
            conversion,
            command,
            placeholder,
            signatures,
            newsletter_forms,
            document: Document::default(),
        };
        editor.refresh();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    pub fn command(&self) -> &FootnoteCommand {
        &self.command
    }

    pub fn signature_command(&self) -> &TemplateCommand {
        &self.signatures
    }

    pub fn newsletter_form_command(&self) -> &TemplateCommand {
        &self.newsletter_forms
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn set_selection(&mut self, selection: impl Into<Selection>) {
        let selection = selection.into();
        self.document.change(|w| w.set_selection(selection));
        self.refresh();
    }

    /// Apply an editor action. Returns whether it was handled.
    pub fn apply(&mut self, action: &EditorAction) -> bool {
        let handled = match action {
            EditorAction::InsertFootnote(payload) => {
                return self.insert_footnote(payload);
            }
            EditorAction::InsertFootnotePlaceholder => {
                self.placeholder.execute(&mut self.document, "")
            }
            EditorAction::InsertSignature(value) => self.signatures.execute(&mut self.document, value),
            EditorAction::InsertNewsletterForm(value) => {
                self.newsletter_forms.execute(&mut self.document, value)
            }
            other => execute_action(&mut self.document, other),
        };
        self.refresh();
        handled
    }

    /// Submit the footnote dialog.
    pub fn insert_footnote(&mut self, payload: &FootnotePayload) -> bool {
        self.refresh();
        self.command
            .execute(&mut self.document, &self.schema, payload)
    }

    /// Insert the empty `[Fn][/Fn]` pair at the caret, replacing any selection.
    pub fn insert_placeholder(&mut self) -> bool {
        self.apply(&EditorAction::InsertFootnotePlaceholder)
    }

    /// Insert `<value>` at the caret.
    pub fn insert_signature(&mut self, value: &str) -> bool {
        self.apply(&EditorAction::InsertSignature(value.into()))
    }

    /// Insert `({[value]})` at the caret.
    pub fn insert_newsletter_form(&mut self, value: &str) -> bool {
        self.apply(&EditorAction::InsertNewsletterForm(value.into()))
    }

    /// Serialize the document to view markup.
    pub fn get_data(&self) -> Result<String, ConversionError> {
        Ok(self.conversion.to_view(&self.document)?)
    }

    /// Replace the document with parsed view markup. The caret lands at the
    /// start. On error the current document is kept.
    pub fn set_data(&mut self, markup: &str) -> Result<(), ConversionError> {
        self.document = self.conversion.to_model(markup)?;
        tracing::debug!(
            target: "weaver::footnotes",
            len = self.document.len_chars(),
            "editor data replaced"
        );
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.command.refresh(&self.document, &self.schema);
        self.placeholder.refresh(&self.document, &self.schema);
        self.signatures.refresh(&self.document, &self.schema);
        self.newsletter_forms.refresh(&self.document, &self.schema);
    }
}
