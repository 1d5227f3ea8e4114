//! weaver-footnotes: inline footnote annotations for the weaver editor.
//!
//! This crate provides:
//! - `TextBuffer` trait and the ropey-backed `EditorRope`
//! - `Document<T>` - attributed text with runs, selection and transactions
//! - `find_attribute_range` - the extent of an attribute run around a position
//! - `FootnoteCommand` - footnote state under the selection and the edits
//!   that change it
//! - `Conversion` - model attributes to `<fn>` view markup and back
//! - `TemplateCommand` - signature, newsletter form and `[Fn][/Fn]` tokens
//! - `FootnoteEditor` - everything above wired together

pub mod actions;
pub mod attributes;
pub mod command;
pub mod config;
pub mod conversion;
pub mod document;
pub mod editor;
pub mod error;
pub mod execute;
pub mod resolver;
pub mod runs;
pub mod schema;
pub mod template;
pub mod text;
pub mod types;

pub use actions::EditorAction;
pub use attributes::{AttributeValue, Attributes};
pub use command::{
    FOOTNOTE_KEY, FOOTNOTE_MARKER, FootnoteCommand, FootnotePayload, FootnoteValue,
};
pub use config::EditorConfig;
pub use conversion::{
    AttributeConverter, Conversion, FlagElementConverter, FootnoteConverter, ViewElement,
    ViewWriter,
};
pub use document::{Document, DocumentSelection, Writer};
pub use editor::FootnoteEditor;
pub use error::{ConfigError, ConversionError};
pub use execute::execute_action;
pub use resolver::find_attribute_range;
pub use runs::{RunList, TextRun};
pub use schema::Schema;
pub use smol_str::SmolStr;
pub use template::TemplateCommand;
pub use text::{EditorRope, TextBuffer};
pub use types::{PARAGRAPH_BREAK, Range, Selection};
