//! Editor actions.
//!
//! Platform-agnostic definitions of the edits a host can request. The
//! `EditorAction` enum represents semantic editing operations, decoupled from
//! how they're triggered (keyboard, toolbar, dialog submit).

use smol_str::SmolStr;

use crate::command::FootnotePayload;
use crate::types::Range;

/// All possible editor actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Insert typed text at the given range (replacing any selected content).
    ///
    /// The text takes the selection's typing attributes.
    Insert { text: SmolStr, range: Range },

    /// Delete content backward (Backspace).
    DeleteBackward { range: Range },

    /// Delete content forward (Delete key).
    DeleteForward { range: Range },

    /// Submit the footnote dialog.
    InsertFootnote(FootnotePayload),

    /// Insert the empty `[Fn][/Fn]` pair.
    InsertFootnotePlaceholder,

    /// Pick an entry from the signature dropdown.
    InsertSignature(SmolStr),

    /// Pick an entry from the newsletter form dropdown.
    InsertNewsletterForm(SmolStr),

    /// Select all content.
    SelectAll,

    /// Move cursor to position.
    MoveCursor { offset: usize },

    /// Extend selection to position.
    ExtendSelection { offset: usize },
}
