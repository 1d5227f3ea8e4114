//! Action execution for documents.
//!
//! This module provides the `execute_action` function that applies plain
//! `EditorAction` edits to a [`Document`]. Footnote and template insertions
//! need command state and are routed by [`FootnoteEditor`](crate::FootnoteEditor).

use crate::actions::EditorAction;
use crate::document::Document;
use crate::text::TextBuffer;
use crate::types::{Range, Selection};

/// Execute an editor action on a document.
///
/// Returns true if the action was handled. Command-backed actions
/// (footnotes and templates) are not handled here and return false.
pub fn execute_action<T: TextBuffer>(doc: &mut Document<T>, action: &EditorAction) -> bool {
    match action {
        EditorAction::Insert { text, range } => execute_insert(doc, text, *range),
        EditorAction::DeleteBackward { range } => execute_delete_backward(doc, *range),
        EditorAction::DeleteForward { range } => execute_delete_forward(doc, *range),
        EditorAction::SelectAll => execute_select_all(doc),
        EditorAction::MoveCursor { offset } => execute_move_cursor(doc, *offset),
        EditorAction::ExtendSelection { offset } => execute_extend_selection(doc, *offset),
        EditorAction::InsertFootnote(_)
        | EditorAction::InsertFootnotePlaceholder
        | EditorAction::InsertSignature(_)
        | EditorAction::InsertNewsletterForm(_) => false,
    }
}

fn execute_insert<T: TextBuffer>(doc: &mut Document<T>, text: &str, range: Range) -> bool {
    let range = range.normalize();
    // Typing attributes are read before the selected content goes away.
    let attrs = doc.selection_attributes();
    doc.change(|w| {
        let inserted = w.insert_content(text, attrs, range);
        w.set_selection(Selection::collapsed(inserted.end));
    });
    true
}

fn execute_delete_backward<T: TextBuffer>(doc: &mut Document<T>, range: Range) -> bool {
    let range = range.normalize();

    if !range.is_caret() {
        return delete(doc, range);
    }
    if range.start == 0 {
        return false;
    }
    delete(doc, Range::new(range.start - 1, range.start))
}

fn execute_delete_forward<T: TextBuffer>(doc: &mut Document<T>, range: Range) -> bool {
    let range = range.normalize();

    if !range.is_caret() {
        return delete(doc, range);
    }
    if range.start >= doc.len_chars() {
        return false;
    }
    delete(doc, Range::new(range.start, range.start + 1))
}

fn delete<T: TextBuffer>(doc: &mut Document<T>, range: Range) -> bool {
    doc.change(|w| {
        w.delete(range);
        w.set_selection(Selection::collapsed(range.start));
    });
    true
}

fn execute_select_all<T: TextBuffer>(doc: &mut Document<T>) -> bool {
    let len = doc.len_chars();
    doc.change(|w| w.set_selection(Selection::new(0, len)));
    true
}

fn execute_move_cursor<T: TextBuffer>(doc: &mut Document<T>, offset: usize) -> bool {
    let offset = offset.min(doc.len_chars());
    doc.change(|w| w.set_selection(Selection::collapsed(offset)));
    true
}

fn execute_extend_selection<T: TextBuffer>(doc: &mut Document<T>, offset: usize) -> bool {
    let offset = offset.min(doc.len_chars());
    let anchor = doc.selection().selection().anchor;
    doc.change(|w| w.set_selection(Selection::new(anchor, offset)));
    true
}
