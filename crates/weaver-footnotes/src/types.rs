//! Core position types: ranges and selections.
//!
//! All offsets are character offsets into the document text (NOT byte offsets!).

use std::ops::Range as StdRange;

/// Paragraph boundary inside the flat document text.
///
/// A paragraph break is never part of an attribute run for the purpose of
/// range walks, and attributes are never valid on it.
pub const PARAGRAPH_BREAK: char = '\n';

/// A range in the document, measured in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }.normalize()
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Check whether `other` lies within this range.
    ///
    /// With `loose` set, touching boundaries count as contained, so a range
    /// contains itself and any caret on its edges.
    pub fn contains_range(&self, other: &Range, loose: bool) -> bool {
        if loose {
            self.start <= other.start && other.end <= self.end
        } else {
            self.start < other.start && other.end < self.end
        }
    }

    /// Overlap of two ranges, if they share at least one character.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Range { start, end })
    }
}

impl From<StdRange<usize>> for Range {
    fn from(r: StdRange<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Range> for StdRange<usize> {
    fn from(r: Range) -> Self {
        r.start..r.end
    }
}

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the selection length.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if empty (same as is_collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// The ordered range covered by this selection.
    pub fn range(&self) -> Range {
        Range {
            start: self.start(),
            end: self.end(),
        }
    }

    /// Check if the selection is backwards (head before anchor).
    pub fn is_backwards(&self) -> bool {
        self.head < self.anchor
    }

    /// Apply `f` to both ends, keeping direction.
    pub(crate) fn map(self, f: impl Fn(usize) -> usize) -> Self {
        Self {
            anchor: f(self.anchor),
            head: f(self.head),
        }
    }
}

impl From<Range> for Selection {
    fn from(r: Range) -> Self {
        Self::new(r.start, r.end)
    }
}
