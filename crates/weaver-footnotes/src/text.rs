//! Character storage behind a [`Document`](crate::Document).
//!
//! Only the characters live here. Footnote titles and other attributes are
//! tracked by the [`RunList`](crate::runs::RunList) over the same offsets.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// Char-addressed text storage.
///
/// Offsets count chars, so a zero-width marker is one position like any
/// other letter regardless of its UTF-8 width.
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn insert(&mut self, char_offset: usize, text: &str);

    fn delete(&mut self, char_range: Range<usize>);

    /// Text in `char_range`, or `None` if it runs past the end.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    fn char_at(&self, char_offset: usize) -> Option<char>;

    fn to_string(&self) -> String;
}

/// [`TextBuffer`] on a ropey rope.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        (char_offset < self.len_chars()).then(|| self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete_by_char() {
        let mut rope = EditorRope::from_str("Hello world");
        rope.insert(5, "note");
        assert_eq!(rope.to_string(), "Hellonote world");

        rope.delete(5..9);
        assert_eq!(rope.to_string(), "Hello world");
        assert!(!rope.is_empty());
    }

    #[test]
    fn test_char_at_bounds() {
        let rope = EditorRope::from_str("fn");
        assert_eq!(rope.char_at(1), Some('n'));
        assert_eq!(rope.char_at(2), None);
    }

    #[test]
    fn test_slice_rejects_out_of_range() {
        let rope = EditorRope::from_str("a\nb");
        assert_eq!(rope.slice(0..3).as_deref(), Some("a\nb"));
        assert_eq!(rope.slice(2..4), None);
    }

    #[test]
    fn test_marker_is_one_position() {
        let rope = EditorRope::from_str("note\u{200D}!");
        assert_eq!(rope.len_chars(), 6);
        assert_eq!(rope.char_at(4), Some('\u{200D}'));
        assert_eq!(rope.slice(5..6).as_deref(), Some("!"));
    }
}
