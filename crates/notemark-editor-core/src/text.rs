//! Text storage for the note being annotated.
//!
//! The session mirrors the surface text in a [`TextBuffer`] so mention
//! acceptance can splice a replacement in without re-reading the host.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// A text buffer addressed by char offsets.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset. Offsets past the end clamp to the end.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range. The range is clamped to the buffer.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Replace everything.
    fn set_text(&mut self, text: &str) {
        self.replace(0..self.len_chars(), text);
    }

    /// Get a slice. Returns None if the range is out of bounds.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Character at offset, None past the end.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    fn to_string(&self) -> String;
}

/// Ropey-backed text buffer.
#[derive(Debug, Clone, Default)]
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

    /// The underlying rope.
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }

    fn clamp(&self, char_range: Range<usize>) -> Range<usize> {
        let len = self.rope.len_chars();
        let end = char_range.end.min(len);
        char_range.start.min(end)..end
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        let at = char_offset.min(self.rope.len_chars());
        self.rope.insert(at, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let range = self.clamp(char_range);
        if !range.is_empty() {
            self.rope.remove(range);
        }
    }

    fn set_text(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
