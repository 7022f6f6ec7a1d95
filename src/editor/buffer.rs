//! Reference host editor backed by a ropey text buffer.
//!
//! Used by the test suite and by embedders that want a headless document
//! model. Tracks a revision counter so tests can assert how many discrete
//! mutations the engine performed.

use std::ops::Range;

use ropey::Rope;

use super::HostEditor;

/// In-memory host editor with a char-offset caret.
#[derive(Debug)]
pub struct BufferEditor {
    /// The rope holding the text.
    rope: Rope,
    /// Caret position as a char offset.
    caret: usize,
    /// Incremented once per mutating call.
    revision: u64,
    /// Whether the editor currently has input focus.
    focused: bool,
}

impl BufferEditor {
    /// Creates a new empty editor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            caret: 0,
            revision: 0,
            focused: true,
        }
    }

    /// Creates an editor from initial text, caret at the end.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let caret = rope.len_chars();
        Self {
            rope,
            caret,
            revision: 0,
            focused: true,
        }
    }

    /// Inserts a character at the caret.
    pub fn insert_char(&mut self, ch: char) {
        self.rope.insert_char(self.caret, ch);
        self.caret += 1;
        self.revision += 1;
    }

    /// Inserts a string at the caret.
    pub fn insert_str(&mut self, text: &str) {
        self.rope.insert(self.caret, text);
        self.caret += text.chars().count();
        self.revision += 1;
    }

    /// Deletes the character before the caret, if any.
    pub fn delete_backward(&mut self) {
        if self.caret == 0 {
            return;
        }
        self.rope.remove(self.caret - 1..self.caret);
        self.caret -= 1;
        self.revision += 1;
    }

    /// Returns the number of mutations applied so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns whether the editor has input focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Takes focus away, as an external click would.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }
}

impl Default for BufferEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEditor for BufferEditor {
    fn content(&self) -> String {
        self.rope.to_string()
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.rope.len_chars()).then(|| self.rope.char(offset))
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.caret = start + text.chars().count();
        self.revision += 1;
    }

    fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.rope.len_chars());
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }
}
