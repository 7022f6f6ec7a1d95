//! Host editor abstraction.
//!
//! The mention engine never owns the document. It reads content and caret
//! state through [`HostEditor`] and performs exactly one mutating call per
//! commit, so the host's change listeners observe a single atomic edit.
//!
//! Offsets are character offsets into the document. Hosts whose native
//! addressing is byte- or grapheme-based are expected to convert at the
//! boundary.

mod buffer;

use std::ops::Range;

pub use buffer::BufferEditor;

/// A key event as delivered by the host editor.
///
/// Only the keys the engine reacts to are distinguished; everything else
/// maps to [`Key::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character, delivered after the host applied it to the
    /// content.
    Char(char),
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace, delivered after the host applied the deletion.
    Backspace,
    /// Arrow up (list navigation).
    ArrowUp,
    /// Arrow down (list navigation).
    ArrowDown,
    /// Arrow left (caret movement).
    ArrowLeft,
    /// Arrow right (caret movement).
    ArrowRight,
    /// Home (caret movement).
    Home,
    /// End (caret movement).
    End,
    /// Any other key.
    Other,
}

impl Key {
    /// Returns whether this key moves the caret without navigating the
    /// popup list.
    #[must_use]
    pub const fn moves_caret(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft | Self::ArrowRight | Self::Home | Self::End
        )
    }
}

/// Read/write access to the host editor's document.
///
/// `replace_range` is the single mutation funnel: the engine calls it once
/// per commit and never otherwise.
pub trait HostEditor {
    /// Returns the full document content.
    fn content(&self) -> String;

    /// Returns the caret position as a char offset.
    fn caret(&self) -> usize;

    /// Returns the character immediately before `offset`, if any.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Replaces the char range with `text` as one atomic edit and places
    /// the caret after the inserted text.
    fn replace_range(&mut self, range: Range<usize>, text: &str);

    /// Moves the caret to the given char offset.
    fn set_caret(&mut self, offset: usize);

    /// Restores input focus to the editor.
    fn focus(&mut self);

    /// Returns the char-offset slice of the document.
    fn slice(&self, range: Range<usize>) -> String {
        self.content()
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect()
    }

    /// Returns the document length in chars.
    fn len_chars(&self) -> usize {
        self.content().chars().count()
    }
}
