//! Trigger detection.
//!
//! Decides whether a just-typed character opens a mention session. The
//! host has already applied the character to the content, so the
//! delimiter sits at `caret - 1` when it fires.

use crate::editor::HostEditor;

/// Returns the trigger offset for a session to open at, if the typed
/// character should start one.
///
/// A session starts when the typed character equals the delimiter and the
/// delimiter stands at the start of the document or after whitespace.
/// A delimiter typed mid-word (`foo@`) is ordinary text.
#[must_use]
pub fn detect<E: HostEditor + ?Sized>(editor: &E, delimiter: char, typed: char) -> Option<usize> {
    if typed != delimiter {
        return None;
    }

    let caret = editor.caret();
    if caret == 0 {
        return None;
    }
    let offset = caret - 1;

    // The host applied the keystroke before notifying us; trust but verify.
    if editor.char_at(offset) != Some(delimiter) {
        return None;
    }

    match offset.checked_sub(1).and_then(|prev| editor.char_at(prev)) {
        None => Some(offset),
        Some(prev) if prev.is_whitespace() => Some(offset),
        Some(_) => None,
    }
}
