//! Commit handling.
//!
//! Committing a candidate replaces the delimiter-plus-query span with the
//! candidate's payload and a trailing separator in one `replace_range`
//! call, then restores focus. Cancel paths never reach this module: a
//! cancelled session simply closes without touching the document.

use tracing::debug;

use crate::directory::Candidate;
use crate::editor::HostEditor;

use super::session::Session;

/// Replaces the session's tracked span with the candidate payload plus
/// separator, as a single atomic mutation, and restores editor focus.
pub fn apply<E: HostEditor + ?Sized>(
    editor: &mut E,
    session: &Session,
    candidate: &Candidate,
    separator: &str,
) {
    let start = session.trigger_offset();
    let end = editor.caret().max(start);
    let replacement = format!("{}{}", candidate.insert, separator);

    debug!(label = %candidate.label, start, end, "committing mention");

    editor.replace_range(start..end, &replacement);
    editor.focus();
}
