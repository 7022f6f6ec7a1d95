//! Mention session state.
//!
//! A session spans one autocomplete interaction: from the delimiter
//! keystroke to commit, cancel, or close. At most one session is open at a
//! time; the engine enforces that.

use unicode_segmentation::UnicodeSegmentation;

use crate::editor::HostEditor;

/// Result of re-reading the query from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    /// The session is still live with this query text.
    Live(String),

    /// The tracked region no longer holds a query (delimiter deleted,
    /// caret left the region, or the text stopped looking like a
    /// mention); the session must close.
    Terminated,
}

/// One open autocomplete interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Char offset of the delimiter in the document.
    trigger_offset: usize,

    /// Query text typed since the delimiter.
    query: String,

    /// Generation stamp of the most recent lookup issued for this
    /// session. Lookup results carrying an older stamp are stale.
    generation: u64,
}

impl Session {
    /// Opens a session anchored at the delimiter's char offset.
    #[must_use]
    pub fn new(trigger_offset: usize, generation: u64) -> Self {
        Self {
            trigger_offset,
            query: String::new(),
            generation,
        }
    }

    /// Returns the delimiter's char offset.
    #[must_use]
    pub const fn trigger_offset(&self) -> usize {
        self.trigger_offset
    }

    /// Returns the current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the generation stamp of the pending lookup.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a new query and its lookup generation.
    pub fn set_query(&mut self, query: String, generation: u64) {
        self.query = query;
        self.generation = generation;
    }

    /// Returns whether a lookup stamped `generation` is the one this
    /// session is waiting for.
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Re-reads the query from the document: the literal text between the
    /// delimiter and the caret.
    ///
    /// Terminates when the caret sits at or before the delimiter, the
    /// delimiter itself is gone, or the region text stopped being a
    /// plausible mention query.
    #[must_use]
    pub fn extract_query<E: HostEditor + ?Sized>(&self, editor: &E, delimiter: char) -> QueryStatus {
        let caret = editor.caret();
        if caret <= self.trigger_offset {
            return QueryStatus::Terminated;
        }
        if editor.char_at(self.trigger_offset) != Some(delimiter) {
            return QueryStatus::Terminated;
        }

        let query = editor.slice(self.trigger_offset + 1..caret);
        if is_plausible_query(&query) {
            QueryStatus::Live(query)
        } else {
            QueryStatus::Terminated
        }
    }
}

/// Returns whether `query` still reads as mention text.
///
/// A query never starts with whitespace (typing a space right after the
/// delimiter abandons the mention) and never spans lines. Interior spaces
/// are fine: display names have them.
fn is_plausible_query(query: &str) -> bool {
    let mut graphemes = query.graphemes(true);

    match graphemes.next() {
        None => true,
        Some(first) if first.trim().is_empty() => false,
        Some(first) if first.contains('\n') || first.contains('\r') => false,
        Some(_) => !graphemes.any(|g| g.contains('\n') || g.contains('\r')),
    }
}
