//! Directory lookup: the candidate-fetching side of the engine.
//!
//! [`DirectorySource`] is the only contract the engine depends on; transport
//! details (HTTP, IPC, in-process) stay behind it. Two sources are bundled:
//! an in-memory roster and an HTTP JSON source.
//!
//! Filtering belongs to the source ("which entries match this query"); the
//! page-size cap belongs to the engine and is applied to whatever a source
//! returns.

pub mod cache;
pub mod debounce;
mod http;
mod roster;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::{CacheKey, LookupCache};
pub use debounce::LookupDebounce;
pub use http::HttpSource;
pub use roster::{RosterEntry, RosterSource};

/// Directory lookup error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The transport failed (connection, I/O, HTTP status).
    #[error("Directory transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("Directory response decode error: {0}")]
    Decode(String),

    /// The lookup exceeded the configured timeout.
    #[error("Directory lookup timed out")]
    Timeout,
}

/// One selectable mention entry.
///
/// Immutable once fetched; the insertion payload defaults to the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display label shown in the popup list.
    pub label: String,

    /// Text inserted into the document on commit.
    pub insert: String,
}

impl Candidate {
    /// Creates a candidate whose payload equals its label.
    ///
    /// # Panics
    /// Panics if `label` is empty.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        assert!(!label.is_empty(), "candidate label must not be empty");

        let insert = label.clone();
        Self { label, insert }
    }

    /// Overrides the insertion payload.
    ///
    /// # Panics
    /// Panics if `insert` is empty.
    #[must_use]
    pub fn with_insert(mut self, insert: impl Into<String>) -> Self {
        let insert = insert.into();
        assert!(!insert.is_empty(), "candidate payload must not be empty");

        self.insert = insert;
        self
    }
}

/// Type alias for a boxed async lookup future.
pub type LookupFuture =
    Pin<Box<dyn Future<Output = Result<Vec<Candidate>, DirectoryError>> + Send + 'static>>;

/// Trait for directory sources.
///
/// Implementations resolve a query string to the matching candidates:
/// an in-memory roster, a user-directory HTTP endpoint, an IPC bridge, or
/// anything else that can answer "who matches this text".
///
/// An empty query is valid and means "the unfiltered directory"; sources
/// may return more entries than the engine will render.
pub trait DirectorySource: Send + Sync {
    /// Returns the unique identifier for this source, used for cache
    /// partitioning and log lines.
    fn id(&self) -> &str;

    /// Resolves `query` to its matching candidates.
    fn lookup(&self, query: &str) -> LookupFuture;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_payload_defaults_to_label() {
        let candidate = Candidate::new("Ada Lovelace");
        assert_eq!(candidate.label, "Ada Lovelace");
        assert_eq!(candidate.insert, "Ada Lovelace");
    }

    #[test]
    fn test_candidate_with_insert() {
        let candidate = Candidate::new("Ada Lovelace").with_insert("@ada");
        assert_eq!(candidate.label, "Ada Lovelace");
        assert_eq!(candidate.insert, "@ada");
    }

    #[test]
    #[should_panic(expected = "candidate label must not be empty")]
    fn test_candidate_empty_label_panics() {
        let _ = Candidate::new("");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DirectoryError::Timeout.to_string(),
            "Directory lookup timed out"
        );
        assert!(
            DirectoryError::Transport("refused".to_string())
                .to_string()
                .contains("refused")
        );
    }
}
