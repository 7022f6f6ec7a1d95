//! In-memory directory source.
//!
//! Filters a fixed roster by case-insensitive substring containment over the
//! searchable name, preserving roster order. No ranking is applied beyond
//! containment. An optional artificial latency makes the source behave like
//! a remote directory for tests and demos.

use std::time::Duration;

use super::{Candidate, DirectorySource, LookupFuture};

/// One roster entry: a searchable name with an optional insert override.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    /// Searchable display name.
    pub name: String,

    /// Insertion payload override; the name is inserted when `None`.
    pub insert: Option<String>,
}

impl RosterEntry {
    /// Creates an entry whose payload equals its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            insert: None,
        }
    }

    /// Overrides the insertion payload.
    #[must_use]
    pub fn with_insert(mut self, insert: impl Into<String>) -> Self {
        self.insert = Some(insert.into());
        self
    }

    fn to_candidate(&self) -> Candidate {
        let candidate = Candidate::new(self.name.clone());
        match &self.insert {
            Some(insert) => candidate.with_insert(insert.clone()),
            None => candidate,
        }
    }
}

/// In-memory directory source over a fixed roster.
#[derive(Debug, Clone)]
pub struct RosterSource {
    entries: Vec<RosterEntry>,
    latency: Option<Duration>,
}

impl RosterSource {
    /// Creates a source from a list of names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names.into_iter().map(RosterEntry::new).collect(),
            latency: None,
        }
    }

    /// Creates a source from prebuilt entries.
    #[must_use]
    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        Self {
            entries,
            latency: None,
        }
    }

    /// Adds an artificial delay before every lookup resolves.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the number of roster entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filters the roster synchronously; `lookup` wraps this in a future.
    fn matches(&self, query: &str) -> Vec<Candidate> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .map(RosterEntry::to_candidate)
            .collect()
    }
}

impl DirectorySource for RosterSource {
    fn id(&self) -> &str {
        "roster"
    }

    fn lookup(&self, query: &str) -> LookupFuture {
        let candidates = self.matches(query);
        let latency = self.latency;

        Box::pin(async move {
            if let Some(delay) = latency {
                tokio::time::sleep(delay).await;
            }
            Ok(candidates)
        })
    }
}
