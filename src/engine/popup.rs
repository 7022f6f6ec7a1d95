//! Popup list state.
//!
//! Holds the candidate list and the single highlighted index. Navigation
//! wraps at both ends; nothing is highlighted until the first navigation
//! key. Rendering is the host's job; this is state only.

use crate::directory::Candidate;

/// Popup list state machine.
///
/// `Closed → Loading → Ready → Closed`, with `Failed` as the error arm of
/// `Loading`. A query change from `Ready` or `Failed` re-enters `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    /// No popup; no session is open.
    #[default]
    Closed,

    /// A lookup is in flight; the host shows a loading affordance.
    Loading,

    /// Candidates arrived. `active` is the highlighted index, `None`
    /// until the first navigation key.
    Ready {
        /// Candidates in render order, already capped to the page size.
        candidates: Vec<Candidate>,
        /// Highlighted index, always in bounds when set.
        active: Option<usize>,
    },

    /// The lookup failed or timed out; the next keystroke retries.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl PopupState {
    /// Returns whether the popup is visible in any form.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Returns whether a lookup is pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the candidate list, empty unless `Ready`.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Ready { candidates, .. } => candidates,
            _ => &[],
        }
    }

    /// Returns the highlighted index, if any.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        match self {
            Self::Ready { active, .. } => *active,
            _ => None,
        }
    }

    /// Returns the highlighted candidate, if any.
    #[must_use]
    pub fn targeted(&self) -> Option<&Candidate> {
        match self {
            Self::Ready {
                candidates,
                active: Some(index),
            } => candidates.get(*index),
            _ => None,
        }
    }

    /// Returns the candidate at `index`, if `Ready` and in bounds.
    #[must_use]
    pub fn candidate_at(&self, index: usize) -> Option<&Candidate> {
        match self {
            Self::Ready { candidates, .. } => candidates.get(index),
            _ => None,
        }
    }

    /// Moves the highlight down one entry, wrapping past the end.
    ///
    /// From no highlight the first entry is selected. No-op unless
    /// `Ready` with a non-empty list.
    pub fn select_next(&mut self) {
        if let Self::Ready { candidates, active } = self {
            if candidates.is_empty() {
                return;
            }
            *active = Some(match *active {
                Some(index) => (index + 1) % candidates.len(),
                None => 0,
            });
        }
    }

    /// Moves the highlight up one entry, wrapping past the start.
    ///
    /// From no highlight the last entry is selected. No-op unless
    /// `Ready` with a non-empty list.
    pub fn select_prev(&mut self) {
        if let Self::Ready { candidates, active } = self {
            if candidates.is_empty() {
                return;
            }
            let len = candidates.len();
            *active = Some(match *active {
                Some(index) => (index + len - 1) % len,
                None => len - 1,
            });
        }
    }
}
