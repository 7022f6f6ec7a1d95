//! Mention session state machine.
//!
//! The engine is fully synchronous: the host feeds it key and click events
//! plus lookup outcomes, and reads popup state back. Asynchronous lookup
//! lives in the service layer; results re-enter the engine as
//! generation-stamped messages so stale responses are dropped, never
//! applied.
//!
//! ## Event flow
//!
//! - `on_key_down` — before the host applies a keystroke: popup
//!   navigation, commit (Enter), cancel (Escape), close on caret-moving
//!   keys. Returns whether the key was consumed.
//! - `on_keystroke` — after the host applied a content-changing
//!   keystroke: trigger detection and query re-extraction. Returns the
//!   lookup the host should submit, if any.
//! - `on_click_entry` / `on_click_outside` — mouse selection and
//!   click-away cancel.
//! - `apply_lookup` — a lookup outcome coming back from the service.

mod commit;
mod popup;
mod session;
mod trigger;

use tracing::debug;

pub use popup::PopupState;
pub use session::{QueryStatus, Session};

use crate::config::MentionConfig;
use crate::directory::{Candidate, DirectoryError};
use crate::editor::{HostEditor, Key};

/// What the engine did with a key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The engine handled the key; the host must not apply its default
    /// behavior (the preventDefault analog).
    Consumed,

    /// The key is the host's to handle.
    Passthrough,
}

/// A lookup the host should hand to the lookup client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Generation stamp; the matching outcome must echo it.
    pub generation: u64,

    /// Query text to resolve.
    pub query: String,
}

/// Synchronous mention state machine.
///
/// Holds at most one open [`Session`] and the popup state belonging to
/// it. All methods run on the host's event thread.
#[derive(Debug)]
pub struct MentionEngine {
    config: MentionConfig,
    session: Option<Session>,
    popup: PopupState,
    /// Monotonic lookup counter, never reset across sessions.
    generation: u64,
}

impl MentionEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: MentionConfig) -> Self {
        Self {
            config,
            session: None,
            popup: PopupState::Closed,
            generation: 0,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &MentionConfig {
        &self.config
    }

    /// Returns the popup state for rendering.
    #[must_use]
    pub const fn popup(&self) -> &PopupState {
        &self.popup
    }

    /// Returns the open session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns whether a session is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Handles a key before the host applies it.
    ///
    /// Only relevant while a session is open; otherwise everything passes
    /// through.
    pub fn on_key_down<E: HostEditor + ?Sized>(
        &mut self,
        editor: &mut E,
        key: &Key,
    ) -> KeyDisposition {
        if self.session.is_none() {
            return KeyDisposition::Passthrough;
        }

        match key {
            Key::ArrowDown => {
                self.popup.select_next();
                KeyDisposition::Consumed
            }
            Key::ArrowUp => {
                self.popup.select_prev();
                KeyDisposition::Consumed
            }
            Key::Enter => {
                if let Some(candidate) = self.popup.targeted().cloned() {
                    self.commit(editor, &candidate);
                }
                // Without a highlighted entry, Enter is a no-op; it still
                // never reaches the document while the popup is open.
                KeyDisposition::Consumed
            }
            Key::Escape => {
                debug!("mention session cancelled");
                self.close();
                KeyDisposition::Consumed
            }
            key if key.moves_caret() => {
                // The caret is leaving the tracked region.
                self.close();
                KeyDisposition::Passthrough
            }
            _ => KeyDisposition::Passthrough,
        }
    }

    /// Handles a content-changing keystroke after the host applied it.
    ///
    /// Returns the lookup to submit when the keystroke opened a session
    /// or changed the query.
    #[must_use]
    pub fn on_keystroke<E: HostEditor + ?Sized>(
        &mut self,
        editor: &E,
        key: &Key,
    ) -> Option<LookupRequest> {
        match key {
            Key::Char(ch) => {
                if self.session.is_some() {
                    self.refresh_query(editor)
                } else {
                    self.try_open(editor, *ch)
                }
            }
            Key::Backspace => self.refresh_query(editor),
            _ => None,
        }
    }

    /// Handles a click on popup entry `index`.
    ///
    /// Commits that candidate when the popup is ready and the index is in
    /// bounds; otherwise a no-op. Returns whether a commit happened.
    pub fn on_click_entry<E: HostEditor + ?Sized>(&mut self, editor: &mut E, index: usize) -> bool {
        let Some(candidate) = self.popup.candidate_at(index).cloned() else {
            return false;
        };
        self.commit(editor, &candidate);
        true
    }

    /// Handles a click outside the popup and editor region: cancels the
    /// session, leaving typed text untouched.
    pub fn on_click_outside(&mut self) {
        if self.session.is_some() {
            debug!("mention session cancelled by outside click");
            self.close();
        }
    }

    /// Applies a lookup outcome.
    ///
    /// Outcomes for a superseded generation or a closed session are
    /// dropped. Returns whether the outcome was applied.
    pub fn apply_lookup(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Candidate>, DirectoryError>,
    ) -> bool {
        let Some(session) = &self.session else {
            debug!(generation, "dropping lookup outcome for closed session");
            return false;
        };
        if !session.is_current(generation) {
            debug!(
                generation,
                current = session.generation(),
                "dropping stale lookup outcome"
            );
            return false;
        }

        match outcome {
            Ok(mut candidates) => {
                candidates.truncate(self.config.max_items);
                self.popup = PopupState::Ready {
                    candidates,
                    active: None,
                };
            }
            Err(error) => {
                self.popup = PopupState::Failed {
                    reason: error.to_string(),
                };
            }
        }
        true
    }

    /// Cancels any open session without touching the document.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn try_open<E: HostEditor + ?Sized>(&mut self, editor: &E, typed: char) -> Option<LookupRequest> {
        let offset = trigger::detect(editor, self.config.delimiter, typed)?;

        self.generation += 1;
        self.session = Some(Session::new(offset, self.generation));
        self.popup = PopupState::Loading;
        debug!(offset, "mention session opened");

        Some(LookupRequest {
            generation: self.generation,
            query: String::new(),
        })
    }

    fn refresh_query<E: HostEditor + ?Sized>(&mut self, editor: &E) -> Option<LookupRequest> {
        let delimiter = self.config.delimiter;
        let session = self.session.as_mut()?;

        match session.extract_query(editor, delimiter) {
            QueryStatus::Terminated => {
                debug!("mention session left its tracked region");
                self.close();
                None
            }
            QueryStatus::Live(query) => {
                self.generation += 1;
                session.set_query(query.clone(), self.generation);
                self.popup = PopupState::Loading;

                Some(LookupRequest {
                    generation: self.generation,
                    query,
                })
            }
        }
    }

    fn commit<E: HostEditor + ?Sized>(&mut self, editor: &mut E, candidate: &Candidate) {
        if let Some(session) = &self.session {
            commit::apply(editor, session, candidate, &self.config.separator);
        }
        self.close();
    }

    fn close(&mut self) {
        self.session = None;
        self.popup = PopupState::Closed;
    }
}
