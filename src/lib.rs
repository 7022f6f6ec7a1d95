//! atmention
//!
//! A host-agnostic @mention autocomplete engine for rich-text editors:
//! delimiter trigger detection, live query tracking, debounced asynchronous
//! directory lookup, popup list navigation, and atomic commit of the chosen
//! mention into the host document.
//!
//! # Architecture
//!
//! - **Engine Module**: synchronous session state machine driven by host
//!   key/click events; lookup results re-enter it as generation-stamped
//!   messages
//! - **Directory Module**: the `DirectorySource` contract plus bundled
//!   in-memory and HTTP sources, debounce and result cache
//! - **Editor Module**: the `HostEditor` trait and a ropey-backed reference
//!   implementation
//! - **Service Module**: pairs an engine with a lookup client running on its
//!   own runtime, so embedders stay fully synchronous
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use atmention::{BufferEditor, Key, MentionConfig, MentionService, RosterSource};
//!
//! let source = Arc::new(RosterSource::new(["Ada Lovelace", "Grace Hopper"]));
//! let mut service = MentionService::new(source, MentionConfig::default());
//! let mut editor = BufferEditor::new();
//!
//! editor.insert_char('@');
//! service.keystroke(&editor, &Key::Char('@'));
//! // Pump lookup results in the host's idle/render loop:
//! service.pump();
//! ```

pub mod config;
pub mod directory;
pub mod editor;
pub mod engine;
pub mod logging;
pub mod service;

// Re-export main types
pub use config::MentionConfig;
pub use directory::{Candidate, DirectoryError, DirectorySource, HttpSource, RosterSource};
pub use editor::{BufferEditor, HostEditor, Key};
pub use engine::{KeyDisposition, LookupRequest, MentionEngine, PopupState, Session};
pub use service::{LookupClient, LookupEvent, MentionService};
