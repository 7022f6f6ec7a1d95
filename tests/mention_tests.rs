//! Integration tests for the mention autocomplete engine.
//!
//! These tests drive the full stack (engine + lookup service + reference
//! editor + in-memory directory) through the same keyboard and mouse
//! scenarios a host editor produces: trigger, filter-as-you-type, popup
//! navigation, commit, cancel, and query rewind.
//!
//! NOTE: Tests use #[test] instead of #[tokio::test] because the lookup
//! client creates its own internal tokio runtime, and dropping a runtime
//! from within an async context causes a panic.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;

use atmention::{
    BufferEditor, Candidate, DirectoryError, DirectorySource, HostEditor, Key, KeyDisposition,
    MentionConfig, MentionService, PopupState, RosterSource,
};

/// Fixture directory: 13 people, so an unfiltered query exercises the
/// 10-entry page cap, and the substring counts used below hold
/// ("st" -> 5, "sto" -> 1, "ta" -> 3, "ba" -> 2, "eliz" -> 1).
fn people() -> Vec<&'static str> {
    vec![
        "Wendell Gariepy",
        "Jenniffer Caffey",
        "Tuyet Ybarbo",
        "Estella Marlow",
        "Kirsten Munos",
        "Elizabet Gebhart",
        "Tamika Holdren",
        "Stoney Lawless",
        "Barbra Dupre",
        "Augustina Heimann",
        "Rosita Ornelas",
        "Kirstie Delarosa",
        "Santana Cardena",
    ]
}

fn fast_config() -> MentionConfig {
    MentionConfig {
        debounce_ms: 5,
        lookup_timeout_ms: 1000,
        ..MentionConfig::default()
    }
}

/// Full-stack harness: service, reference editor, and the key-press
/// helpers the scenarios are written in.
struct Harness {
    service: MentionService,
    editor: BufferEditor,
}

impl Harness {
    fn new() -> Self {
        Self::with_source(Arc::new(RosterSource::new(people())))
    }

    fn with_source(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            service: MentionService::new(source, fast_config()),
            editor: BufferEditor::new(),
        }
    }

    fn press_delimiter(&mut self) {
        self.type_char('@');
    }

    fn type_char(&mut self, ch: char) {
        let key = Key::Char(ch);
        if self.service.key_down(&mut self.editor, &key) == KeyDisposition::Consumed {
            return;
        }
        self.editor.insert_char(ch);
        self.service.keystroke(&self.editor, &key);
    }

    fn insert_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.type_char(ch);
        }
    }

    fn press_backspace(&mut self) {
        if self.service.key_down(&mut self.editor, &Key::Backspace) == KeyDisposition::Consumed {
            return;
        }
        self.editor.delete_backward();
        self.service.keystroke(&self.editor, &Key::Backspace);
    }

    fn press_arrow_down(&mut self) {
        self.service.key_down(&mut self.editor, &Key::ArrowDown);
    }

    fn press_arrow_up(&mut self) {
        self.service.key_down(&mut self.editor, &Key::ArrowUp);
    }

    fn press_enter(&mut self) {
        self.service.key_down(&mut self.editor, &Key::Enter);
    }

    fn press_escape(&mut self) {
        self.service.key_down(&mut self.editor, &Key::Escape);
    }

    fn click_entry(&mut self, index: usize) -> bool {
        self.service.click_entry(&mut self.editor, index)
    }

    fn click_outside(&mut self) {
        self.service.click_outside();
    }

    /// Pumps lookup events until the popup leaves the loading state.
    fn settle(&mut self) {
        for _ in 0..200 {
            self.service.pump();
            if !self.service.popup().is_loading() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("lookup never settled");
    }

    fn rendered(&self) -> usize {
        self.service.popup().candidates().len()
    }

    fn active(&self) -> Option<usize> {
        self.service.popup().active()
    }

    fn content(&self) -> String {
        self.editor.content()
    }
}

// ============================================================================
// Basic: trigger, loading state, page cap
// ============================================================================

#[test]
fn test_delimiter_shows_loading_then_first_page() {
    let mut h = Harness::new();

    h.press_delimiter();
    assert!(h.service.popup().is_loading(), "loading entries first");

    h.settle();
    assert_eq!(h.rendered(), 10, "first 10 entries loaded");
    assert!(h.active().is_none(), "nothing highlighted before navigation");
}

#[test]
fn test_mid_word_delimiter_stays_closed() {
    let mut h = Harness::new();

    h.insert_text("mail");
    h.press_delimiter();

    assert!(!h.service.popup().is_open());
    assert_eq!(h.content(), "mail@");
}

// ============================================================================
// Keyboard navigation
// ============================================================================

#[test]
fn test_keyboard_navigation_wraps_both_ways() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.settle();

    h.press_arrow_down();
    assert_eq!(h.active(), Some(0), "first entry highlighted");

    h.press_arrow_down();
    assert_eq!(h.active(), Some(1), "second entry highlighted");

    h.press_arrow_up();
    h.press_arrow_up();
    assert_eq!(h.active(), Some(9), "wrapped to last entry of the page");

    h.press_arrow_down();
    assert_eq!(h.active(), Some(0), "wrapped back to the first entry");
}

// ============================================================================
// Search: filter narrows with every keystroke
// ============================================================================

#[test]
fn test_search_entry_narrows_as_typed() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("st");
    h.settle();
    assert_eq!(h.rendered(), 5, "5 entries filtered");

    h.insert_text("o");
    h.settle();
    assert_eq!(h.rendered(), 1, "1 entry filtered");
}

#[test]
fn test_rapid_typing_applies_only_last_query() {
    // A slow directory plus no settling between keystrokes: every
    // keystroke supersedes the previous in-flight lookup, and only the
    // final query's result may ever render.
    let source =
        Arc::new(RosterSource::new(people()).with_latency(Duration::from_millis(30)));
    let mut h = Harness::with_source(source);

    h.press_delimiter();
    h.insert_text("st");
    h.settle();

    assert_eq!(h.rendered(), 5, "result for \"st\", not a stale prefix");
}

#[test]
fn test_no_matches_renders_empty_ready_list() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("zzz");
    h.settle();

    assert_eq!(h.rendered(), 0);
    assert!(h.service.popup().is_open(), "empty list is not an error");

    // Enter and navigation stay no-ops on the empty list.
    h.press_arrow_down();
    h.press_enter();
    assert_eq!(h.content(), "@zzz");
    assert!(h.service.popup().is_open());
}

// ============================================================================
// Pick: click and Enter commits
// ============================================================================

#[test]
fn test_pick_entry_by_click_then_by_enter() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.settle();
    assert_eq!(h.rendered(), 10, "first 10 entries loaded");

    let revision = h.editor.revision();
    assert!(h.click_entry(1));

    assert_eq!(h.content(), "Jenniffer Caffey\u{a0}", "entry submitted");
    assert_eq!(
        h.editor.revision(),
        revision + 1,
        "commit is a single atomic mutation"
    );
    assert!(h.editor.is_focused());
    assert!(!h.service.popup().is_open());

    h.insert_text("will look into this. ");
    h.insert_text("Can you also have a look ");
    h.press_delimiter();
    h.insert_text("eliz");
    h.settle();
    assert_eq!(h.rendered(), 1, "1 entry loaded");

    // Two arrow-downs on a single-entry list wrap back onto it.
    h.press_arrow_down();
    h.press_arrow_down();
    h.press_enter();

    assert_eq!(
        h.content(),
        "Jenniffer Caffey\u{a0}will look into this. Can you also have a look Elizabet Gebhart\u{a0}",
        "second entry submitted"
    );
}

#[test]
fn test_enter_without_highlight_commits_nothing() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.settle();
    h.press_enter();

    assert_eq!(h.content(), "@");
    assert!(h.service.popup().is_open());
}

// ============================================================================
// Cancel: Escape and outside click leave text verbatim
// ============================================================================

#[test]
fn test_cancel_out_preserves_typed_text() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("ta");
    h.settle();
    assert_eq!(h.rendered(), 3, "3 entries loaded");

    h.press_escape();
    assert_eq!(h.content(), "@ta", "original text present");
    assert!(!h.service.popup().is_open());

    h.insert_text(" ");
    h.press_delimiter();
    h.insert_text("ba");
    h.settle();
    assert_eq!(h.rendered(), 2, "2 entries loaded");

    h.click_outside();
    assert_eq!(h.content(), "@ta @ba", "original text present");
    assert!(!h.service.popup().is_open());
}

#[test]
fn test_caret_movement_closes_without_commit() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("ta");
    h.settle();

    let disposition = h.service.key_down(&mut h.editor, &Key::ArrowLeft);

    assert_eq!(disposition, KeyDisposition::Passthrough);
    assert!(!h.service.popup().is_open());
    assert_eq!(h.content(), "@ta");
}

// ============================================================================
// Query rewind: backspacing and fresh filter passes
// ============================================================================

#[test]
fn test_new_query_after_backspacing_to_trigger() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("ta");
    h.settle();
    assert_eq!(h.rendered(), 3, "first query: 3 entries loaded");

    h.press_backspace();
    h.press_backspace();

    h.insert_text("ba");
    h.settle();
    assert_eq!(h.rendered(), 2, "second query: 2 entries loaded");

    h.press_arrow_down();
    h.press_enter();

    assert_eq!(h.content(), "Tuyet Ybarbo\u{a0}", "second entry submitted");
}

#[test]
fn test_backspacing_past_trigger_ends_the_session() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("t");
    h.settle();

    h.press_backspace(); // removes "t"
    h.press_backspace(); // removes the delimiter itself

    assert!(!h.service.popup().is_open());
    assert_eq!(h.content(), "");

    h.insert_text("ta");
    assert!(!h.service.popup().is_open(), "plain typing stays plain");
}

// ============================================================================
// Failure paths
// ============================================================================

/// A directory whose transport always fails.
struct UnreachableDirectory;

impl DirectorySource for UnreachableDirectory {
    fn id(&self) -> &str {
        "unreachable"
    }

    fn lookup(&self, _query: &str) -> atmention::directory::LookupFuture {
        Box::pin(async {
            Err(DirectoryError::Transport(
                "connection refused".to_string(),
            ))
        })
    }
}

#[test]
fn test_lookup_failure_keeps_text_and_recovers_on_escape() {
    let mut h = Harness::with_source(Arc::new(UnreachableDirectory));

    h.press_delimiter();
    h.insert_text("ta");
    h.settle();

    assert!(matches!(h.service.popup(), PopupState::Failed { .. }));
    assert_eq!(h.content(), "@ta", "typed text never altered");

    // Navigation and Enter are no-ops in the failed state.
    h.press_arrow_down();
    h.press_enter();
    assert_eq!(h.content(), "@ta");

    h.press_escape();
    assert!(!h.service.popup().is_open());
    assert_eq!(h.content(), "@ta");
}

#[test]
fn test_next_keystroke_retries_after_failure() {
    let mut h = Harness::with_source(Arc::new(UnreachableDirectory));

    h.press_delimiter();
    h.settle();
    assert!(matches!(h.service.popup(), PopupState::Failed { .. }));

    h.insert_text("t");
    assert!(h.service.popup().is_loading(), "keystroke retries the lookup");
}

// ============================================================================
// Candidate payloads
// ============================================================================

#[test]
fn test_commit_inserts_payload_override() {
    use atmention::directory::RosterEntry;

    let source = Arc::new(RosterSource::from_entries(vec![
        RosterEntry::new("Ada Lovelace").with_insert("@ada:example.org"),
    ]));
    let mut h = Harness::with_source(source);

    h.press_delimiter();
    h.insert_text("ada");
    h.settle();
    assert_eq!(h.rendered(), 1);

    h.press_arrow_down();
    h.press_enter();

    assert_eq!(h.content(), "@ada:example.org\u{a0}");
}

#[test]
fn test_candidate_list_is_immutable_render_data() {
    let mut h = Harness::new();

    h.press_delimiter();
    h.insert_text("sto");
    h.settle();

    let rendered: Vec<Candidate> = h.service.popup().candidates().to_vec();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].label, "Stoney Lawless");
    assert_eq!(rendered[0].insert, "Stoney Lawless");
}
