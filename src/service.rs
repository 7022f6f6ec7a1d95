//! Lookup service: the asynchronous half of the engine.
//!
//! [`LookupClient`] runs directory lookups on its own small runtime so the
//! embedding editor stays fully synchronous. Each submitted request is
//! debounced, answered from the result cache when possible, bounded by the
//! lookup timeout, and delivered back as a [`LookupEvent`] for the host to
//! pump into the engine. Generation stamps travel with the request and the
//! event; the engine drops anything stale.
//!
//! [`MentionService`] bundles an engine with a client for hosts that want
//! a single object to talk to.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::MentionConfig;
use crate::directory::{
    CacheKey, Candidate, DirectoryError, DirectorySource, LookupCache, LookupDebounce,
};
use crate::editor::{HostEditor, Key};
use crate::engine::{KeyDisposition, LookupRequest, MentionEngine, PopupState};

/// A lookup outcome on its way back into the engine.
#[derive(Debug)]
pub struct LookupEvent {
    /// Generation stamp echoed from the request.
    pub generation: u64,

    /// Candidates, or the failure to report.
    pub outcome: Result<Vec<Candidate>, DirectoryError>,
}

/// Client side of the lookup service.
///
/// Owns a dedicated two-worker runtime (so embedders need no async runtime
/// of their own) plus the debounce gate and result cache shared by its
/// lookup tasks.
pub struct LookupClient {
    runtime: Runtime,
    source: Arc<dyn DirectorySource>,
    debounce: Arc<LookupDebounce>,
    cache: Option<Arc<Mutex<LookupCache>>>,
    timeout: Duration,
    events_tx: mpsc::UnboundedSender<LookupEvent>,
    events_rx: mpsc::UnboundedReceiver<LookupEvent>,
}

impl LookupClient {
    /// Creates a client for the given source.
    ///
    /// # Panics
    /// Panics if the runtime cannot be created or the configured debounce
    /// is out of range.
    #[must_use]
    pub fn new(source: Arc<dyn DirectorySource>, config: &MentionConfig) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("mention-lookup")
            .build()
            .expect("Failed to create lookup runtime");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cache = config
            .cache_ttl()
            .map(|ttl| Arc::new(Mutex::new(LookupCache::new(ttl))));

        Self {
            runtime,
            source,
            debounce: Arc::new(LookupDebounce::new(config.debounce())),
            cache,
            timeout: config.lookup_timeout(),
            events_tx,
            events_rx,
        }
    }

    /// Submits a lookup request.
    ///
    /// The request waits out the debounce window first; a newer submission
    /// inside that window supersedes it silently. The eventual outcome is
    /// queued for [`try_recv`](Self::try_recv).
    pub fn submit(&self, request: LookupRequest) {
        let LookupRequest { generation, query } = request;
        let ticket = self.debounce.arm();

        let debounce = Arc::clone(&self.debounce);
        let source = Arc::clone(&self.source);
        let cache = self.cache.clone();
        let events_tx = self.events_tx.clone();
        let timeout = self.timeout;

        self.runtime.spawn(async move {
            if !debounce.settle(ticket).await {
                debug!(generation, %query, "lookup superseded before dispatch");
                return;
            }

            let key = CacheKey::new(source.id(), &query);
            if let Some(cache) = &cache {
                let hit = cache.lock().ok().and_then(|mut cache| cache.get(&key));
                if let Some(candidates) = hit {
                    debug!(generation, %query, "lookup served from cache");
                    let _ = events_tx.send(LookupEvent {
                        generation,
                        outcome: Ok(candidates),
                    });
                    return;
                }
            }

            let outcome = match tokio::time::timeout(timeout, source.lookup(&query)).await {
                Err(_) => Err(DirectoryError::Timeout),
                Ok(Err(error)) => Err(error),
                Ok(Ok(candidates)) => {
                    if let Some(cache) = &cache {
                        if let Ok(mut cache) = cache.lock() {
                            cache.insert(key, candidates.clone());
                        }
                    }
                    Ok(candidates)
                }
            };

            if let Err(error) = &outcome {
                warn!(generation, %query, %error, "directory lookup failed");
            }
            let _ = events_tx.send(LookupEvent { generation, outcome });
        });
    }

    /// Returns the next queued lookup event, if any. Never blocks.
    pub fn try_recv(&mut self) -> Option<LookupEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Cancels whatever lookup is pending in the debounce window.
    pub fn cancel(&self) {
        self.debounce.cancel();
    }
}

/// Engine plus lookup client behind one synchronous interface.
///
/// The host forwards its editor events and calls [`pump`](Self::pump)
/// from its idle/render loop; everything else is wiring the service does
/// internally.
pub struct MentionService {
    engine: MentionEngine,
    client: LookupClient,
}

impl MentionService {
    /// Creates a service over the given directory source.
    ///
    /// # Panics
    /// Panics if the lookup runtime cannot be created or the configured
    /// debounce is out of range.
    #[must_use]
    pub fn new(source: Arc<dyn DirectorySource>, config: MentionConfig) -> Self {
        let client = LookupClient::new(source, &config);
        Self {
            engine: MentionEngine::new(config),
            client,
        }
    }

    /// Forwards a key-down event; see [`MentionEngine::on_key_down`].
    pub fn key_down<E: HostEditor + ?Sized>(
        &mut self,
        editor: &mut E,
        key: &Key,
    ) -> KeyDisposition {
        self.engine.on_key_down(editor, key)
    }

    /// Forwards a content-changing keystroke and submits any lookup it
    /// produced; see [`MentionEngine::on_keystroke`].
    pub fn keystroke<E: HostEditor + ?Sized>(&mut self, editor: &E, key: &Key) {
        if let Some(request) = self.engine.on_keystroke(editor, key) {
            self.client.submit(request);
        }
    }

    /// Forwards a click on popup entry `index`. Returns whether a commit
    /// happened.
    pub fn click_entry<E: HostEditor + ?Sized>(&mut self, editor: &mut E, index: usize) -> bool {
        self.engine.on_click_entry(editor, index)
    }

    /// Forwards a click outside the popup: cancels the session.
    pub fn click_outside(&mut self) {
        self.engine.on_click_outside();
        self.client.cancel();
    }

    /// Cancels any open session and pending lookup.
    pub fn cancel(&mut self) {
        self.engine.cancel();
        self.client.cancel();
    }

    /// Drains queued lookup events into the engine.
    ///
    /// Returns how many events were applied (stale ones are dropped by
    /// the engine and not counted).
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.client.try_recv() {
            if self.engine.apply_lookup(event.generation, event.outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Returns the popup state for rendering.
    #[must_use]
    pub const fn popup(&self) -> &PopupState {
        self.engine.popup()
    }

    /// Returns the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &MentionEngine {
        &self.engine
    }
}
