//! TTL cache for lookup results.
//!
//! Backspacing through a query replays recent queries verbatim; caching
//! them avoids a round of identical directory traffic. Keys combine the
//! source id with the normalized query, so two sources never share
//! entries.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::Candidate;

/// Maximum number of cached queries.
const MAX_CACHE_ENTRIES: usize = 64;

/// Cache key: source id plus normalized query.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    source: String,
    query: String,
}

impl CacheKey {
    /// Creates a key, normalizing the query the way sources match it
    /// (case-insensitive).
    #[must_use]
    pub fn new(source: impl Into<String>, query: &str) -> Self {
        Self {
            source: source.into(),
            query: query.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheSlot {
    candidates: Vec<Candidate>,
    stored_at: Instant,
    last_hit: u64,
}

/// TTL cache for directory lookup results.
#[derive(Debug)]
pub struct LookupCache {
    slots: HashMap<CacheKey, CacheSlot>,
    ttl: Duration,
    max_entries: usize,
    /// Monotonic access clock for eviction ordering.
    clock: u64,
}

impl LookupCache {
    /// Creates a cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_CACHE_ENTRIES)
    }

    /// Creates a cache with the given TTL and capacity.
    ///
    /// # Panics
    /// Panics if `max_entries` is zero.
    #[must_use]
    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        assert!(max_entries > 0, "cache capacity must be positive");

        Self {
            slots: HashMap::with_capacity(max_entries),
            ttl,
            max_entries,
            clock: 0,
        }
    }

    /// Returns the cached candidates for `key`, if fresh.
    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<Candidate>> {
        let fresh = self
            .slots
            .get(key)
            .map(|slot| slot.stored_at.elapsed() <= self.ttl);

        match fresh {
            Some(true) => {
                self.clock += 1;
                let clock = self.clock;
                self.slots.get_mut(key).map(|slot| {
                    slot.last_hit = clock;
                    slot.candidates.clone()
                })
            }
            Some(false) => {
                self.slots.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores candidates for `key`, evicting stale and cold slots at
    /// capacity.
    pub fn insert(&mut self, key: CacheKey, candidates: Vec<Candidate>) {
        if self.slots.len() >= self.max_entries {
            self.evict();
        }

        self.clock += 1;
        self.slots.insert(
            key,
            CacheSlot {
                candidates,
                stored_at: Instant::now(),
                last_hit: self.clock,
            },
        );
    }

    fn evict(&mut self) {
        let ttl = self.ttl;
        self.slots.retain(|_, slot| slot.stored_at.elapsed() <= ttl);

        // Still full: drop the coldest half.
        if self.slots.len() >= self.max_entries {
            let mut by_heat: Vec<(CacheKey, u64)> = self
                .slots
                .iter()
                .map(|(key, slot)| (key.clone(), slot.last_hit))
                .collect();
            by_heat.sort_by_key(|(_, last_hit)| *last_hit);

            let excess = self.slots.len().saturating_sub(self.max_entries / 2);
            for (key, _) in by_heat.into_iter().take(excess) {
                self.slots.remove(&key);
            }
        }
    }

    /// Drops all cached entries.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns the number of cached queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn entry(label: &str) -> Vec<Candidate> {
        vec![Candidate::new(label)]
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = LookupCache::new(Duration::from_secs(30));
        let key = CacheKey::new("roster", "st");

        cache.insert(key.clone(), entry("Stoney Lawless"));

        let hit = cache.get(&key).unwrap();
        assert_eq!(hit[0].label, "Stoney Lawless");
    }

    #[test]
    fn test_key_normalizes_query_case() {
        let mut cache = LookupCache::new(Duration::from_secs(30));
        cache.insert(CacheKey::new("roster", "ST"), entry("Stoney Lawless"));

        assert!(cache.get(&CacheKey::new("roster", "st")).is_some());
    }

    #[test]
    fn test_sources_do_not_share_entries() {
        let mut cache = LookupCache::new(Duration::from_secs(30));
        cache.insert(CacheKey::new("roster", "st"), entry("Stoney Lawless"));

        assert!(cache.get(&CacheKey::new("http", "st")).is_none());
    }

    #[test]
    fn test_expired_entry_misses() {
        let mut cache = LookupCache::new(Duration::from_millis(1));
        let key = CacheKey::new("roster", "st");
        cache.insert(key.clone(), entry("Stoney Lawless"));

        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_bounds_size() {
        let mut cache = LookupCache::with_capacity(Duration::from_secs(30), 4);
        for i in 0..10 {
            cache.insert(CacheKey::new("roster", &format!("q{i}")), entry("x"));
        }
        assert!(cache.len() <= 4);
    }

    #[test]
    fn test_clear() {
        let mut cache = LookupCache::new(Duration::from_secs(30));
        cache.insert(CacheKey::new("roster", "a"), entry("x"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    #[should_panic(expected = "cache capacity must be positive")]
    fn test_zero_capacity_panics() {
        let _ = LookupCache::with_capacity(Duration::from_secs(30), 0);
    }
}
