//! Result cache
//!
//! Memoizes query responses keyed by the descriptor's deterministic
//! serialization. Three independent safeguards bound staleness:
//!
//! - a TTL, checked on read and swept before every insertion
//! - a capacity limit evicting the single oldest-inserted entry
//!   (insertion order, not LRU: access never extends an entry's life)
//! - a dataset generation tag; entries computed against a superseded
//!   dataset are never served and are dropped on contact
//!
//! `IndexMap` keeps entries in insertion order, which makes oldest-first
//! eviction an O(1) front removal.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::debug;

use crate::query::QueryResponse;

struct CacheEntry {
    result: QueryResponse,
    expires_at: Instant,
    generation: u64,
}

/// TTL + capacity bounded memoization of query responses.
pub struct ResultCache {
    entries: IndexMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            ttl,
            capacity,
        }
    }

    /// Cached response for `key`, or `None` on a miss.
    ///
    /// A hit requires the entry to be present, unexpired and tagged
    /// with the current dataset generation; anything else removes the
    /// entry and reports a miss.
    pub fn get(&mut self, key: &str, generation: u64) -> Option<QueryResponse> {
        let stale = match self.entries.get(key) {
            None => return None,
            Some(entry) => {
                entry.generation != generation || Instant::now() >= entry.expires_at
            }
        };

        if stale {
            self.entries.shift_remove(key);
            debug!(key, "stale cache entry dropped");
            return None;
        }

        self.entries.get(key).map(|entry| entry.result.clone())
    }

    /// Insert a response with `expires_at = now + ttl`.
    ///
    /// Expired entries are swept first; if the cache is still at
    /// capacity, the oldest-inserted entry is evicted.
    pub fn put(&mut self, key: String, result: QueryResponse, generation: u64) {
        if self.capacity == 0 {
            return;
        }

        self.sweep_expired();

        // Re-inserting a key moves it to the back of the eviction order
        self.entries.shift_remove(&key);

        if self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                debug!(key = %evicted, "capacity reached, oldest entry evicted");
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                result,
                expires_at: Instant::now() + self.ttl,
                generation,
            },
        );
    }

    /// Remove every entry whose TTL has passed
    pub fn sweep_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| now < entry.expires_at);
    }

    /// Drop everything. Called whenever the dataset is replaced.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
