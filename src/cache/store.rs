//! Cache Store Module
//!
//! HashMap-backed response cache with lazy TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Signature};

// == Response Cache ==
/// In-memory cache of response envelopes keyed by [`Signature`].
///
/// There is no size bound and no background sweep: entries leave only when a
/// lookup finds them expired. The set of cacheable signatures is small and
/// fixed, so growth is bounded by the operation surface.
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<Signature, CacheEntry>,
    stats: CacheStats,
    ttl: Duration,
}

impl ResponseCache {
    // == Constructor ==
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    // == Get ==
    /// Returns the cached value if present and younger than the TTL.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, signature: &Signature) -> Option<Value> {
        let expired = match self.entries.get(signature) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(self.ttl),
        };

        if expired {
            self.entries.remove(signature);
            self.stats.record_expiration();
            debug!("Cache entry expired: {}", signature);
            return None;
        }

        self.stats.record_hit();
        self.entries.get(signature).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores `value`, replacing any entry for the same signature and
    /// restarting its TTL.
    pub fn put(&mut self, signature: Signature, value: Value) {
        self.entries.insert(signature, CacheEntry::new(value));
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, including ones not yet found expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
