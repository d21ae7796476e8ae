//! Cache Store Module
//!
//! Byte-quota cache engine: HashMap storage, LRU eviction and TTL expiry.

use std::collections::HashMap;

use bytes::Bytes;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{StoreError, StoreResult};

// == Cache Store ==
/// In-memory expiring cache bounded by total stored bytes.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    /// Maximum bytes (keys + values) held at once
    quota_bytes: usize,
    /// Bytes currently charged against the quota
    used_bytes: usize,
    /// Lifetime given to every entry, in seconds
    ttl: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `quota_bytes` - Upper bound on the bytes of all keys and values
    /// * `ttl` - Lifetime in seconds applied to every `set`
    pub fn new(quota_bytes: usize, ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            quota_bytes,
            used_bytes: 0,
            ttl,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value and resetting
    /// its TTL.
    ///
    /// Least recently used entries are evicted until the new entry fits.
    /// An entry bigger than the whole quota is refused.
    pub fn set(&mut self, key: String, value: Bytes) -> StoreResult<()> {
        let entry = CacheEntry::new(value, self.ttl);
        let size = entry.charged_size(&key);
        if size > self.quota_bytes {
            return Err(StoreError::ValueTooLarge {
                size,
                limit: self.quota_bytes,
            });
        }

        self.remove_entry(&key);

        while self.used_bytes + size > self.quota_bytes {
            let Some(oldest) = self.lru.pop_least_recent() else {
                break;
            };
            if let Some(evicted) = self.entries.remove(&oldest) {
                self.used_bytes -= evicted.charged_size(&oldest);
                self.stats.record_eviction();
            }
        }

        self.used_bytes += size;
        self.lru.touch(&key);
        self.entries.insert(key, entry);
        self.sync_occupancy();

        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`, marking it most recently used.
    ///
    /// An expired entry is dropped on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.sync_occupancy();
        }
        self.stats.record_miss();
        None
    }

    // == Delete ==
    /// Removes `key`. Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        self.sync_occupancy();
        matches!(removed, Some(entry) if !entry.is_expired())
    }

    // == Cleanup Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.sync_occupancy();
        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the engine counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.used_bytes -= entry.charged_size(key);
        Some(entry)
    }

    fn sync_occupancy(&mut self) {
        self.stats.set_occupancy(self.entries.len(), self.used_bytes);
    }
}
