//! Cache Entry Module
//!
//! Defines a single stored paste body with its expiry metadata.

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};

/// Longest lifetime an entry can be given (100 years).
const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

// == Cache Entry ==
/// A stored value together with the key-independent metadata the engine needs.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Bytes,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` from now.
    pub fn new(value: Bytes, ttl_seconds: u64) -> Self {
        Self::written_at(value, ttl_seconds, Utc::now())
    }

    /// Creates an entry as if it had been written at `now`.
    pub fn written_at(value: Bytes, ttl_seconds: u64, now: DateTime<Utc>) -> Self {
        let ttl = Duration::seconds(ttl_seconds.min(MAX_TTL_SECONDS) as i64);

        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`CacheEntry::is_expired`] against an explicit clock reading.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    // == Size ==
    /// Bytes this entry charges against the quota when stored under `key`.
    pub fn charged_size(&self, key: &str) -> usize {
        key.len() + self.value.len()
    }
}
