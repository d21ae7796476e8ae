//! In-memory paste store backed by the cache engine.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::StoreResult;

use super::PasteStore;

/// Cloneable handle to a shared [`CacheStore`].
#[derive(Clone)]
pub struct MemoryStore {
    cache: Arc<RwLock<CacheStore>>,
}

impl MemoryStore {
    /// Creates a store holding at most `quota_bytes` for `ttl` seconds each.
    pub fn new(quota_bytes: usize, ttl: u64) -> Self {
        Self {
            cache: Arc::new(RwLock::new(CacheStore::new(quota_bytes, ttl))),
        }
    }

    /// Drops expired entries, returning how many went.
    pub async fn cleanup_expired(&self) -> usize {
        self.cache.write().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}

#[async_trait]
impl PasteStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Bytes>> {
        // Write lock: a hit reorders the LRU
        Ok(self.cache.write().await.get(id))
    }

    async fn set(&self, id: &str, content: Bytes) -> StoreResult<()> {
        self.cache.write().await.set(id.to_string(), content)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self.cache.write().await.delete(id))
    }
}
