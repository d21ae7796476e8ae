//! Paste Store Module
//!
//! The [`PasteStore`] port the router talks to, with two adapters:
//! - [`MemoryStore`]: in-process expiring LRU cache, for development and tests
//! - [`MemcachedStore`]: external memcached server, for production

mod memcached;
mod memory;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;

pub use memcached::{MemcachedStore, DEFAULT_ADDR as DEFAULT_MEMCACHED_ADDR};
pub use memory::MemoryStore;

/// Lifetime of a paste, in seconds (one day).
pub const DEFAULT_TTL_SECONDS: u64 = 60 * 60 * 24;

// == Paste Store ==
/// Expiring key-value storage for paste bodies.
///
/// Implementations apply one fixed TTL to every `set`.
#[async_trait]
pub trait PasteStore: Send + Sync {
    /// Returns the content stored under `id`, if any.
    async fn get(&self, id: &str) -> StoreResult<Option<Bytes>>;

    /// Stores `content` under `id`, overwriting silently.
    async fn set(&self, id: &str, content: Bytes) -> StoreResult<()>;

    /// Removes `id`. Returns whether a value existed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}
