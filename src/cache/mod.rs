//! Cache Module
//!
//! In-memory paste cache with TTL expiration and LRU eviction under a byte
//! quota. Backs [`crate::store::MemoryStore`].

mod entry;
mod lru;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default quota, matching the hosted service's 25 MB
pub const DEFAULT_QUOTA_BYTES: usize = 25 * 1024 * 1024;
