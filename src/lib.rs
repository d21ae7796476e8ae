//! Vaporbin - a command line pastebin whose contents evaporate
//!
//! Pastes live in an expiring cache (memcached, or an in-process LRU cache
//! during development) for at most a day and are addressed by short random
//! identifiers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod id;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use id::{IdGenerator, IdPolicy};
pub use store::{MemcachedStore, MemoryStore, PasteStore};
pub use tasks::spawn_cleanup_task;
