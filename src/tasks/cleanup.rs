//! Expiry Sweep Task
//!
//! Periodically drops expired pastes from the in-memory store so memory is
//! returned even for pastes nobody reads again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a task sweeping expired entries out of `store` every
/// `interval_secs` seconds.
///
/// The returned handle should be aborted on shutdown.
pub fn spawn_cleanup_task(store: MemoryStore, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting expiry sweep every {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                let stats = store.stats().await;
                info!(
                    "Expiry sweep: removed {} pastes, {} left using {} bytes, hit rate {:.1}%",
                    removed,
                    stats.total_entries,
                    stats.used_bytes,
                    stats.hit_rate() * 100.0
                );
            } else {
                debug!("Expiry sweep: nothing expired");
            }
        }
    })
}
