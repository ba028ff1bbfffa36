//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from the
//! in-memory keyspace.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::Keyspace;

/// Spawns a background task that periodically sweeps expired entries.
///
/// Reads already treat expired entries as absent; the sweep only bounds
/// memory held by keys nobody reads again (cached pages, mostly).
///
/// # Arguments
/// * `keyspace` - Shared keyspace, as returned by `MemoryStore::keyspace`
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle that can be aborted during graceful shutdown.
pub fn spawn_cleanup_task(
    keyspace: Arc<RwLock<Keyspace>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = keyspace.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
