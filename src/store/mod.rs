//! Key-Value Store Module
//!
//! The storage boundary the facade talks to, plus its bindings: an
//! in-process keyspace with TTL expiry and a Redis client.

mod entry;
mod memory;
mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

// Re-export public types
pub use entry::{current_timestamp_ms, StoreEntry, StoredData};
pub use memory::{Keyspace, MemoryStore};
pub use redis_store::RedisStore;

// == Key-Value Store ==
/// Key-addressed storage with atomic single-key primitives.
///
/// Every method is one round trip. Sequences of calls are not
/// transactional, so callers composing several of them must tolerate
/// partial effects.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Writes `value` under `key`, replacing any previous value and expiry.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Reads the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Adds one to the decimal counter under `key` (absent counts as 0)
    /// and returns the new value.
    async fn increment(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the tail of the list under `key` and returns the
    /// new list length.
    async fn append_to_list(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns list elements between `start` and `end`, both inclusive.
    /// Negative indices count from the tail (`-1` is the last element).
    async fn read_list(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>>;

    /// Writes `value` under `key`, expiring it `ttl` from now with
    /// millisecond precision. `ttl` is raised to `MIN_EXPIRY` if shorter.
    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: Vec<u8>) -> Result<()>;

    /// Removes every key from the store.
    async fn flush(&self) -> Result<()>;
}

/// Shortest expiry a binding applies; shorter TTLs, zero included, are
/// raised to it.
pub const MIN_EXPIRY: Duration = Duration::from_millis(1);

/// Store handle shared between the facade, the page cache and handlers.
pub type SharedStore = Arc<dyn KeyValueStore>;

// == Read Counter ==
/// Reads a counter written by `increment`, or `None` if the key is absent.
///
/// Counters are stored as decimal text, the same form Redis uses for INCR.
pub async fn read_counter(store: &dyn KeyValueStore, key: &str) -> Result<Option<u64>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    std::str::from_utf8(&raw)
        .ok()
        .and_then(|text| text.parse().ok())
        .map(Some)
        .ok_or_else(|| CacheError::DecodeFailure(format!("{key} does not hold a counter")))
}
