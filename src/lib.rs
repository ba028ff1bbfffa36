//! Redis Ledger - An instrumented caching facade over a key-value store
//!
//! Stores scalar payloads under generated keys, counts and records calls
//! to instrumented operations, replays their history, and caches remote
//! pages for a fixed TTL while counting real fetches.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;
pub mod models;
pub mod store;
pub mod tasks;
pub mod web;

pub use api::AppState;
pub use cache::{Cache, CacheKey, StoredValue};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore, RedisStore, SharedStore};
pub use tasks::spawn_cleanup_task;
pub use web::{Fetcher, ResourceCache};
