//! Memory Store Module
//!
//! In-process keyspace with TTL expiration, exposed through the
//! `KeyValueStore` trait with Redis-compatible semantics.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreEntry, StoredData, MIN_EXPIRY};
use crate::error::{CacheError, Result};

// == Keyspace ==
/// Key-value storage with per-entry expiry.
///
/// Expired entries are treated as absent on access and removed lazily,
/// or in bulk by `cleanup_expired`.
#[derive(Debug, Default)]
pub struct Keyspace {
    entries: HashMap<String, StoreEntry>,
}

impl Keyspace {
    // == Constructor ==
    /// Creates an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    // == Live Entry ==
    /// Returns the entry under `key` unless it is missing or expired.
    /// Expired entries are dropped on the way.
    fn live_entry(&mut self, key: &str) -> Option<&mut StoreEntry> {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }

    // == Set ==
    /// Stores a value, replacing any previous value and TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The bytes to store
    /// * `ttl` - Optional expiry measured from now
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: Option<Duration>) {
        self.entries
            .insert(key, StoreEntry::new(StoredData::Bytes(value), ttl));
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` for missing or expired keys and `WrongType` when the
    /// key holds a list.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.live_entry(key) {
            Some(StoreEntry {
                data: StoredData::Bytes(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    // == Increment ==
    /// Adds one to the decimal counter under `key`.
    ///
    /// A missing key starts from zero. The counter keeps any expiry it
    /// already had.
    pub fn increment(&mut self, key: &str) -> Result<i64> {
        if self.live_entry(key).is_none() {
            self.set(key.to_string(), b"0".to_vec(), None);
        }

        let Some(StoredData::Bytes(raw)) = self.entries.get_mut(key).map(|entry| &mut entry.data)
        else {
            return Err(CacheError::WrongType(key.to_string()));
        };

        let current: i64 = std::str::from_utf8(raw)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| CacheError::WrongType(key.to_string()))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::WrongType(key.to_string()))?;

        *raw = next.to_string().into_bytes();
        Ok(next)
    }

    // == Append To List ==
    /// Pushes `value` onto the tail of the list under `key`, creating the
    /// list if needed. Returns the new length.
    pub fn append_to_list(&mut self, key: &str, value: Vec<u8>) -> Result<usize> {
        if self.live_entry(key).is_none() {
            self.entries.insert(
                key.to_string(),
                StoreEntry::new(StoredData::List(Vec::new()), None),
            );
        }

        match self.entries.get_mut(key).map(|entry| &mut entry.data) {
            Some(StoredData::List(items)) => {
                items.push(value);
                Ok(items.len())
            }
            _ => Err(CacheError::WrongType(key.to_string())),
        }
    }

    // == Read List ==
    /// Returns the inclusive slice `start..=end` of the list under `key`.
    ///
    /// Negative indices count from the tail. Out-of-range bounds are
    /// clamped and a missing key reads as an empty list.
    pub fn read_list(&mut self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
        match self.live_entry(key) {
            Some(StoreEntry {
                data: StoredData::List(items),
                ..
            }) => Ok(match list_bounds(items.len(), start, end) {
                Some((first, last)) => items[first..=last].to_vec(),
                None => Vec::new(),
            }),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    // == Flush ==
    /// Removes every entry.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the keyspace.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the keyspace holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves inclusive list bounds the way LRANGE does.
fn list_bounds(len: usize, start: isize, end: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { len + end } else { end.min(len - 1) };

    if start > end || start >= len {
        return None;
    }
    Some((start as usize, end as usize))
}

// == Memory Store ==
/// Shared handle to a `Keyspace`, usable wherever a `KeyValueStore` is.
///
/// Each trait call takes the lock once, so every single operation is
/// atomic while sequences of operations are not.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keyspace: Arc<RwLock<Keyspace>>,
}

impl MemoryStore {
    /// Creates a store over an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the underlying keyspace, for the background sweeper.
    pub fn keyspace(&self) -> Arc<RwLock<Keyspace>> {
        Arc::clone(&self.keyspace)
    }

    /// Returns the number of entries currently held.
    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.keyspace.write().await.set(key.to_string(), value, None);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: reads may drop an expired entry
        self.keyspace.write().await.get(key)
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        self.keyspace.write().await.increment(key)
    }

    async fn append_to_list(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.keyspace.write().await.append_to_list(key, value)
    }

    async fn read_list(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
        self.keyspace.write().await.read_list(key, start, end)
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: Vec<u8>) -> Result<()> {
        self.keyspace
            .write()
            .await
            .set(key.to_string(), value, Some(ttl.max(MIN_EXPIRY)));
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.keyspace.write().await.flush();
        Ok(())
    }
}
