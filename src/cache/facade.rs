//! Cache Facade Module
//!
//! Stores scalar payloads under generated keys and reads them back
//! through caller-chosen decoders.

use std::fmt::Display;

use async_trait::async_trait;
use tracing::debug;

use super::value::{decode, CacheKey, StoredValue, ValueKind};
use crate::error::{CacheError, Result};
use crate::instrument::{
    history_status, replay, CallHistory, CountCalls, HistoryStatus, Operation, Replay,
};
use crate::store::SharedStore;

/// Operation name under which `Cache::store` is counted and recorded.
pub const STORE_OPERATION: &str = "Cache.store";

// == Store Data ==
/// The bare store operation: one key, one SET.
struct StoreData {
    store: SharedStore,
}

#[async_trait]
impl Operation<StoredValue> for StoreData {
    type Output = CacheKey;

    fn name(&self) -> &str {
        STORE_OPERATION
    }

    async fn call(&self, data: StoredValue) -> Result<CacheKey> {
        let key = CacheKey::generate();
        self.store.set(key.as_str(), data.to_bytes()).await?;
        Ok(key)
    }
}

// == Cache ==
/// Facade over a shared key-value store.
///
/// `store` is wrapped with call history (outer) and call counting
/// (inner), so every call shows up in `replay(STORE_OPERATION)`.
/// Reads are not instrumented. The facade never deletes keys.
pub struct Cache {
    store: SharedStore,
    store_op: CallHistory<CountCalls<StoreData>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a facade over `store`. Existing data is left in place; call
    /// `flush` for a clean slate.
    pub fn new(store: SharedStore) -> Self {
        let store_op = CallHistory::new(
            store.clone(),
            CountCalls::new(
                store.clone(),
                StoreData {
                    store: store.clone(),
                },
            ),
        );

        Self { store, store_op }
    }

    /// Returns the store this facade writes to.
    pub fn backend(&self) -> &SharedStore {
        &self.store
    }

    // == Flush ==
    /// Empties the whole store, counters and history included.
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    // == Store ==
    /// Writes `data` under a fresh key and returns the key.
    pub async fn store(&self, data: impl Into<StoredValue>) -> Result<CacheKey> {
        let key = self.store_op.call(data.into()).await?;
        debug!(key = %key, "Stored value");
        Ok(key)
    }

    // == Get ==
    /// Returns the raw bytes under `key`, or `None` if absent.
    pub async fn get(&self, key: impl AsRef<str>) -> Result<Option<Vec<u8>>> {
        self.store.get(key.as_ref()).await
    }

    /// Returns the value under `key` transformed by `decode`, or `None` if
    /// absent. Errors from `decode` surface as `DecodeFailure`.
    pub async fn get_with<T, E, D>(&self, key: impl AsRef<str>, decode: D) -> Result<Option<T>>
    where
        D: FnOnce(&[u8]) -> std::result::Result<T, E>,
        E: Display,
    {
        let key = key.as_ref();
        match self.store.get(key).await? {
            Some(raw) => decode(&raw)
                .map(Some)
                .map_err(|err| CacheError::DecodeFailure(format!("{key}: {err}"))),
            None => Ok(None),
        }
    }

    /// Reads the value under `key` as UTF-8 text.
    pub async fn get_as_string(&self, key: impl AsRef<str>) -> Result<Option<String>> {
        self.get_with(key, decode::utf8).await
    }

    /// Reads the value under `key` as an eight-byte big-endian integer.
    pub async fn get_as_integer(&self, key: impl AsRef<str>) -> Result<Option<i64>> {
        self.get_with(key, decode::integer).await
    }

    /// Reads the value under `key` as an eight-byte big-endian float.
    pub async fn get_as_float(&self, key: impl AsRef<str>) -> Result<Option<f64>> {
        self.get_with(key, decode::float).await
    }

    /// Reads the value under `key` as raw bytes.
    pub async fn get_as_bytes(&self, key: impl AsRef<str>) -> Result<Option<Vec<u8>>> {
        self.get_with(key, decode::raw).await
    }

    /// Reads the value under `key` with the decoder for `kind`.
    pub async fn get_as(
        &self,
        key: impl AsRef<str>,
        kind: ValueKind,
    ) -> Result<Option<StoredValue>> {
        self.get_with(key, |raw| kind.decode(raw)).await
    }

    // == Instrumentation ==
    /// Reads the recorded trace of `operation` from this facade's store.
    pub async fn replay(&self, operation: &str) -> Result<Replay> {
        replay(self.store.as_ref(), operation).await
    }

    /// Reads counter and history sizes of `operation`.
    pub async fn history_status(&self, operation: &str) -> Result<HistoryStatus> {
        history_status(self.store.as_ref(), operation).await
    }
}
