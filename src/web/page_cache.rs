//! Page Cache Module
//!
//! TTL cache in front of a `Fetcher`, counting how often the fetch
//! actually runs for each identifier.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::Fetcher;
use crate::cache::decode;
use crate::error::{CacheError, Result};
use crate::store::{read_counter, SharedStore};

/// Default lifetime of a cached page.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

/// Store key holding the cached content for `url`.
pub fn cached_key(url: &str) -> String {
    format!("cached:{url}")
}

/// Store key counting executed fetches for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{url}")
}

// == Resource Cache ==
/// Wraps a fetcher with a store-backed TTL cache.
///
/// A hit returns the cached content without fetching or counting. A miss
/// fetches, bumps `count:{url}`, then caches the content for `ttl`.
/// Lookup and insert are separate round trips, so concurrent misses on
/// one URL may both fetch and both count. Expiry is left to the store.
pub struct ResourceCache<F> {
    store: SharedStore,
    fetcher: F,
    ttl: Duration,
}

impl<F: Fetcher> ResourceCache<F> {
    // == Constructor ==
    /// Creates a cache applying the same `ttl` to every inserted page.
    pub fn new(store: SharedStore, fetcher: F, ttl: Duration) -> Self {
        Self {
            store,
            fetcher,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Fetch Cached ==
    /// Returns the content for `url`, from cache when fresh.
    ///
    /// A failed fetch is returned as is and leaves the counter and cache
    /// untouched.
    pub async fn fetch_cached(&self, url: &str) -> Result<String> {
        let key = cached_key(url);

        if let Some(raw) = self.store.get(&key).await? {
            debug!(url, "Page cache hit");
            return decode::utf8(&raw)
                .map_err(|err| CacheError::DecodeFailure(format!("{key}: {err}")));
        }

        debug!(url, "Page cache miss");
        let content = self.fetcher.fetch(url).await?;

        self.store.increment(&count_key(url)).await?;
        self.store
            .set_with_expiry(&key, self.ttl, content.clone().into_bytes())
            .await?;

        Ok(content)
    }

    // == Access Count ==
    /// Number of fetches executed for `url`, 0 if never fetched.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        Ok(read_counter(self.store.as_ref(), &count_key(url))
            .await?
            .unwrap_or(0))
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for ResourceCache<F> {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetch_cached(url).await
    }
}
