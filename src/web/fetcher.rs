//! Fetcher Module
//!
//! The remote-fetch boundary behind the page cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};

// == Fetcher ==
/// Retrieves the content behind an identifier, typically a URL.
///
/// May be slow or fail; content is opaque text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}

/// Fetcher handle shared across handlers.
pub type SharedFetcher = Arc<dyn Fetcher>;

// == HTTP Fetcher ==
/// One GET per call, body returned as text.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CacheError::FetchFailed(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "Fetching remote page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| CacheError::FetchFailed(format!("{url}: {err}")))?;

        response
            .text()
            .await
            .map_err(|err| CacheError::FetchFailed(format!("{url}: {err}")))
    }
}
