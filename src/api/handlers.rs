//! API Handlers
//!
//! HTTP request handlers exposing the facade, replay and page cache.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CountResponse, GetQuery, GetResponse, HealthResponse, PageQuery, PageResponse,
    ReplayResponse, StoreRequest, StoreResponse,
};
use crate::store::SharedStore;
use crate::web::{HttpFetcher, ResourceCache, SharedFetcher};

/// Application state shared across all handlers.
///
/// The facade and the page cache share one store.
#[derive(Clone)]
pub struct AppState {
    /// Instrumented caching facade
    pub cache: Arc<Cache>,
    /// TTL cache in front of the remote fetcher
    pub pages: Arc<ResourceCache<SharedFetcher>>,
}

impl AppState {
    /// Creates a new AppState over `store` with the given fetcher.
    pub fn new(store: SharedStore, fetcher: SharedFetcher, page_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(Cache::new(store.clone())),
            pages: Arc::new(ResourceCache::new(store, fetcher, page_ttl)),
        }
    }

    /// Creates a new AppState from configuration, fetching pages over HTTP.
    pub fn from_config(config: &Config, store: SharedStore) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Ok(Self::new(store, Arc::new(fetcher), config.page_ttl()))
    }
}

/// Handler for POST /store
///
/// Stores a scalar under a generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Reads a value back with the decoder named by `?as=`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get_as(&key, query.kind)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded trace of an instrumented operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let replay = state.cache.replay(&operation).await?;
    Ok(Json(replay.into()))
}

/// Handler for GET /page?url=
///
/// Returns the page content, cached for the configured TTL.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.pages.fetch_cached(&query.url).await?;
    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /count?url=
///
/// Returns how many times the page was actually fetched.
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let access_count = state.pages.access_count(&query.url).await?;
    Ok(Json(CountResponse {
        url: query.url,
        access_count,
    }))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
