//! Response DTOs for the HTTP surface
//!
//! Defines the structure of outgoing response bodies.

use serde::Serialize;

use crate::cache::{CacheKey, StoredValue};
use crate::instrument::{CallRecord, Replay};

/// Response body for POST /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: CacheKey,
}

impl StoreResponse {
    pub fn new(key: CacheKey) -> Self {
        Self { key }
    }
}

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The decoded value
    pub value: StoredValue,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: StoredValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for GET /replay/:operation
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub operation: String,
    /// Counter value
    pub calls: u64,
    /// Recorded calls, oldest first
    pub entries: Vec<CallRecord>,
    /// The trace as printed text
    pub trace: String,
}

impl From<Replay> for ReplayResponse {
    fn from(replay: Replay) -> Self {
        let trace = replay.to_string();
        Self {
            operation: replay.operation,
            calls: replay.calls,
            entries: replay.entries,
            trace,
        }
    }
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub content: String,
    /// Fetches executed for this URL so far
    pub access_count: u64,
}

/// Response body for GET /count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub url: String,
    pub access_count: u64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
