//! Error types for the caching facade
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the facade, instrumentation and page cache.
///
/// A missing key is not an error: reads return `Option` instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport or connection failure talking to the key-value store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store holds a value of another kind under this key
    #[error("Wrong kind of value at key: {0}")]
    WrongType(String),

    /// Stored bytes do not match the requested scalar interpretation
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// Replay requested for an operation that was never counted
    #[error("No history recorded for operation: {0}")]
    NoHistoryRecorded(String),

    /// The remote fetch behind the page cache failed
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Arguments or results could not be rendered for the history log
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key not found (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data (HTTP surface only)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.code() == Some("WRONGTYPE") {
            CacheError::WrongType(err.to_string())
        } else {
            CacheError::StoreUnavailable(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::NoHistoryRecorded(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::DecodeFailure(_) | CacheError::WrongType(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
