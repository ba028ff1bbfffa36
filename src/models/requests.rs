//! Request DTOs for the HTTP surface
//!
//! Defines the structure of incoming request bodies and query strings.

use serde::Deserialize;

use crate::cache::{StoredValue, ValueKind};

/// Request body for POST /store
///
/// The value is a bare JSON scalar: a string, an integer, a float, or an
/// array of bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store
    pub value: StoredValue,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    /// Decoder to apply, `str` when omitted
    #[serde(default, rename = "as")]
    pub kind: ValueKind,
}

/// Query string for GET /page and GET /count
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Identifier of the remote page
    pub url: String,
}

impl PageQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }
}
