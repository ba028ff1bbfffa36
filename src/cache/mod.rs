//! Cache Module
//!
//! The caching facade: generated keys, scalar payloads and typed reads.

mod facade;
mod value;


// Re-export public types
pub use facade::{Cache, STORE_OPERATION};
pub use value::{decode, CacheKey, DecodeError, StoredValue, ValueKind};
