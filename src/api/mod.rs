//! API Module
//!
//! HTTP handlers and routing over the facade and page cache.
//!
//! # Endpoints
//! - `POST /store` - Store a scalar under a generated key
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /replay/:operation` - Recorded trace of an operation
//! - `GET /page?url=` - Cached remote page
//! - `GET /count?url=` - Remote fetch count for a page
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
