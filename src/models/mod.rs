//! Request and Response models for the HTTP surface
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{GetQuery, PageQuery, StoreRequest};
pub use responses::{
    CountResponse, GetResponse, HealthResponse, PageResponse, ReplayResponse, StoreResponse,
};
