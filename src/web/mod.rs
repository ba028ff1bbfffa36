//! Web Module
//!
//! Remote page fetching and its TTL cache with access counting.

mod fetcher;
mod page_cache;

pub use fetcher::{Fetcher, HttpFetcher, SharedFetcher};
pub use page_cache::{cached_key, count_key, ResourceCache, DEFAULT_PAGE_TTL};
