//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::web::DEFAULT_PAGE_TTL;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL; the in-memory store is used when unset
    pub redis_url: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Lifetime in seconds of cached remote pages
    pub page_cache_ttl: u64,
    /// Timeout in seconds for a single remote fetch
    pub fetch_timeout: u64,
    /// Background cleanup task interval in seconds (in-memory store only)
    pub cleanup_interval: u64,
    /// Empty the store before serving
    pub flush_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis URL, e.g. `redis://127.0.0.1/` (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PAGE_CACHE_TTL` - Cached page lifetime in seconds (default: 10)
    /// - `FETCH_TIMEOUT` - Remote fetch timeout in seconds (default: 30)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `FLUSH_ON_START` - `true` to empty the store at start-up (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            page_cache_ttl: parse_var("PAGE_CACHE_TTL").unwrap_or(defaults.page_cache_ttl),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            flush_on_start: parse_var("FLUSH_ON_START").unwrap_or(defaults.flush_on_start),
        }
    }

    /// Cached page lifetime as a Duration.
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_cache_ttl)
    }

    /// Remote fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            server_port: 3000,
            page_cache_ttl: DEFAULT_PAGE_TTL.as_secs(),
            fetch_timeout: 30,
            cleanup_interval: 1,
            flush_on_start: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.redis_url.is_none());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_cache_ttl, 10);
        assert_eq!(config.page_ttl(), Duration::from_secs(10));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.cleanup_interval, 1);
        assert!(!config.flush_on_start);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("REDIS_URL");
        env::remove_var("SERVER_PORT");
        env::remove_var("PAGE_CACHE_TTL");
        env::remove_var("FETCH_TIMEOUT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("FLUSH_ON_START");

        let config = Config::from_env();
        assert!(config.redis_url.is_none());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_cache_ttl, 10);
        assert_eq!(config.fetch_timeout, 30);
        assert_eq!(config.cleanup_interval, 1);
        assert!(!config.flush_on_start);
    }
}
