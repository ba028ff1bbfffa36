//! Redis Store Module
//!
//! `KeyValueStore` backed by a Redis server.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::{KeyValueStore, MIN_EXPIRY};
use crate::error::Result;

// == Redis Store ==
/// Redis client binding.
///
/// Holds a reconnecting connection manager; clones share the same
/// underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    // == Constructor ==
    /// Connects to the server at `url` (e.g. `redis://127.0.0.1/`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { connection })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut con = self.connection.clone();
        let _: () = con.set(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut con = self.connection.clone();
        let value: Option<Vec<u8>> = con.get(key).await?;
        Ok(value)
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut con = self.connection.clone();
        let value: i64 = con.incr(key, 1).await?;
        Ok(value)
    }

    async fn append_to_list(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut con = self.connection.clone();
        let len: usize = con.rpush(key, value).await?;
        Ok(len)
    }

    async fn read_list(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
        let mut con = self.connection.clone();
        let items: Vec<Vec<u8>> = con.lrange(key, start, end).await?;
        Ok(items)
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: Vec<u8>) -> Result<()> {
        let mut con = self.connection.clone();
        let millis = u64::try_from(ttl.max(MIN_EXPIRY).as_millis()).unwrap_or(u64::MAX);
        let _: () = con.pset_ex(key, value, millis).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut con = self.connection.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut con).await?;
        Ok(())
    }
}
