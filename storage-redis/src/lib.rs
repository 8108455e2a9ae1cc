// storage-redis/src/lib.rs
//
// Redis adapter for the store ports. Native commands only: no retry, no
// validation, no error translation beyond carrying the driver message.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use shared::{Error, Result};
use std::time::Duration;
use tally::ports::KeyValueStore;
use webcache::ports::PageStore;

/// Redis-backed store handle. One multiplexed connection is established
/// up front and reused for the process lifetime.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the store at `url`. A connection failure here is a
    /// startup error for the caller to surface, not something to limp
    /// past with no usable connection.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(store_err)?;
        let conn = ConnectionManager::new(client).await.map_err(store_err)?;
        Ok(Self { conn })
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

fn store_err(e: redis::RedisError) -> Error {
    Error::Store(e.to_string())
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn();
        conn.get(key).await.map_err(store_err)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn();
        conn.set(key, value).await.map_err(store_err)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn();
        conn.incr(key, 1).await.map_err(store_err)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn();
        let _: i64 = conn.rpush(key, value).await.map_err(store_err)?;
        Ok(())
    }

    async fn lrange(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn();
        conn.lrange(key, 0, -1).await.map_err(store_err)
    }

    async fn flush_db(&self) -> Result<()> {
        let mut conn = self.conn();
        redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(store_err)
    }
}

#[async_trait]
impl PageStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        KeyValueStore::incr(self, key).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        KeyValueStore::get(self, key).await
    }

    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn();
        conn.set_ex(key, value, ttl.as_secs())
            .await
            .map_err(store_err)
    }
}
