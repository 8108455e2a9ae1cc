use async_trait::async_trait;
use shared::Result;

// Ports are the pluggable extension points for backing store clients

/// Port over the backing key-value store's native primitives.
///
/// Atomicity of `incr` and ordering of `rpush`/`lrange` are the store's
/// own guarantees; implementations add no coordination of their own.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. Absent keys are `None`, not an error.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Atomically increment the numeric value at `key`, returning the new count.
    /// A missing key counts as zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Append `value` to the ordered list stored at `key`.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Read the full ordered list stored at `key`, oldest entry first.
    async fn lrange(&self, key: &str) -> Result<Vec<Vec<u8>>>;

    /// Drop every key in the current database.
    async fn flush_db(&self) -> Result<()>;
}
