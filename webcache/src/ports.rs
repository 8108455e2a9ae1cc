use async_trait::async_trait;
use shared::Result;
use std::time::Duration;

/// The slice of the backing store the page cache needs: counters, reads,
/// and expiring writes. Expiry is the store's own, not ours.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Atomically increment the numeric value at `key`, returning the new count.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Read the value stored under `key`. Absent or expired keys are `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key` with a time-to-live, after which the
    /// store drops the key on its own.
    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
}

/// Port for retrieving a page body over the network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body. Transport failures and
    /// non-success statuses are both errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}
