use crate::ports::{PageFetcher, PageStore};
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Expiring page-fetch cache over injected store and fetcher handles.
///
/// A URL is either cached or not: a cached body is returned without a
/// network call, a miss fetches and writes the body back with the
/// configured time-to-live. The per-URL access counter increments on
/// every request, hit or miss alike.
pub struct PageCache {
    store: Arc<dyn PageStore>,
    fetcher: Arc<dyn PageFetcher>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(store: Arc<dyn PageStore>, fetcher: Arc<dyn PageFetcher>, ttl: Duration) -> Self {
        Self {
            store,
            fetcher,
            ttl,
        }
    }

    /// Return the body of `url`, from cache when possible.
    ///
    /// Never fails: network and store failures come back as an error
    /// string in place of the body. A failed fetch writes no cache entry,
    /// so the next call retries.
    pub async fn get_page(&self, url: &str) -> String {
        match self.fetch_with_cache(url).await {
            Ok(body) => body,
            Err(Error::Fetch(reason)) => {
                warn!("could not retrieve {url}: {reason}");
                format!("Error: could not retrieve content from {url}")
            }
            Err(e) => {
                warn!("store unavailable while serving {url}: {e}");
                "Error: key-value store is unavailable".to_string()
            }
        }
    }

    /// How many times `url` has been requested through the cache.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => std::str::from_utf8(&raw)
                .map_err(|e| Error::Decode(e.to_string()))?
                .parse::<u64>()
                .map_err(|e| Error::Decode(e.to_string())),
            None => Ok(0),
        }
    }

    async fn fetch_with_cache(&self, url: &str) -> Result<String> {
        self.store.incr(&count_key(url)).await?;

        if let Some(cached) = self.store.get(url).await? {
            debug!("cache hit for {url}");
            return Ok(String::from_utf8_lossy(&cached).into_owned());
        }

        debug!("cache miss for {url}, fetching");
        let body = self.fetcher.fetch(url).await?;
        self.store
            .set_ex(url, body.clone().into_bytes(), self.ttl)
            .await?;
        Ok(body)
    }
}

fn count_key(url: &str) -> String {
    format!("count:{url}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Instant;
    use tokio::time::sleep;

    const URL: &str = "http://example.com/page";

    /// In-memory store honoring `set_ex` deadlines, test use only.
    #[derive(Default)]
    struct MemoryPageStore {
        entries: Mutex<HashMap<String, (Vec<u8>, Option<Instant>)>>,
    }

    #[async_trait]
    impl PageStore for MemoryPageStore {
        async fn incr(&self, key: &str) -> Result<i64> {
            let mut entries = self.entries.lock().unwrap();
            let next = match entries.get(key) {
                Some((raw, _)) => {
                    std::str::from_utf8(raw)
                        .expect("counter is utf-8")
                        .parse::<i64>()
                        .expect("counter is numeric")
                        + 1
                }
                None => 1,
            };
            entries.insert(key.to_string(), (next.to_string().into_bytes(), None));
            Ok(next)
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            let mut entries = self.entries.lock().unwrap();
            let expired = matches!(
                entries.get(key),
                Some((_, Some(deadline))) if *deadline <= Instant::now()
            );
            if expired {
                entries.remove(key);
            }
            Ok(entries.get(key).map(|(raw, _)| raw.clone()))
        }

        async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value, Some(Instant::now() + ttl)));
            Ok(())
        }
    }

    /// Store whose every operation fails, test use only.
    struct BrokenStore;

    #[async_trait]
    impl PageStore for BrokenStore {
        async fn incr(&self, _key: &str) -> Result<i64> {
            Err(Error::Store("connection reset".to_string()))
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(Error::Store("connection reset".to_string()))
        }

        async fn set_ex(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
            Err(Error::Store("connection reset".to_string()))
        }
    }

    struct FakeFetcher {
        body: Mutex<String>,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn serving(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Mutex::new(body.to_string()),
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            let fetcher = Self::serving("");
            fetcher.set_failing(true);
            fetcher
        }

        fn set_body(&self, body: &str) {
            *self.body.lock().unwrap() = body.to_string();
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(Error::Fetch(format!("connection refused: {url}")));
            }
            Ok(self.body.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_second_request_within_ttl_skips_the_network() {
        let fetcher = FakeFetcher::serving("<html>hello</html>");
        let cache = PageCache::new(
            Arc::new(MemoryPageStore::default()),
            fetcher.clone(),
            Duration::from_secs(60),
        );

        assert_eq!(cache.get_page(URL).await, "<html>hello</html>");
        assert_eq!(cache.get_page(URL).await, "<html>hello</html>");

        // One network call, but the access counter saw both requests
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(cache.access_count(URL).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_fetched_again() {
        let fetcher = FakeFetcher::serving("v1");
        let cache = PageCache::new(
            Arc::new(MemoryPageStore::default()),
            fetcher.clone(),
            Duration::from_millis(50),
        );

        assert_eq!(cache.get_page(URL).await, "v1");

        // Let the entry expire, then serve new content from the fetcher
        sleep(Duration::from_millis(80)).await;
        fetcher.set_body("v2");

        assert_eq!(cache.get_page(URL).await, "v2");
        assert_eq!(fetcher.calls(), 2);

        // The refreshed entry is cached again
        assert_eq!(cache.get_page(URL).await, "v2");
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_error_string_and_caches_nothing() {
        let fetcher = FakeFetcher::failing();
        let cache = PageCache::new(
            Arc::new(MemoryPageStore::default()),
            fetcher.clone(),
            Duration::from_secs(60),
        );

        let body = cache.get_page(URL).await;
        assert_eq!(body, format!("Error: could not retrieve content from {URL}"));
        assert_eq!(cache.access_count(URL).await.unwrap(), 1);

        // Failures are not sticky: once the fetcher recovers, the next
        // request goes back to the network and succeeds.
        fetcher.set_failing(false);
        fetcher.set_body("recovered");

        assert_eq!(cache.get_page(URL).await, "recovered");
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_returns_error_string() {
        let fetcher = FakeFetcher::serving("unreachable");
        let cache = PageCache::new(Arc::new(BrokenStore), fetcher.clone(), Duration::from_secs(60));

        let body = cache.get_page(URL).await;
        assert_eq!(body, "Error: key-value store is unavailable");
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_access_count_is_zero_for_an_unseen_url() {
        let cache = PageCache::new(
            Arc::new(MemoryPageStore::default()),
            FakeFetcher::serving(""),
            Duration::from_secs(60),
        );

        assert_eq!(cache.access_count(URL).await.unwrap(), 0);
    }
}
