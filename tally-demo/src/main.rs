use shared::config::Config;
use std::sync::Arc;
use storage_redis::RedisStore;
use tally::{Cache, KeyValueStore, replay};
use tracing::{Level, info};
use webcache::{HttpFetcher, PageCache};

const DEMO_URL: &str = "https://example.com/";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // Load environment variables
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();

    info!("Connecting to {}", config.redis_url);
    let store = Arc::new(RedisStore::connect(&config.redis_url).await?);

    // Start from an empty database so the transcript below covers
    // exactly the calls made here
    store.flush_db().await?;

    let cache = Cache::new(store.clone());

    cache.store(b"first").await?;
    cache.store(b"second").await?;
    cache.store(b"third").await?;
    print!("{}", replay(cache.store_log()).await?);

    let key = cache.store("bar").await?;
    info!("text round-trip: {:?}", cache.get_str(&key).await?);
    let key = cache.store(123i64).await?;
    info!("number round-trip: {:?}", cache.get_int(&key).await?);

    let pages = PageCache::new(
        store.clone(),
        Arc::new(HttpFetcher::new()),
        config.page_ttl,
    );

    info!("Fetching {DEMO_URL}");
    let body = pages.get_page(DEMO_URL).await;
    info!("received {} bytes", body.len());

    // Inside the TTL window this request is served from the store
    let body = pages.get_page(DEMO_URL).await;
    info!("received {} bytes without a network call", body.len());

    info!(
        "access count for {DEMO_URL}: {}",
        pages.access_count(DEMO_URL).await?
    );

    Ok(())
}
