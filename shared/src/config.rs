use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub redis_url: String,
    pub page_ttl: Duration,
}

impl Config {
    const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";
    const DEFAULT_PAGE_TTL_SECS: u64 = 10;

    pub fn from_env() -> Self {
        let redis_url = std::env::var("TALLY_REDIS_URL")
            .unwrap_or_else(|_| Self::DEFAULT_REDIS_URL.to_string());
        let page_ttl_secs = std::env::var("TALLY_PAGE_TTL_SECS")
            .ok()
            .and_then(|raw| match raw.parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!("TALLY_PAGE_TTL_SECS is not a number, using default");
                    None
                }
            })
            .unwrap_or(Self::DEFAULT_PAGE_TTL_SECS);

        Self {
            redis_url,
            page_ttl: Duration::from_secs(page_ttl_secs),
        }
    }
}
