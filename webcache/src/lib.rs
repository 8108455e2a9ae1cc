// webcache/src/lib.rs
//
// Expiring page-fetch cache: memoizes fetched page bodies in an external
// key-value store with a fixed time-to-live and tracks per-URL access
// counts.

pub mod fetch;
pub mod page_cache;
pub mod ports;

pub use fetch::HttpFetcher;
pub use page_cache::PageCache;
pub use ports::{PageFetcher, PageStore};
