//! Fetch client module
//!
//! HTTP client for the paginated fetch service. It is the production
//! [`PageSource`](crate::loader::PageSource) behind the incremental loader.
//!
//! # Features
//!
//! - **Page fetches**: `GET /products/search?from=&limit=[&query=]`
//! - **Rate Limiting**: Optional token bucket on outbound requests using governor
//! - **Fail fast**: No retries; the loader treats any failure as end-of-data

mod feed;
mod rate_limit;

pub use feed::{FeedClient, FeedClientConfig, FeedClientConfigBuilder, SEARCH_PATH};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
