//! HTTP client for the paginated fetch service
//!
//! Issues one `GET /products/search` per page, without retries. A failed
//! page ends the loader's stream.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::loader::PageSource;
use crate::types::{PageRequest, Product};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Path of the paginated search endpoint
pub const SEARCH_PATH: &str = "/products/search";

/// Configuration for the fetch client
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// Base URL of the service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("scrollfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedClientConfig {
    /// Create a new config builder
    pub fn builder() -> FeedClientConfigBuilder {
        FeedClientConfigBuilder::default()
    }
}

/// Builder for fetch client config
#[derive(Default)]
pub struct FeedClientConfigBuilder {
    config: FeedClientConfig,
}

impl FeedClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> FeedClientConfig {
        self.config
    }
}

/// Client for `GET /products/search`
pub struct FeedClient {
    client: Client,
    config: FeedClientConfig,
    search_url: Url,
    rate_limiter: Option<RateLimiter>,
}

impl FeedClient {
    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(FeedClientConfig::builder().base_url(base_url).build())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: FeedClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let search_url = build_url(&config.base_url, SEARCH_PATH)?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            search_url,
            rate_limiter,
        })
    }

    /// Fetch one page of products
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Product>> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let url = page_url(&self.search_url, request);
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        let products: Vec<Product> = serde_json::from_slice(&body)
            .map_err(|e| Error::decode(format!("Expected a JSON array of products: {e}")))?;

        debug!("Received {} products from {}", products.len(), url);
        Ok(products)
    }

    /// Check that the service answers its health endpoint
    pub async fn health(&self) -> Result<()> {
        let url = build_url(&self.config.base_url, "/health")?;
        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::http_status(response.status().as_u16(), "health check failed"))
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &FeedClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }
}

#[async_trait]
impl PageSource for FeedClient {
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Product>> {
        self.fetch_page(request).await
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("search_url", &self.search_url.as_str())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Join an absolute path onto the base URL, keeping any base path prefix
pub(crate) fn build_url(base: &str, path: &str) -> Result<Url> {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

/// Search URL with `from`, `limit` and the optional `query`
pub(crate) fn page_url(search_url: &Url, request: &PageRequest) -> Url {
    let mut url = search_url.clone();
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(query) = &request.query {
            pairs.append_pair("query", query);
        }
        pairs
            .append_pair("from", &request.cursor.to_string())
            .append_pair("limit", &request.page_size.to_string());
    }
    url
}
