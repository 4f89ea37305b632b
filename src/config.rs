//! Application configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file,
//! then environment variables. CLI flags are applied last by the runner.
//!
//! ```yaml
//! server:
//!   port: 5000
//! store:
//!   database: products.duckdb
//! loader:
//!   page_size: 9
//!   throttle_ms: 200
//! ```

use crate::client::{FeedClientConfig, RateLimiterConfig};
use crate::error::{Error, Result, ResultExt};
use crate::loader::LoaderConfig;
use crate::types::{DEFAULT_LIMIT, DEFAULT_SEED_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP service settings
    pub server: ServerSettings,
    /// Product store settings
    pub store: StoreSettings,
    /// Fetch client settings
    pub client: ClientSettings,
    /// Incremental loader settings
    pub loader: LoaderSettings,
}

impl AppConfig {
    /// Load defaults, an optional YAML file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a YAML config document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// Recognised: `PORT`, `SCROLLFEED_HOST`, `SCROLLFEED_DATABASE`,
    /// `SCROLLFEED_URL`, `SCROLLFEED_PAGE_SIZE`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(host) = lookup("SCROLLFEED_HOST") {
            self.server.host = host;
        }
        if let Some(database) = lookup("SCROLLFEED_DATABASE") {
            self.store.database = database;
        }
        if let Some(url) = lookup("SCROLLFEED_URL") {
            self.client.base_url = url;
        }
        if let Some(size) = lookup("SCROLLFEED_PAGE_SIZE") {
            self.loader.page_size = parse_env("SCROLLFEED_PAGE_SIZE", &size)?;
        }
        Ok(())
    }

    /// Reject settings no component can run with
    pub fn validate(&self) -> Result<()> {
        if self.loader.page_size == 0 {
            return Err(Error::invalid_value("loader.page_size", "must be positive"));
        }
        if self.client.timeout_ms == 0 {
            return Err(Error::invalid_value("client.timeout_ms", "must be positive"));
        }
        if self.store.database.is_empty() {
            return Err(Error::invalid_value("store.database", "must not be empty"));
        }
        url::Url::parse(&self.client.base_url)
            .map_err(|e| Error::invalid_value("client.base_url", e.to_string()))?;
        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| Error::invalid_value(key, e.to_string()))
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Product store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// DuckDB file path, or `:memory:`
    pub database: String,
    /// Products written by `seed`
    pub seed_count: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: "scrollfeed.duckdb".to_string(),
            seed_count: DEFAULT_SEED_COUNT,
        }
    }
}

/// Fetch client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Service base URL
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Outbound request rate cap; `None` disables it
    pub requests_per_second: Option<u32>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 30_000,
            requests_per_second: Some(10),
        }
    }
}

impl ClientSettings {
    /// Build the fetch client config
    pub fn to_client_config(&self) -> FeedClientConfig {
        let builder = FeedClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_millis(self.timeout_ms));
        match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        }
        .build()
    }
}

/// Incremental loader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Items requested per page
    pub page_size: u32,
    /// Minimum spacing between scroll evaluations
    pub throttle_ms: u64,
    /// Optional name filter sent with every request
    pub query: Option<String>,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_LIMIT,
            throttle_ms: 200,
            query: None,
        }
    }
}

impl LoaderSettings {
    /// Build the loader config
    pub fn to_loader_config(&self) -> LoaderConfig {
        LoaderConfig::new(self.page_size)
            .with_throttle(Duration::from_millis(self.throttle_ms))
            .with_query(self.query.clone())
    }
}
