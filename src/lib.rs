// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # scrollfeed
//!
//! A paginated product service and the incremental loader that consumes it.
//!
//! ## Features
//!
//! - **Offset Pagination**: `GET /products/search?from=&limit=` over a stable order
//! - **Name Filter**: Optional case-insensitive pattern match on product names
//! - **Incremental Loading**: Pure state machine that fetches the next page
//!   when the reader scrolls to the bottom, one request at a time
//! - **Embedded Storage**: Products live in DuckDB, on disk or in memory
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scrollfeed::client::FeedClient;
//! use scrollfeed::loader::{LoaderConfig, LoaderHandle, ScrollMetrics};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> scrollfeed::Result<()> {
//!     let client = FeedClient::new("http://localhost:5000")?;
//!     let mut loader = LoaderHandle::spawn(Arc::new(client), LoaderConfig::default());
//!
//!     let state = loader.settled().await?;
//!     println!("{} items", state.items.len());
//!
//!     loader.scroll(ScrollMetrics::at_bottom(800.0, 1080.0))?;
//!     loader.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │        Incremental Loader    │  HTTP  │        Product Service       │
//! │  step(state, event) → effects│ ─────▶ │  GET /products/search        │
//! │  Throttle · LoaderHandle     │ ◀───── │  coerce params · ProductStore│
//! └──────────────┬───────────────┘  JSON  └──────────────┬───────────────┘
//!                │ PageSource                            │
//!         ┌──────┴──────┐                         ┌──────┴──────┐
//!         │ FeedClient  │                         │ DuckDbStore │
//!         └─────────────┘                         └─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Products and page requests
pub mod types;

/// Layered application configuration
pub mod config;

/// Product storage via DuckDB
pub mod store;

/// HTTP service for paginated reads
pub mod service;

/// HTTP client for the service
pub mod client;

/// Incremental loader state machine and runtime
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use client::FeedClient;
pub use loader::{LoaderConfig, LoaderHandle, LoaderState};
pub use store::{DuckDbStore, ProductStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
