//! Product store backed by DuckDB
//!
//! The fetch service only sees the [`ProductStore`] trait. [`DuckDbStore`]
//! keeps the products in an embedded DuckDB database, either on disk or
//! in memory, ordered by insertion.

mod engine;
mod filter;

pub use engine::DuckDbStore;
pub use filter::NameFilter;

use crate::error::Result;
use crate::types::{NewProduct, PageRequest, Product};

/// Ordered product collection with offset/limit reads
pub trait ProductStore: Send + Sync {
    /// Read one page in insertion order.
    ///
    /// Returns at most `request.page_size` items starting at
    /// `request.cursor`; an empty page once the cursor is past the end.
    fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Product>>;

    /// Count the products visible through an optional filter
    fn count(&self, query: Option<&str>) -> Result<u64>;

    /// Append products, returning how many were written
    fn insert_many(&self, products: &[NewProduct]) -> Result<usize>;
}
