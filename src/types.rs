//! Common types used throughout scrollfeed
//!
//! This module contains the product record served by the fetch service and
//! the page request shared by the service, the client and the loader.

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

/// Offset used when `from` is missing or malformed
pub const DEFAULT_FROM: u64 = 0;

/// Page size used when `limit` is missing, malformed or not positive
pub const DEFAULT_LIMIT: u32 = 9;

/// Number of products written by `seed` when no count is given
pub const DEFAULT_SEED_COUNT: usize = 100;

// ============================================================================
// Products
// ============================================================================

/// A product as stored and served.
///
/// `id` is assigned by the store from its insertion sequence. It is only a
/// display key; pagination always goes by offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned insertion id
    pub id: i64,
    /// Product name (the filter matches against this)
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Price in whole currency units
    #[serde(default)]
    pub price: f64,
    /// Category label
    #[serde(default)]
    pub category: String,
}

/// A product that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

impl NewProduct {
    /// Create a new product
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
        }
    }
}

/// Build the demo catalogue: `Product 1` .. `Product n`, priced `i * 10`.
pub fn seed_products(count: usize) -> Vec<NewProduct> {
    (1..=count)
        .map(|i| {
            NewProduct::new(
                format!("Product {i}"),
                format!("Description for product {i}"),
                (i * 10) as f64,
                "Category A",
            )
        })
        .collect()
}

// ============================================================================
// Page Requests
// ============================================================================

/// One offset/limit read over the product collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Offset of the first item; equals the number of items already consumed
    pub cursor: u64,
    /// Maximum number of items to return
    pub page_size: u32,
    /// Optional name filter, applied before pagination
    pub query: Option<String>,
}

impl PageRequest {
    /// Create a page request without a filter
    pub fn new(cursor: u64, page_size: u32) -> Self {
        Self {
            cursor,
            page_size,
            query: None,
        }
    }

    /// Attach a name filter. Empty strings mean "no filter".
    #[must_use]
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_FROM, DEFAULT_LIMIT)
    }
}
