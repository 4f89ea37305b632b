//! DuckDB-backed product store
//!
//! Products live in a single `products` table. A sequence assigns `id` on
//! insert, and every read orders by it, so a given offset maps to the same
//! product for as long as the table is not modified underneath a reader.
//! Name filters are evaluated by [`NameFilter`] over rows read in id order,
//! and the offset counts matching rows only.

use super::filter::NameFilter;
use super::ProductStore;
use crate::error::{Error, Result};
use crate::types::{NewProduct, PageRequest, Product};
use duckdb::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS products_id_seq START 1;
CREATE TABLE IF NOT EXISTS products (
    id BIGINT PRIMARY KEY DEFAULT nextval('products_id_seq'),
    name VARCHAR NOT NULL,
    description VARCHAR NOT NULL DEFAULT '',
    price DOUBLE NOT NULL DEFAULT 0,
    category VARCHAR NOT NULL DEFAULT ''
);
";

const SELECT_PRODUCTS: &str = "SELECT id, name, description, price, category FROM products";

/// Product store using an embedded DuckDB database
pub struct DuckDbStore {
    /// DuckDB connection (DuckDB connections are not `Sync`)
    conn: Mutex<Connection>,
    /// Database location (for logging)
    location: String,
}

impl DuckDbStore {
    /// Open a file-backed store, or an in-memory one for `:memory:`
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(|e| Error::store(format!("Failed to open DuckDB at '{path}': {e}")))?;

        let store = Self {
            conn: Mutex::new(conn),
            location: path.to_string(),
        };
        store.init_schema()?;

        info!("Opened product store at {}", store.location);
        Ok(store)
    }

    /// Open an empty in-memory store
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Where the database lives
    pub fn location(&self) -> &str {
        &self.location
    }

    fn init_schema(&self) -> Result<()> {
        self.lock()?
            .execute_batch(SCHEMA)
            .map_err(|e| Error::store(format!("Failed to create products table: {e}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::store("DuckDB connection lock poisoned"))
    }
}

impl ProductStore for DuckDbStore {
    fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Product>> {
        let Some(filter) = NameFilter::from_query(request.query.as_deref())? else {
            let sql = build_page_query(request);
            debug!("Fetching page: {}", sql);

            let conn = self.lock()?;
            let mut stmt = conn.prepare(&sql)?;
            let products = stmt
                .query_map([], row_to_product)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            return Ok(products);
        };

        debug!("Fetching filtered page for '{}'", filter.pattern());
        let page_size = request.page_size as usize;
        let mut page = Vec::with_capacity(page_size.min(1024));
        if page_size == 0 {
            return Ok(page);
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_PRODUCTS} ORDER BY id"))?;
        let mut skipped = 0u64;
        for row in stmt.query_map([], row_to_product)? {
            let product = row?;
            if !filter.matches(&product.name) {
                continue;
            }
            if skipped < request.cursor {
                skipped += 1;
                continue;
            }
            page.push(product);
            if page.len() == page_size {
                break;
            }
        }

        Ok(page)
    }

    fn count(&self, query: Option<&str>) -> Result<u64> {
        let filter = NameFilter::from_query(query)?;
        let conn = self.lock()?;

        let Some(filter) = filter else {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
            return Ok(total.max(0) as u64);
        };

        let mut stmt = conn.prepare("SELECT name FROM products")?;
        let mut total = 0u64;
        for name in stmt.query_map([], |row| row.get::<_, String>(0))? {
            if filter.matches(&name?) {
                total += 1;
            }
        }
        Ok(total)
    }

    fn insert_many(&self, products: &[NewProduct]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (name, description, price, category) VALUES (?, ?, ?, ?)",
            )?;
            for product in products {
                stmt.execute(params![
                    product.name,
                    product.description,
                    product.price,
                    product.category
                ])?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} products", products.len());
        Ok(products.len())
    }
}

impl std::fmt::Debug for DuckDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Build the unfiltered page query. Offsets and limits are integers and go
/// in as literals; DuckDB rejects offsets above `i64::MAX`.
fn build_page_query(request: &PageRequest) -> String {
    let offset = request.cursor.min(i64::MAX as u64);
    format!(
        "{SELECT_PRODUCTS} ORDER BY id LIMIT {} OFFSET {offset}",
        request.page_size
    )
}

fn row_to_product(row: &Row<'_>) -> duckdb::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
    })
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn test_build_page_query_plain() {
        let sql = build_page_query(&PageRequest::new(18, 9));
        assert_eq!(
            sql,
            "SELECT id, name, description, price, category FROM products ORDER BY id LIMIT 9 OFFSET 18"
        );
    }

    #[test]
    fn test_build_page_query_clamps_offset() {
        let sql = build_page_query(&PageRequest::new(u64::MAX, 9));
        assert!(sql.ends_with(&format!("OFFSET {}", i64::MAX)));
    }
}
