//! Paginated product service
//!
//! Serves `GET /products/search?query=&from=&limit=` over a [`ProductStore`],
//! plus `GET /health`. Store reads run on the blocking pool.
//!
//! [`ProductStore`]: crate::store::ProductStore

mod params;
mod server;

pub use params::{parse_int_prefix, SearchParams};
pub use server::{router, serve, serve_on, AppState};

#[cfg(test)]
mod tests;
