//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::FeedClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::loader::{LoaderHandle, LoaderState, ScrollMetrics};
use crate::service;
use crate::store::{DuckDbStore, ProductStore};
use crate::types::{seed_products, Product};
use serde_json::{json, Value};
use std::sync::Arc;

/// Simulated viewport height for `browse`, in pixels
const VIEWPORT_HEIGHT: f64 = 800.0;

/// Simulated height of one rendered product card, in pixels
const ITEM_HEIGHT: f64 = 120.0;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut config = AppConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Serve {
                host,
                port,
                database,
            } => {
                if let Some(host) = host {
                    config.server.host.clone_from(host);
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(database) = database {
                    config.store.database.clone_from(database);
                }
                self.serve(&config).await
            }
            Commands::Seed { count, database } => {
                if let Some(count) = count {
                    config.store.seed_count = *count;
                }
                if let Some(database) = database {
                    config.store.database.clone_from(database);
                }
                self.seed(&config)
            }
            Commands::Browse {
                url,
                page_size,
                query,
                max_pages,
                throttle_ms,
            } => {
                if let Some(url) = url {
                    config.client.base_url.clone_from(url);
                }
                if let Some(page_size) = page_size {
                    config.loader.page_size = *page_size;
                }
                if query.is_some() {
                    config.loader.query.clone_from(query);
                }
                if let Some(throttle_ms) = throttle_ms {
                    config.loader.throttle_ms = *throttle_ms;
                }
                config.validate()?;
                self.browse(&config, *max_pages).await
            }
        }
    }

    /// Open the store and serve it until shutdown
    async fn serve(&self, config: &AppConfig) -> Result<()> {
        let store = DuckDbStore::open(&config.store.database)?;
        let total = store.count(None)?;
        if total == 0 {
            tracing::warn!(
                "Store at {} is empty; run `scrollfeed seed` to add products",
                store.location()
            );
        } else {
            tracing::info!("Serving {} products from {}", total, store.location());
        }

        service::serve(&config.server, Arc::new(store)).await
    }

    /// Insert the demo catalogue
    fn seed(&self, config: &AppConfig) -> Result<()> {
        let store = DuckDbStore::open(&config.store.database)?;
        let inserted = store.insert_many(&seed_products(config.store.seed_count))?;
        let total = store.count(None)?;

        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "SEED",
                "database": store.location(),
                "inserted": inserted,
                "total": total
            })),
            OutputFormat::Pretty => {
                println!(
                    "Inserted {inserted} products into {} ({total} total)",
                    store.location()
                );
            }
        }
        Ok(())
    }

    /// Run the incremental loader against a service, scrolling to the bottom
    /// every time a page lands.
    async fn browse(&self, config: &AppConfig, max_pages: Option<usize>) -> Result<()> {
        let client = FeedClient::with_config(config.client.to_client_config())?;
        tracing::info!("Browsing {}", client.config().base_url);

        let mut handle = LoaderHandle::spawn(Arc::new(client), config.loader.to_loader_config());
        let mut printed = 0;
        let mut pages = 0;
        let mut stopped_early = false;

        loop {
            let state = handle.settled().await?;
            for product in &state.items[printed..] {
                self.output_product(product);
            }
            printed = state.items.len();

            if state.exhausted {
                break;
            }
            pages += 1;
            if max_pages.is_some_and(|max| pages >= max) {
                stopped_early = true;
                break;
            }

            let before = state.cursor;
            let document_height = ITEM_HEIGHT * printed as f64;
            handle.scroll(ScrollMetrics::at_bottom(VIEWPORT_HEIGHT, document_height))?;
            handle
                .wait_for(|s| !s.in_flight && (s.cursor != before || s.exhausted))
                .await?;
        }

        let state = handle.shutdown().await?;
        self.output_status(&state, stopped_early);
        Ok(())
    }

    fn output_product(&self, product: &Product) {
        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "RECORD",
                "record": product
            })),
            OutputFormat::Pretty => {
                println!(
                    "{:>6}  {:<24} {:>10.2}  {}",
                    product.id, product.name, product.price, product.category
                );
            }
        }
    }

    fn output_status(&self, state: &LoaderState, stopped_early: bool) {
        let view = state.view();
        let status = if stopped_early {
            "stopped"
        } else if view.error.is_some() {
            "failed"
        } else {
            "exhausted"
        };

        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "STATUS",
                "status": status,
                "items": view.item_count,
                "error": view.error
            })),
            OutputFormat::Pretty => match (&view.error, stopped_early) {
                (_, true) => println!("Stopped after {} items", view.item_count),
                (Some(error), false) => {
                    println!("Could not load more items: {error}");
                    println!("No more items to load");
                }
                (None, false) => println!("No more items to load"),
            },
        }
    }

    fn output_message(&self, msg: &Value) {
        println!("{}", serde_json::to_string(msg).unwrap_or_default());
    }
}
