//! HTTP server for paginated product reads

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::params::SearchParams;
use crate::client::SEARCH_PATH;
use crate::config::ServerSettings;
use crate::error::{Error, Result};
use crate::store::ProductStore;
use crate::types::Product;

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ProductStore>,
}

impl AppState {
    /// Wrap a product store
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(SEARCH_PATH, get(search_products))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM
pub async fn serve(settings: &ServerSettings, store: Arc<dyn ProductStore>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|e| Error::invalid_value("server.host", format!("{e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Starting HTTP server on http://{}", addr);
    serve_on(listener, store, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves
pub async fn serve_on<F>(
    listener: TcpListener,
    store: Arc<dyn ProductStore>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(AppState::new(store));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// One page of products. Parameters are coerced, never rejected.
async fn search_products(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Product>>> {
    let request = SearchParams::parse(raw.as_deref()).to_request();
    tracing::debug!(
        "Search from={} limit={} query={:?}",
        request.cursor,
        request.page_size,
        request.query
    );

    let store = Arc::clone(&state.store);
    let products = tokio::task::spawn_blocking(move || store.fetch_page(&request))
        .await
        .map_err(|e| Error::store(format!("query task failed: {e}")))??;

    Ok(Json(products))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // The cause stays in the server log
        tracing::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal Server Error" })),
        )
            .into_response()
    }
}
