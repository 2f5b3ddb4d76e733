//! HTTP transport over the query engine.
//!
//! Routes:
//! - `GET /search?term=<q>`: JSON array of matching records
//! - `GET /autocomplete`: a static JSON file, returned verbatim
//! - anything else: files from the static directory

pub mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::QueryEngine;

pub use handlers::{ErrorResponse, SearchParams};

/// Shared per-request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: QueryEngine,
    pub autocomplete: Arc<PathBuf>,
}

impl AppState {
    pub fn new(engine: QueryEngine, autocomplete: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            autocomplete: Arc::new(autocomplete.into()),
        }
    }
}

/// Build the application router
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/search", get(handlers::handle_search))
        .route("/autocomplete", get(handlers::handle_autocomplete))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `address` and serve until Ctrl-C
pub async fn serve(address: &str, app: Router) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Server is listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
