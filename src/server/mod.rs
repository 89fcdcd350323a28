//! # Print Bridge HTTP Server
//!
//! Lets a web point-of-sale client print through a machine that has the
//! printer paired.
//!
//! ## Usage
//!
//! ```bash
//! tillprint serve --listen 127.0.0.1:9100 --mac 66:32:8A:12:34:56 --settings shop.json
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET  | `/api/health` | status JSON |
//! | POST | `/api/receipt/escpos` | `application/octet-stream` command stream |
//! | POST | `/api/receipt/html` | printable HTML document |
//! | POST | `/api/receipt/print` | `{success, chunks, bytes}` or `{success: false, fallback: "html", error}` |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::TillprintError;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/receipt/escpos", post(handlers::receipt::escpos))
        .route("/api/receipt/html", post(handlers::receipt::html))
        .route("/api/receipt/print", post(handlers::receipt::print))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(state: AppState) -> Result<(), TillprintError> {
    let listen_addr = state.config.listen_addr.clone();
    info!(
        listen = %listen_addr,
        wireless = state.transport.is_supported(),
        shop = ?state.settings.shop().display_name(),
        "tillprint print bridge starting"
    );

    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| TillprintError::Config(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
