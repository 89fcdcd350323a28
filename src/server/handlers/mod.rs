//! HTTP handlers for the server.

pub mod receipt;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

use super::state::AppState;

/// Handle GET /api/health.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "wireless": state.transport.is_supported(),
        "printerWidth": state.settings.printer_width().unwrap_or_default(),
    }))
}
