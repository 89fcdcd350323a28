//! Receipt handlers.
//!
//! Request bodies are receipt records as the point-of-sale backend stores
//! them: loosely typed JSON that goes through the validating converter
//! before anything is rendered.
//!
//! A client-supplied `logoUrl` must be a `data:` or `https://` URI. File
//! paths and plain-http URLs are only honored from the settings file.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::fallback::render_document;
use crate::receipt::{ReceiptData, build_receipt, receipt_from_value};

use super::super::state::AppState;

fn error_response(status: StatusCode, error_msg: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error_msg }))).into_response()
}

fn client_logo_allowed(source: &str) -> bool {
    let source = source.trim();
    source.starts_with("data:") || source.starts_with("https://")
}

/// Drop a request `logoUrl` that would reach the server's filesystem or
/// network, leaving the settings logo in effect.
fn strip_client_logo(body: &mut Value) {
    let Some(obj) = body.as_object_mut() else {
        return;
    };
    let allowed = match obj.get("logoUrl") {
        Some(Value::String(source)) => client_logo_allowed(source),
        Some(Value::Null) | None => true,
        Some(_) => false,
    };
    if !allowed {
        warn!(logo = ?obj.get("logoUrl"), "ignoring logoUrl from request");
        obj.remove("logoUrl");
    }
}

fn parse(state: &AppState, mut body: Value) -> Result<ReceiptData, Response> {
    strip_client_logo(&mut body);
    receipt_from_value(&body, Some(state.settings.value())).map_err(|e| {
        warn!(error = %e, "rejected receipt");
        error_response(StatusCode::BAD_REQUEST, &e.to_string())
    })
}

/// Handle POST /api/receipt/escpos - return the encoded command stream.
pub async fn escpos(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let receipt = match parse(&state, body) {
        Ok(receipt) => receipt,
        Err(response) => return response,
    };
    let bytes = build_receipt(&receipt, &state.glyphs, state.fetcher.as_ref()).await;
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response()
}

/// Handle POST /api/receipt/html - return the printable fallback document.
pub async fn html(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    match parse(&state, body) {
        Ok(receipt) => Html(render_document(&receipt)).into_response(),
        Err(response) => response,
    }
}

/// Handle POST /api/receipt/print - encode and send to the printer.
///
/// On transport failure the client is told to use the HTML fallback.
pub async fn print(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let receipt = match parse(&state, body) {
        Ok(receipt) => receipt,
        Err(response) => return response,
    };
    let bytes = build_receipt(&receipt, &state.glyphs, state.fetcher.as_ref()).await;

    let _guard = state.print_lock.lock().await;
    match state.transport.try_send(&bytes).await {
        Ok(report) => {
            info!(bill = %receipt.bill_no, chunks = report.chunks, bytes = report.bytes, "receipt printed");
            Json(json!({
                "success": true,
                "chunks": report.chunks,
                "bytes": report.bytes,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(bill = %receipt.bill_no, error = %e, "print failed, advising HTML fallback");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "fallback": "html",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
