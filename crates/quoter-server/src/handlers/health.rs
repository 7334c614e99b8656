//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Liveness response: artifacts loaded and ready to quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_kind: String,
    pub reference_rows: usize,
}

/// GET /api/health - Liveness probe
///
/// A running server has already validated its artifacts, so reaching
/// this handler at all means the engine is ready.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let meta = state.engine.metadata();
    Json(HealthResponse {
        status: "ok",
        model_kind: meta.model_kind,
        reference_rows: meta.reference_rows,
    })
}

/// GET / - Service info (shown when no static frontend is mounted)
pub async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "coverquote",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /api/quote",
            "POST /api/savings-tips",
            "GET /api/brands",
            "GET /api/model",
            "GET /api/health"
        ]
    }))
}
