use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// Serve the armored service public key as plain text.
pub async fn public_key(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.public_key.as_str().to_owned(),
    )
}

/// Render the latest health report. 503 until the scheduler has run once,
/// 500 while any check is unhealthy.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let latest = state.health.read().await;
    let Some(report) = latest.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "pending", "service": "errata" })),
        );
    };

    let (code, status) = if report.all_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "unhealthy")
    };

    (
        code,
        Json(json!({
            "status": status,
            "service": "errata",
            "timestamp": report.timestamp,
            "checks": report.checks,
        })),
    )
}
