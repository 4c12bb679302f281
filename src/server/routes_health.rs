//! Liveness, readiness, and Prometheus exposition.

use super::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub(super) async fn handler_healthz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "hostname": state.hostname }))
}

/// Ready only when the archive store answers within two seconds. A stalled
/// pool should flip readiness rather than hang the probe.
pub(super) async fn handler_readyz(State(state): State<Arc<AppState>>) -> Response {
    let check = tokio::time::timeout(Duration::from_secs(2), state.db.health_check()).await;
    match check {
        Ok(Ok(())) => Json(json!({ "status": "ready" })).into_response(),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": err.to_string() })),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "error": "database timeout" })),
        )
            .into_response(),
    }
}

pub(super) async fn handler_metrics(State(state): State<Arc<AppState>>) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        state.prom_metrics.encode(),
    )
        .into_response()
}
