//! Handlers for the international market: preview, archive, list, delete,
//! and the country enumeration the request form feeds from.

use super::{quote_error_response, AppState, LIST_LIMIT};
use crate::prom_metrics::MarketLabel;
use crate::quote::{self, InternationalRequest, Market};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const MARKET: Market = Market::International;

pub(super) async fn handler_api_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": "railquote",
        "market": MARKET.as_str(),
        "hostname": state.hostname,
    }))
}

/// Countries the wage table covers, sorted for stable dropdowns.
pub(super) async fn handler_countries(State(state): State<Arc<AppState>>) -> Json<Value> {
    let countries: Vec<&str> = state.rates.countries.keys().map(String::as_str).collect();
    Json(json!({ "countries": countries }))
}

/// Flatten a request and its priced breakdown into one calculation object,
/// the shape the archive stores and the frontend renders.
pub(super) fn merge_calculation(request: Value, breakdown: Value) -> Value {
    let mut merged = match request {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    if let Value::Object(extra) = breakdown {
        merged.extend(extra);
    }
    Value::Object(merged)
}

pub(super) fn internal_error(err: impl std::fmt::Display) -> Response {
    tracing::error!(error = %err, "archive store failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

pub(super) async fn handler_calculate_preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InternationalRequest>,
) -> Response {
    match quote::international::preview(&req, &state.rates) {
        Ok(breakdown) => {
            state
                .prom_metrics
                .quotes_previewed
                .get_or_create(&MarketLabel::new(MARKET))
                .inc();
            let calculation = merge_calculation(
                serde_json::to_value(&req).unwrap_or_default(),
                serde_json::to_value(breakdown.rounded()).unwrap_or_default(),
            );
            Json(json!({ "calculation": calculation })).into_response()
        }
        Err(err) => {
            state
                .prom_metrics
                .quotes_rejected
                .get_or_create(&MarketLabel::new(MARKET))
                .inc();
            quote_error_response(&err)
        }
    }
}

pub(super) async fn handler_archive(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InternationalRequest>,
) -> Response {
    let breakdown = match quote::international::preview(&req, &state.rates) {
        Ok(breakdown) => breakdown,
        Err(err) => {
            state
                .prom_metrics
                .quotes_rejected
                .get_or_create(&MarketLabel::new(MARKET))
                .inc();
            return quote_error_response(&err);
        }
    };
    let payload = merge_calculation(
        serde_json::to_value(&req).unwrap_or_default(),
        serde_json::to_value(breakdown.rounded()).unwrap_or_default(),
    );
    let inserted = state
        .db
        .insert_calculation(
            MARKET.as_str(),
            &req.user_name,
            &req.project_name,
            &req.fence_type,
            req.meters,
            &payload,
        )
        .await;
    match inserted {
        Ok((id, created_at)) => {
            state
                .prom_metrics
                .calculations_archived
                .get_or_create(&MarketLabel::new(MARKET))
                .inc();
            let calculation = merge_calculation(
                payload,
                json!({ "id": id, "timestamp": created_at.to_rfc3339() }),
            );
            (
                StatusCode::CREATED,
                Json(json!({ "calculation": calculation })),
            )
                .into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(super) async fn handler_calculations(State(state): State<Arc<AppState>>) -> Response {
    match state.db.list_calculations(MARKET.as_str(), LIST_LIMIT).await {
        Ok(rows) => {
            let calculations: Vec<Value> = rows
                .into_iter()
                .map(|row| {
                    merge_calculation(
                        row.payload,
                        json!({ "id": row.id, "timestamp": row.created_at.to_rfc3339() }),
                    )
                })
                .collect();
            Json(json!({ "calculations": calculations })).into_response()
        }
        Err(err) => internal_error(err),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteRequest {
    pub ids: Vec<Uuid>,
}

pub(super) async fn handler_delete_calculations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Response {
    match state.db.delete_calculations(MARKET.as_str(), &req.ids).await {
        Ok(deleted) => {
            state
                .prom_metrics
                .calculations_deleted
                .get_or_create(&MarketLabel::new(MARKET))
                .inc_by(deleted);
            Json(json!({ "deleted_count": deleted, "ids": req.ids })).into_response()
        }
        Err(err) => internal_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_calculation_breakdown_wins_on_collision() {
        let merged = merge_calculation(
            json!({ "meters": 100.0, "user_name": "alice" }),
            json!({ "meters": 100.0, "raw_total": 5000.0 }),
        );
        assert_eq!(merged["user_name"], "alice");
        assert_eq!(merged["raw_total"], 5000.0);
    }

    #[test]
    fn merge_calculation_tolerates_non_object_request() {
        let merged = merge_calculation(Value::Null, json!({ "raw_total": 1.0 }));
        assert_eq!(merged["raw_total"], 1.0);
    }
}
