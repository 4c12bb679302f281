//! Handlers for the UK market. Same surface as the international side plus
//! the fence-type enumeration, since UK productivity is table-driven rather
//! than country-driven.

use super::routes_international::{internal_error, merge_calculation, DeleteRequest};
use super::{quote_error_response, AppState, LIST_LIMIT};
use crate::prom_metrics::MarketLabel;
use crate::quote::{self, Market, UkRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

const MARKET: Market = Market::Uk;

/// The delivery lead defaults to whoever filed the quote.
fn with_delivery_lead(mut req: UkRequest) -> UkRequest {
    if req.delivery_lead.is_none() {
        req.delivery_lead = Some(req.user_name.clone());
    }
    req
}

pub(super) async fn handler_uk_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": "railquote",
        "market": MARKET.as_str(),
        "hostname": state.hostname,
    }))
}

/// Known fence types with their per-man productivity and whether the type
/// takes a concrete surcharge. The custom sentinel is listed last so forms
/// can offer it as an explicit escape hatch.
pub(super) async fn handler_fence_types(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut fence_types: Vec<Value> = state
        .rates
        .uk
        .fence_types
        .iter()
        .map(|ft| {
            json!({
                "code": ft.code,
                "productivity_per_man": ft.productivity,
                "needs_concrete": ft.needs_concrete,
            })
        })
        .collect();
    fence_types.push(json!({ "code": quote::uk::CUSTOM_FENCE_TYPE, "custom": true }));
    Json(json!({ "fence_types": fence_types }))
}

pub(super) async fn handler_calculate_preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UkRequest>,
) -> Response {
    let req = with_delivery_lead(req);
    match quote::uk::preview(&req, &state.rates) {
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
    Json(req): Json<UkRequest>,
) -> Response {
    let req = with_delivery_lead(req);
    let breakdown = match quote::uk::preview(&req, &state.rates) {
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
