//! # Server — REST API for Quoting and the Calculation Archive
//!
//! Runs an Axum HTTP server exposing the two market engines to the quoting
//! forms: preview, archive, list, and bulk delete per market, plus the
//! country and fence-type enumerations the forms populate their dropdowns
//! from. Optionally serves a static frontend build.

mod routes_health;
mod routes_international;
mod routes_uk;

use crate::quote::QuoteError;
use crate::{db, prom_metrics, rates};
use anyhow::Result;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// Most calculations returned by a single list request.
pub(crate) const LIST_LIMIT: i64 = 100;

pub struct AppState {
    pub db: db::Database,
    pub rates: rates::RateBook,
    pub hostname: String,
    pub prom_metrics: prom_metrics::Metrics,
}

impl AppState {
    pub fn with_db(db: db::Database, rates: rates::RateBook) -> Arc<Self> {
        Arc::new(AppState {
            db,
            rates,
            hostname: gethostname(),
            prom_metrics: prom_metrics::Metrics::new(),
        })
    }
}

pub(super) fn gethostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .or_else(|_| sysinfo::System::host_name().ok_or(std::env::VarError::NotPresent))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Map a quote error to its HTTP response.
///
/// Unknown enum values are 400s, validation and infeasible-deadline failures
/// are 422s; both carry the offending field so forms can highlight it.
/// Archive-store failures are reported as 500s elsewhere, keeping the
/// retry-vs-correct distinction visible to callers.
pub(crate) fn quote_error_response(err: &QuoteError) -> axum::response::Response {
    use axum::response::IntoResponse;
    let status = match err {
        QuoteError::UnknownCountry(_) | QuoteError::UnknownFenceType(_) => StatusCode::BAD_REQUEST,
        QuoteError::Validation { .. } | QuoteError::InsufficientTime { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    (
        status,
        Json(serde_json::json!({
            "error": err.to_string(),
            "field": err.field(),
        })),
    )
        .into_response()
}

/// Middleware that records HTTP request duration into the Prometheus
/// histogram, generates (or propagates) a request ID for correlation, and
/// wraps the request in a tracing span using `.instrument()` for proper
/// async propagation.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let raw_path = req.uri().path().to_string();
    let norm_path = normalize_path(&raw_path);
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %raw_path,
    );
    let response = next.run(req).instrument(span).await;

    let duration = start.elapsed().as_secs_f64();
    state
        .prom_metrics
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel {
            method,
            path: norm_path,
        })
        .observe(duration);

    let mut response = response;
    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Normalize URL path to collapse high-cardinality segments (UUIDs, numeric
/// IDs) into placeholders, preventing histogram label explosion.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| {
            if seg.is_empty() {
                seg.to_string()
            } else if seg.chars().all(|c| c.is_ascii_digit()) {
                ":id".to_string()
            } else if seg.len() == 36 && seg.chars().filter(|c| *c == '-').count() == 4 {
                ":uuid".to_string()
            } else {
                seg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        // International market
        .route("/api/", get(routes_international::handler_api_root))
        .route(
            "/api/countries",
            get(routes_international::handler_countries),
        )
        .route(
            "/api/calculate-preview",
            post(routes_international::handler_calculate_preview),
        )
        .route("/api/archive", post(routes_international::handler_archive))
        .route(
            "/api/calculations",
            get(routes_international::handler_calculations),
        )
        .route(
            "/api/delete-calculations",
            post(routes_international::handler_delete_calculations),
        )
        // UK market
        .route("/api/uk/", get(routes_uk::handler_uk_root))
        .route("/api/uk/fence-types", get(routes_uk::handler_fence_types))
        .route(
            "/api/uk/calculate-preview",
            post(routes_uk::handler_calculate_preview),
        )
        .route("/api/uk/archive", post(routes_uk::handler_archive))
        .route("/api/uk/calculations", get(routes_uk::handler_calculations))
        .route(
            "/api/uk/delete-calculations",
            post(routes_uk::handler_delete_calculations),
        )
        // Probes and metrics
        .route("/healthz", get(routes_health::handler_healthz))
        .route("/readyz", get(routes_health::handler_readyz))
        .route("/metrics", get(routes_health::handler_metrics));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    } else {
        app = app.route("/", get(routes_international::handler_api_root));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(CatchPanicLayer::new())
    .layer(axum::middleware::from_fn_with_state(
        state.clone(),
        metrics_middleware,
    ))
    .layer(TraceLayer::new_for_http())
    .layer(RequestBodyLimitLayer::new(1024 * 1024))
    .layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(30),
    ))
    .with_state(state)
}

pub async fn run(
    port: u16,
    database_url: &str,
    rates: rates::RateBook,
    static_dir: Option<&Path>,
) -> Result<()> {
    let database = db::Database::connect(database_url).await?;
    database.ensure_schema().await?;
    let state = AppState::with_db(database, rates);
    let app = build_router(state.clone(), static_dir);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, hostname = %state.hostname, "quote server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
