//! # Prometheus Metrics — Exposition for Container Orchestration
//!
//! Exposes railquote operational metrics in the Prometheus text exposition
//! format for scraping by Prometheus, Grafana Agent, or any
//! OpenMetrics-compatible collector.
//!
//! ## Metrics Exposed
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `railquote_quotes_previewed_total` | Counter | `market` | Successful preview computations |
//! | `railquote_quotes_rejected_total` | Counter | `market` | Previews rejected by validation |
//! | `railquote_calculations_archived_total` | Counter | `market` | Calculations persisted |
//! | `railquote_calculations_deleted_total` | Counter | `market` | Calculations deleted |
//! | `railquote_http_request_duration_seconds` | Histogram | `method`, `path` | Request latency |
//!
//! The `/metrics` endpoint renders the current registry state on each scrape.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Label set for per-market metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct MarketLabel {
    pub market: String,
}

impl MarketLabel {
    pub fn new(market: crate::quote::Market) -> Self {
        Self {
            market: market.as_str().to_string(),
        }
    }
}

/// Label set for the HTTP latency histogram.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

/// Thread-safe metrics registry for the railquote service.
///
/// All fields use atomic types and are safe to update from any thread or
/// async task. The `Family` type creates per-label-set instances on first use.
pub struct Metrics {
    pub registry: Registry,
    pub quotes_previewed: Family<MarketLabel, Counter>,
    pub quotes_rejected: Family<MarketLabel, Counter>,
    pub calculations_archived: Family<MarketLabel, Counter>,
    pub calculations_deleted: Family<MarketLabel, Counter>,
    pub http_request_duration: Family<HttpLabel, Histogram>,
}

impl Metrics {
    /// Create a new metrics registry with all railquote metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let quotes_previewed = Family::<MarketLabel, Counter>::default();
        registry.register(
            "railquote_quotes_previewed",
            "Successful preview computations by market",
            quotes_previewed.clone(),
        );

        let quotes_rejected = Family::<MarketLabel, Counter>::default();
        registry.register(
            "railquote_quotes_rejected",
            "Previews rejected by validation, by market",
            quotes_rejected.clone(),
        );

        let calculations_archived = Family::<MarketLabel, Counter>::default();
        registry.register(
            "railquote_calculations_archived",
            "Calculations persisted to the archive by market",
            calculations_archived.clone(),
        );

        let calculations_deleted = Family::<MarketLabel, Counter>::default();
        registry.register(
            "railquote_calculations_deleted",
            "Calculations deleted from the archive by market",
            calculations_deleted.clone(),
        );

        let http_request_duration = Family::<HttpLabel, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 14))
        });
        registry.register(
            "railquote_http_request_duration_seconds",
            "HTTP request latency by method and normalized path",
            http_request_duration.clone(),
        );

        Self {
            registry,
            quotes_previewed,
            quotes_rejected,
            calculations_archived,
            calculations_deleted,
            http_request_duration,
        }
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        encode(&mut buf, &self.registry).expect("encoding metrics should not fail");
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::Market;

    #[test]
    fn metrics_encode_returns_valid_text() {
        let m = Metrics::new();
        m.quotes_previewed
            .get_or_create(&MarketLabel::new(Market::Uk))
            .inc();
        m.http_request_duration
            .get_or_create(&HttpLabel {
                method: "POST".to_string(),
                path: "/api/calculate-preview".to_string(),
            })
            .observe(0.012);

        let output = m.encode();
        assert!(output.contains("railquote_quotes_previewed"));
        assert!(output.contains("railquote_http_request_duration_seconds"));
        assert!(output.contains("uk"));
    }

    #[test]
    fn metrics_per_market_counters_independent() {
        let m = Metrics::new();
        m.calculations_archived
            .get_or_create(&MarketLabel::new(Market::International))
            .inc_by(3);
        m.calculations_archived
            .get_or_create(&MarketLabel::new(Market::Uk))
            .inc_by(7);

        let output = m.encode();
        assert!(output.contains("international"));
        assert!(output.contains("uk"));
    }
}
