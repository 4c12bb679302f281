//! # Quote — Installation Cost-Estimation Engines
//!
//! Turns a project description (fence type, length, gates, market, and
//! scheduling constraints) into a labor schedule and an itemized cost
//! breakdown with markup and risk tiers.
//!
//! Two sibling engines share one design: [`international`] (fixed 8-man
//! crew, per-country labor rates, ground-fixing surcharge) and [`uk`]
//! (variable crew, accommodation/transportation/concrete, custom fence
//! types). Both end in the shared [`scenario`] math.
//!
//! Engines are pure and stateless: previews run fully in parallel, and a
//! [`CostBreakdown`] carries no identity, so archiving the same breakdown
//! twice produces two distinct records.

pub mod international;
pub mod scenario;
pub mod types;
pub mod uk;

pub use types::{
    CostBreakdown, GroundFixingMethod, InternationalRequest, Market, QuoteError, UkRequest,
};

use crate::rates::RateBook;

/// A market-tagged project request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "market", rename_all = "lowercase")]
pub enum QuoteRequest {
    International(InternationalRequest),
    Uk(UkRequest),
}

impl QuoteRequest {
    pub fn market(&self) -> Market {
        match self {
            QuoteRequest::International(_) => Market::International,
            QuoteRequest::Uk(_) => Market::Uk,
        }
    }

    /// Compute the cost breakdown for this request without persisting anything.
    pub fn preview(&self, rates: &RateBook) -> Result<CostBreakdown, QuoteError> {
        match self {
            QuoteRequest::International(req) => international::preview(req, rates),
            QuoteRequest::Uk(req) => uk::preview(req, rates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_request_dispatches_to_market_engine() {
        let req = QuoteRequest::Uk(UkRequest {
            user_name: "ben".into(),
            project_name: "ascot-rail".into(),
            fence_type: "PR".into(),
            meters: 120.0,
            gates: 1,
            delivery_lead: None,
            delivery_copilot: None,
            is_time_sensitive: false,
            days_available: None,
            num_labourers: None,
            custom_fence_name: None,
            custom_daily_rate: None,
            daily_labor_rate: None,
            driving_hours: None,
        });
        assert_eq!(req.market(), Market::Uk);
        let b = req.preview(&RateBook::default()).unwrap();
        assert_eq!(b.num_labourers, Some(2));
    }

    #[test]
    fn tagged_request_round_trips_through_json() {
        let json = serde_json::json!({
            "market": "international",
            "user_name": "amy",
            "project_name": "track",
            "country": "Spain",
            "fence_type": "OR",
            "meters": 136.0,
            "gates": 2
        });
        let req: QuoteRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.market(), Market::International);
        let b = req.preview(&RateBook::default()).unwrap();
        assert_eq!(b.work_days, 1);
    }
}
