//! Request, breakdown, and error types shared by both market engines.

use crate::round_money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which quoting engine a request or archived calculation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    International,
    Uk,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::International => "international",
            Market::Uk => "uk",
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ground fixing method for International projects. Only the baseplate
/// method carries a per-meter surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GroundFixingMethod {
    #[default]
    #[serde(rename = "Angle Steel")]
    AngleSteel,
    #[serde(rename = "Inner GMS Post with Baseplate")]
    InnerGmsPostWithBaseplate,
}

/// An International project description. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternationalRequest {
    pub user_name: String,
    pub project_name: String,
    pub country: String,
    pub fence_type: String,
    pub meters: f64,
    pub gates: u32,
    #[serde(default)]
    pub ground_fixing_method: GroundFixingMethod,
    /// Overrides the wage-derived daily labor rate when positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_daily_labor_rate: Option<f64>,
}

/// A UK project description. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkRequest {
    pub user_name: String,
    pub project_name: String,
    pub fence_type: String,
    pub meters: f64,
    pub gates: u32,
    /// Defaults to `user_name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_lead: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_copilot: Option<String>,
    #[serde(default)]
    pub is_time_sensitive: bool,
    /// Deadline in days; required iff `is_time_sensitive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_available: Option<u32>,
    /// Requested crew size; used iff not time-sensitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_labourers: Option<u32>,
    /// Required iff `fence_type == "CUSTOM"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fence_name: Option<String>,
    /// Per-worker productivity in m/day; required iff `fence_type == "CUSTOM"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_daily_rate: Option<f64>,
    /// Caller-supplied daily labor rate per worker; falls back to the
    /// configured standard rate when absent or non-positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_labor_rate: Option<f64>,
    /// One-way driving hours; drives the transportation cost (0 when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_hours: Option<f64>,
}

/// The itemized quote produced by either engine. Never mutated after
/// computation; market-specific items are `None` for the other market.
///
/// All amounts are full-precision. Call [`CostBreakdown::rounded`] only at
/// presentation boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub work_days: u32,
    pub daily_rate_per_man: f64,
    pub labor_cost: f64,
    pub tools_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervision_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_ticket: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_fixing_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concrete_cost: Option<f64>,
    /// Resolved crew size (UK only; International crews are fixed at 8).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_labourers: Option<u32>,
    pub raw_total: f64,
    pub rate_per_meter: f64,
    pub markup_30: f64,
    pub markup_40: f64,
    pub markup_50: f64,
    pub markup_60: f64,
    pub bad_case_20: f64,
    pub more_bad_case_40: f64,
    pub worst_case_80: f64,
}

impl CostBreakdown {
    /// Sum of the itemized cost components (excluding totals and tiers).
    /// `raw_total` must equal this exactly.
    pub fn component_sum(&self) -> f64 {
        self.labor_cost
            + self.tools_cost
            + self.supervision_cost.unwrap_or(0.0)
            + self.flight_ticket.unwrap_or(0.0)
            + self.ground_fixing_cost.unwrap_or(0.0)
            + self.accommodation_cost.unwrap_or(0.0)
            + self.transportation_cost.unwrap_or(0.0)
            + self.concrete_cost.unwrap_or(0.0)
    }

    /// Copy with every monetary amount rounded to 2 decimal places, for
    /// display and persistence boundaries.
    pub fn rounded(&self) -> CostBreakdown {
        CostBreakdown {
            work_days: self.work_days,
            daily_rate_per_man: round_money(self.daily_rate_per_man),
            labor_cost: round_money(self.labor_cost),
            tools_cost: round_money(self.tools_cost),
            supervision_cost: self.supervision_cost.map(round_money),
            flight_ticket: self.flight_ticket.map(round_money),
            ground_fixing_cost: self.ground_fixing_cost.map(round_money),
            accommodation_cost: self.accommodation_cost.map(round_money),
            transportation_cost: self.transportation_cost.map(round_money),
            concrete_cost: self.concrete_cost.map(round_money),
            num_labourers: self.num_labourers,
            raw_total: round_money(self.raw_total),
            rate_per_meter: round_money(self.rate_per_meter),
            markup_30: round_money(self.markup_30),
            markup_40: round_money(self.markup_40),
            markup_50: round_money(self.markup_50),
            markup_60: round_money(self.markup_60),
            bad_case_20: round_money(self.bad_case_20),
            more_bad_case_40: round_money(self.more_bad_case_40),
            worst_case_80: round_money(self.worst_case_80),
        }
    }
}

/// Why a quote could not be computed.
///
/// Validation and unknown-enum failures are correctable by the caller;
/// `InsufficientTime` means the deadline cannot be met within the configured
/// crew cap. Archive-store failures are a separate class reported by the
/// HTTP layer so callers can tell retry from fix-your-input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
    #[error("unknown fence type '{0}'")]
    UnknownFenceType(String),
    #[error(
        "deadline of {days_available} day(s) would require {required} workers (cap is {max_crew})"
    )]
    InsufficientTime {
        days_available: u32,
        required: u64,
        max_crew: u32,
    },
}

impl QuoteError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        QuoteError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// The request field the error is attributable to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            QuoteError::Validation { field, .. } => Some(field),
            QuoteError::UnknownCountry(_) => Some("country"),
            QuoteError::UnknownFenceType(_) => Some("fence_type"),
            QuoteError::InsufficientTime { .. } => Some("days_available"),
        }
    }
}

/// Checks shared by both engines: identifiers present, meters positive.
pub(super) fn validate_common(
    user_name: &str,
    project_name: &str,
    meters: f64,
) -> Result<(), QuoteError> {
    if user_name.trim().is_empty() {
        return Err(QuoteError::validation("user_name", "must not be empty"));
    }
    if project_name.trim().is_empty() {
        return Err(QuoteError::validation("project_name", "must not be empty"));
    }
    if !meters.is_finite() || meters <= 0.0 {
        return Err(QuoteError::validation("meters", "must be a positive number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_fixing_serde_uses_display_names() {
        let json = serde_json::to_string(&GroundFixingMethod::InnerGmsPostWithBaseplate).unwrap();
        assert_eq!(json, "\"Inner GMS Post with Baseplate\"");
        let parsed: GroundFixingMethod = serde_json::from_str("\"Angle Steel\"").unwrap();
        assert_eq!(parsed, GroundFixingMethod::AngleSteel);
    }

    #[test]
    fn ground_fixing_defaults_to_angle_steel() {
        let req: InternationalRequest = serde_json::from_value(serde_json::json!({
            "user_name": "amy",
            "project_name": "track",
            "country": "France",
            "fence_type": "OR",
            "meters": 100.0,
            "gates": 0
        }))
        .unwrap();
        assert_eq!(req.ground_fixing_method, GroundFixingMethod::AngleSteel);
    }

    #[test]
    fn market_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Market::Uk).unwrap(), "\"uk\"");
        assert_eq!(Market::International.as_str(), "international");
    }

    #[test]
    fn validate_common_rejects_blank_names() {
        assert_eq!(
            validate_common("  ", "p", 10.0).unwrap_err().field(),
            Some("user_name")
        );
        assert_eq!(
            validate_common("u", "", 10.0).unwrap_err().field(),
            Some("project_name")
        );
    }

    #[test]
    fn validate_common_rejects_bad_meters() {
        for m in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = validate_common("u", "p", m).unwrap_err();
            assert_eq!(err.field(), Some("meters"), "meters={}", m);
        }
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = QuoteError::validation("days_available", "required when time-sensitive");
        assert_eq!(err.to_string(), "days_available: required when time-sensitive");
        assert_eq!(
            QuoteError::UnknownFenceType("ZZ".into()).to_string(),
            "unknown fence type 'ZZ'"
        );
    }

    #[test]
    fn breakdown_rounded_preserves_structure() {
        let b = CostBreakdown {
            work_days: 3,
            daily_rate_per_man: 195.3333333,
            labor_cost: 1000.005,
            tools_cost: 500.0,
            supervision_cost: Some(750.12345),
            flight_ticket: Some(500.0),
            ground_fixing_cost: Some(0.0),
            accommodation_cost: None,
            transportation_cost: None,
            concrete_cost: None,
            num_labourers: None,
            raw_total: 2750.12845,
            rate_per_meter: 27.5012845,
            markup_30: 3575.166985,
            markup_40: 3850.17983,
            markup_50: 4125.192675,
            markup_60: 4400.20552,
            bad_case_20: 3300.15414,
            more_bad_case_40: 3850.17983,
            worst_case_80: 4950.23121,
        };
        let r = b.rounded();
        assert_eq!(r.work_days, 3);
        assert_eq!(r.daily_rate_per_man, 195.33);
        assert_eq!(r.supervision_cost, Some(750.12));
        assert!(r.accommodation_cost.is_none());
        // Full-precision original is untouched
        assert_eq!(b.rate_per_meter, 27.5012845);
    }

    #[test]
    fn market_specific_fields_skipped_when_absent() {
        let b = CostBreakdown {
            work_days: 1,
            daily_rate_per_man: 200.0,
            labor_cost: 400.0,
            tools_cost: 300.0,
            supervision_cost: None,
            flight_ticket: None,
            ground_fixing_cost: None,
            accommodation_cost: Some(150.0),
            transportation_cost: Some(0.0),
            concrete_cost: Some(240.0),
            num_labourers: Some(2),
            raw_total: 1090.0,
            rate_per_meter: 9.08,
            markup_30: 1417.0,
            markup_40: 1526.0,
            markup_50: 1635.0,
            markup_60: 1744.0,
            bad_case_20: 1308.0,
            more_bad_case_40: 1526.0,
            worst_case_80: 1962.0,
        };
        let v = serde_json::to_value(&b).unwrap();
        assert!(v.get("supervision_cost").is_none());
        assert!(v.get("accommodation_cost").is_some());
        assert_eq!(v["num_labourers"], 2);
    }
}
