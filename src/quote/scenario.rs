//! Shared scenario and markup math.
//!
//! Both market engines end in the same place: a raw total fanned out into
//! four markup tiers (quoting margin options) and three risk tiers (cost
//! overrun scenarios). Pure arithmetic, no state, never fails for a
//! non-negative total.

use serde::Serialize;

/// Markup percentages offered as quoting margin options.
pub const MARKUP_TIERS: [f64; 4] = [0.30, 0.40, 0.50, 0.60];

/// Risk inflation percentages modeling cost overrun scenarios.
pub const RISK_TIERS: [f64; 3] = [0.20, 0.40, 0.80];

/// The seven speculative totals derived from a raw total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioTotals {
    pub markup_30: f64,
    pub markup_40: f64,
    pub markup_50: f64,
    pub markup_60: f64,
    pub bad_case_20: f64,
    pub more_bad_case_40: f64,
    pub worst_case_80: f64,
}

/// Fan a raw total out into all markup and risk tiers.
pub fn scenario_totals(raw_total: f64) -> ScenarioTotals {
    let tier = |p: f64| raw_total * (1.0 + p);
    ScenarioTotals {
        markup_30: tier(MARKUP_TIERS[0]),
        markup_40: tier(MARKUP_TIERS[1]),
        markup_50: tier(MARKUP_TIERS[2]),
        markup_60: tier(MARKUP_TIERS[3]),
        bad_case_20: tier(RISK_TIERS[0]),
        more_bad_case_40: tier(RISK_TIERS[1]),
        worst_case_80: tier(RISK_TIERS[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_tiers_strictly_increase() {
        let s = scenario_totals(1234.56);
        assert!(s.markup_30 < s.markup_40);
        assert!(s.markup_40 < s.markup_50);
        assert!(s.markup_50 < s.markup_60);
    }

    #[test]
    fn risk_tiers_strictly_increase() {
        let s = scenario_totals(987.65);
        assert!(s.bad_case_20 < s.more_bad_case_40);
        assert!(s.more_bad_case_40 < s.worst_case_80);
    }

    #[test]
    fn markup_40_equals_more_bad_case_40() {
        // Both are raw_total * 1.4; the distinction is presentational
        let s = scenario_totals(500.0);
        assert_eq!(s.markup_40, s.more_bad_case_40);
    }

    #[test]
    fn zero_total_yields_all_zero_tiers() {
        let s = scenario_totals(0.0);
        assert_eq!(s.markup_30, 0.0);
        assert_eq!(s.worst_case_80, 0.0);
    }

    #[test]
    fn tiers_are_exact_multiples() {
        let s = scenario_totals(1000.0);
        assert_eq!(s.markup_30, 1300.0);
        assert_eq!(s.markup_60, 1600.0);
        assert_eq!(s.bad_case_20, 1200.0);
        assert_eq!(s.worst_case_80, 1800.0);
    }
}
