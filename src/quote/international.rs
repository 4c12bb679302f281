//! International market engine: fixed 8-man crew, wage-derived labor rates,
//! optional ground-fixing surcharge.
//!
//! Productivity is expressed per crew (the whole 8-man team), so the
//! schedule is a single ceiling division. The daily labor rate per man is
//! derived from the destination country's statutory minimum wage (doubled,
//! over an 8-hour day) unless the request carries a manual override.

use super::scenario::scenario_totals;
use super::types::{validate_common, CostBreakdown, GroundFixingMethod, InternationalRequest, QuoteError};
use crate::rates::RateBook;

/// Compute a full cost breakdown for an International project.
/// Pure: no I/O, no persistence.
pub fn preview(req: &InternationalRequest, rates: &RateBook) -> Result<CostBreakdown, QuoteError> {
    validate_common(&req.user_name, &req.project_name, req.meters)?;

    let min_wage = *rates
        .countries
        .get(&req.country)
        .ok_or_else(|| QuoteError::UnknownCountry(req.country.clone()))?;

    let crew_productivity = *rates
        .international
        .productivity
        .get(&req.fence_type)
        .ok_or_else(|| QuoteError::UnknownFenceType(req.fence_type.clone()))?;

    let intl = &rates.international;

    // Countries with no statutory minimum (table value 0) use the floor rate
    let min_wage = if min_wage > 0.0 {
        min_wage
    } else {
        intl.wage_fallback
    };

    let work_days = ((req.meters / crew_productivity).ceil() as u32).max(1);

    let daily_rate_per_man = match req.manual_daily_labor_rate {
        Some(rate) if rate > 0.0 => rate,
        _ => 2.0 * min_wage * 8.0,
    };

    let crew = f64::from(intl.crew_size);
    let labor_cost = f64::from(work_days) * daily_rate_per_man * crew;
    let tools_cost = intl.tools_base + intl.tools_per_day * f64::from(work_days);
    let supervision_cost = intl.supervision_per_day * f64::from(work_days);
    let flight_ticket = intl.flight_ticket;
    let ground_fixing_cost = match req.ground_fixing_method {
        GroundFixingMethod::AngleSteel => 0.0,
        GroundFixingMethod::InnerGmsPostWithBaseplate => req.meters * intl.ground_fixing_per_meter,
    };

    let raw_total =
        labor_cost + tools_cost + supervision_cost + flight_ticket + ground_fixing_cost;
    let rate_per_meter = raw_total / req.meters;
    let tiers = scenario_totals(raw_total);

    Ok(CostBreakdown {
        work_days,
        daily_rate_per_man,
        labor_cost,
        tools_cost,
        supervision_cost: Some(supervision_cost),
        flight_ticket: Some(flight_ticket),
        ground_fixing_cost: Some(ground_fixing_cost),
        accommodation_cost: None,
        transportation_cost: None,
        concrete_cost: None,
        num_labourers: None,
        raw_total,
        rate_per_meter,
        markup_30: tiers.markup_30,
        markup_40: tiers.markup_40,
        markup_50: tiers.markup_50,
        markup_60: tiers.markup_60,
        bad_case_20: tiers.bad_case_20,
        more_bad_case_40: tiers.more_bad_case_40,
        worst_case_80: tiers.worst_case_80,
    })
}
