//! UK market engine: variable crew size, deadline-driven scheduling,
//! accommodation/transportation/concrete costs, custom fence types.
//!
//! Productivity is per worker. Two mutually exclusive scheduling modes:
//!
//! - **Deadline mode** (`is_time_sensitive`): the crew is sized to meet the
//!   given number of available days. The smallest crew `n` with
//!   `n * productivity * days >= meters` wins; crews above the configured
//!   `max_crew` cap fail the quote instead of silently ballooning.
//! - **Crew-size mode**: the crew is taken from the request (default 2) and
//!   the schedule follows from it.

use super::scenario::scenario_totals;
use super::types::{validate_common, CostBreakdown, QuoteError, UkRequest};
use crate::rates::RateBook;

/// Sentinel fence-type code for caller-defined types.
pub const CUSTOM_FENCE_TYPE: &str = "CUSTOM";

/// Resolved per-worker productivity and whether the type needs concrete.
struct ResolvedFence {
    productivity: f64,
    needs_concrete: bool,
}

fn resolve_fence(req: &UkRequest, rates: &RateBook) -> Result<ResolvedFence, QuoteError> {
    if req.fence_type == CUSTOM_FENCE_TYPE {
        if req
            .custom_fence_name
            .as_deref()
            .map_or(true, |n| n.trim().is_empty())
        {
            return Err(QuoteError::validation(
                "custom_fence_name",
                "required for CUSTOM fence type",
            ));
        }
        let rate = req.custom_daily_rate.ok_or_else(|| {
            QuoteError::validation("custom_daily_rate", "required for CUSTOM fence type")
        })?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(QuoteError::validation(
                "custom_daily_rate",
                "must be a positive number",
            ));
        }
        return Ok(ResolvedFence {
            productivity: rate,
            needs_concrete: false,
        });
    }

    let entry = rates
        .uk
        .fence_type(&req.fence_type)
        .ok_or_else(|| QuoteError::UnknownFenceType(req.fence_type.clone()))?;
    Ok(ResolvedFence {
        productivity: entry.productivity,
        needs_concrete: entry.needs_concrete,
    })
}

/// Resolved crew size and schedule length for the request.
fn resolve_crew(
    req: &UkRequest,
    productivity: f64,
    rates: &RateBook,
) -> Result<(u32, u32), QuoteError> {
    if req.is_time_sensitive {
        let days = req.days_available.ok_or_else(|| {
            QuoteError::validation("days_available", "required when time-sensitive")
        })?;
        if days == 0 {
            return Err(QuoteError::validation("days_available", "must be at least 1"));
        }
        // Smallest crew meeting n * p * days >= meters
        let required = (req.meters / (productivity * f64::from(days))).ceil() as u64;
        let required = required.max(1);
        if required > u64::from(rates.uk.max_crew) {
            return Err(QuoteError::InsufficientTime {
                days_available: days,
                required,
                max_crew: rates.uk.max_crew,
            });
        }
        // The deadline fixes the schedule; the crew was sized to meet it
        Ok((required as u32, days))
    } else {
        let crew = match req.num_labourers {
            Some(n) if n > 0 => n,
            _ => rates.uk.default_crew,
        };
        let days = req.meters / (f64::from(crew) * productivity);
        Ok((crew, (days.ceil() as u32).max(1)))
    }
}

/// Compute a full cost breakdown for a UK project.
/// Pure: no I/O, no persistence.
pub fn preview(req: &UkRequest, rates: &RateBook) -> Result<CostBreakdown, QuoteError> {
    validate_common(&req.user_name, &req.project_name, req.meters)?;
    if let Some(hours) = req.driving_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(QuoteError::validation(
                "driving_hours",
                "must be non-negative",
            ));
        }
    }

    let fence = resolve_fence(req, rates)?;
    let (num_labourers, work_days) = resolve_crew(req, fence.productivity, rates)?;

    let uk = &rates.uk;
    let daily_rate_per_man = match req.daily_labor_rate {
        Some(rate) if rate > 0.0 => rate,
        _ => uk.daily_rate_per_man,
    };

    let crew = f64::from(num_labourers);
    let days = f64::from(work_days);
    let labor_cost = days * daily_rate_per_man * crew;
    let tools_cost = uk.tools_base + uk.tools_per_day * days;
    let accommodation_cost = days * crew * uk.accommodation_per_day_per_man;
    let transportation_cost = req.driving_hours.unwrap_or(0.0) * uk.transport_per_driving_hour;
    let concrete_cost = if fence.needs_concrete {
        req.meters * uk.concrete_per_meter
    } else {
        0.0
    };

    let raw_total =
        labor_cost + tools_cost + accommodation_cost + transportation_cost + concrete_cost;
    let rate_per_meter = raw_total / req.meters;
    let tiers = scenario_totals(raw_total);

    Ok(CostBreakdown {
        work_days,
        daily_rate_per_man,
        labor_cost,
        tools_cost,
        supervision_cost: None,
        flight_ticket: None,
        ground_fixing_cost: None,
        accommodation_cost: Some(accommodation_cost),
        transportation_cost: Some(transportation_cost),
        concrete_cost: Some(concrete_cost),
        num_labourers: Some(num_labourers),
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
