//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! offline estimator subcommands, which price a project from flags and print
//! the rounded breakdown as JSON without touching the database.

use anyhow::Result;
use clap::Subcommand;
use railquote::quote::{self, GroundFixingMethod, InternationalRequest, UkRequest};
use railquote::rates::RateBook;
use tracing::info;

#[derive(Subcommand)]
pub enum EstimateMarket {
    /// International project: fixed 8-man crew, wage-derived labor rate
    International {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        project_name: String,
        /// Installation country (drives the minimum-wage lookup)
        #[arg(long)]
        country: String,
        /// Fence type code (OR, PR1, PR2)
        #[arg(long)]
        fence_type: String,
        /// Fence length in meters
        #[arg(long)]
        meters: f64,
        /// Number of gates (recorded with the project, not costed)
        #[arg(long, default_value_t = 0)]
        gates: u32,
        /// Ground fixing method: "Angle Steel" or "Inner GMS Post with Baseplate"
        #[arg(long, default_value = "Angle Steel")]
        ground_fixing: String,
        /// Override the wage-derived daily labor rate per man
        #[arg(long)]
        manual_daily_labor_rate: Option<f64>,
    },
    /// UK project: variable crew, optional deadline scheduling
    Uk {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        project_name: String,
        /// Fence type code (OR, PR, CM, CT, HM, or CUSTOM)
        #[arg(long)]
        fence_type: String,
        /// Fence length in meters
        #[arg(long)]
        meters: f64,
        /// Number of gates (recorded with the project, not costed)
        #[arg(long, default_value_t = 0)]
        gates: u32,
        /// Deadline in days; the crew is sized to meet it
        #[arg(long)]
        days_available: Option<u32>,
        /// Crew size when no deadline is given (default 2)
        #[arg(long)]
        num_labourers: Option<u32>,
        /// Name for a CUSTOM fence type
        #[arg(long)]
        custom_fence_name: Option<String>,
        /// Per-man productivity in m/day for a CUSTOM fence type
        #[arg(long)]
        custom_daily_rate: Option<f64>,
        /// Override the standard daily labor rate per man
        #[arg(long)]
        daily_labor_rate: Option<f64>,
        /// One-way driving hours to site (drives the transportation cost)
        #[arg(long)]
        driving_hours: Option<f64>,
    },
}

pub fn run_estimate(market: &EstimateMarket, rates: &RateBook) -> Result<()> {
    let breakdown = match market {
        EstimateMarket::International {
            user_name,
            project_name,
            country,
            fence_type,
            meters,
            gates,
            ground_fixing,
            manual_daily_labor_rate,
        } => {
            let ground_fixing_method: GroundFixingMethod =
                serde_json::from_value(serde_json::Value::String(ground_fixing.clone()))
                    .map_err(|_| {
                        anyhow::anyhow!("unknown ground fixing method '{ground_fixing}'")
                    })?;
            let req = InternationalRequest {
                user_name: user_name.clone(),
                project_name: project_name.clone(),
                country: country.clone(),
                fence_type: fence_type.clone(),
                meters: *meters,
                gates: *gates,
                ground_fixing_method,
                manual_daily_labor_rate: *manual_daily_labor_rate,
            };
            info!(country = %req.country, fence_type = %req.fence_type, meters = req.meters,
                "estimating international project");
            quote::international::preview(&req, rates)?
        }
        EstimateMarket::Uk {
            user_name,
            project_name,
            fence_type,
            meters,
            gates,
            days_available,
            num_labourers,
            custom_fence_name,
            custom_daily_rate,
            daily_labor_rate,
            driving_hours,
        } => {
            let req = UkRequest {
                user_name: user_name.clone(),
                project_name: project_name.clone(),
                fence_type: fence_type.clone(),
                meters: *meters,
                gates: *gates,
                delivery_lead: None,
                delivery_copilot: None,
                is_time_sensitive: days_available.is_some(),
                days_available: *days_available,
                num_labourers: *num_labourers,
                custom_fence_name: custom_fence_name.clone(),
                custom_daily_rate: *custom_daily_rate,
                daily_labor_rate: *daily_labor_rate,
                driving_hours: *driving_hours,
            };
            info!(fence_type = %req.fence_type, meters = req.meters,
                "estimating uk project");
            quote::uk::preview(&req, rates)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&breakdown.rounded())?);
    Ok(())
}
