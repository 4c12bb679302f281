//! Rate book configuration: the per-market tables that parameterize the
//! quoting engines.
//!
//! The engines never read global constants; every wage, productivity and cost
//! rate is injected through a [`RateBook`] so operators can override pricing
//! without a rebuild and tests can run against synthetic tables. A TOML file
//! overrides any subset of the built-in defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level rate configuration parsed from TOML files.
///
/// Maps to the `[countries]`, `[international]`, and `[uk]` sections of a
/// rates TOML. Every field has a built-in default, so an empty file (or no
/// file at all) yields the standard book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBook {
    /// Country name → statutory minimum hourly wage, local-comparable money.
    /// Drives the International daily labor rate. Entries with wage 0.0
    /// (no statutory minimum, e.g. the Nordics) fall back to
    /// `international.wage_fallback` at quote time.
    #[serde(default = "default_country_wages")]
    pub countries: BTreeMap<String, f64>,
    #[serde(default)]
    pub international: InternationalRates,
    #[serde(default)]
    pub uk: UkRates,
}

/// The `[international]` section: 8-man-crew market parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternationalRates {
    /// Fixed crew size for international deployments.
    #[serde(default = "default_intl_crew")]
    pub crew_size: u32,
    /// Daily labor rate floor used when a country has no statutory minimum wage.
    #[serde(default = "default_wage_fallback")]
    pub wage_fallback: f64,
    /// Fence-type code → meters/day for the whole crew.
    #[serde(default = "default_intl_productivity")]
    pub productivity: BTreeMap<String, f64>,
    #[serde(default = "default_tools_base")]
    pub tools_base: f64,
    #[serde(default = "default_tools_per_day")]
    pub tools_per_day: f64,
    #[serde(default = "default_supervision_per_day")]
    pub supervision_per_day: f64,
    /// Flat return-flight allowance per project.
    #[serde(default = "default_flight_ticket")]
    pub flight_ticket: f64,
    /// Surcharge per meter when ground fixing uses the baseplate method.
    #[serde(default = "default_ground_fixing_per_meter")]
    pub ground_fixing_per_meter: f64,
}

/// The `[uk]` section: variable-crew market parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkRates {
    /// Standard daily labor rate per worker (£/day).
    #[serde(default = "default_uk_daily_rate")]
    pub daily_rate_per_man: f64,
    #[serde(default = "default_accommodation")]
    pub accommodation_per_day_per_man: f64,
    /// Transportation cost per one-way driving hour.
    #[serde(default = "default_transport_per_hour")]
    pub transport_per_driving_hour: f64,
    #[serde(default = "default_concrete_per_meter")]
    pub concrete_per_meter: f64,
    #[serde(default = "default_tools_base")]
    pub tools_base: f64,
    #[serde(default = "default_tools_per_day")]
    pub tools_per_day: f64,
    /// Crew size used in crew-size mode when the request does not supply one.
    #[serde(default = "default_uk_crew")]
    pub default_crew: u32,
    /// Largest crew deadline mode may schedule before failing the quote.
    #[serde(default = "default_max_crew")]
    pub max_crew: u32,
    /// Known fence types with per-worker productivity and concrete requirement.
    #[serde(default = "default_uk_fence_types")]
    pub fence_types: Vec<UkFenceType>,
}

/// A UK fence-type table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkFenceType {
    pub code: String,
    /// Meters/day a single worker installs for this type.
    pub productivity: f64,
    /// Whether installation requires concrete (per-meter cost applies).
    #[serde(default)]
    pub needs_concrete: bool,
}

fn default_intl_crew() -> u32 {
    8
}

fn default_wage_fallback() -> f64 {
    15.0
}

fn default_tools_base() -> f64 {
    200.0
}

fn default_tools_per_day() -> f64 {
    100.0
}

fn default_supervision_per_day() -> f64 {
    250.0
}

fn default_flight_ticket() -> f64 {
    500.0
}

fn default_ground_fixing_per_meter() -> f64 {
    0.078
}

fn default_uk_daily_rate() -> f64 {
    200.0
}

fn default_accommodation() -> f64 {
    75.0
}

fn default_transport_per_hour() -> f64 {
    250.0
}

fn default_concrete_per_meter() -> f64 {
    2.0
}

fn default_uk_crew() -> u32 {
    2
}

fn default_max_crew() -> u32 {
    50
}

fn default_intl_productivity() -> BTreeMap<String, f64> {
    // Only the OR rate is published (136 m/day per 8-man crew); PR1/PR2 are
    // operator-tuned and these defaults are starting points.
    BTreeMap::from([
        ("OR".to_string(), 136.0),
        ("PR1".to_string(), 90.0),
        ("PR2".to_string(), 90.0),
    ])
}

fn default_uk_fence_types() -> Vec<UkFenceType> {
    let entry = |code: &str, productivity: f64, needs_concrete: bool| UkFenceType {
        code: code.to_string(),
        productivity,
        needs_concrete,
    };
    vec![
        entry("OR", 270.0, false),
        entry("PR", 60.0, true),
        entry("CM", 60.0, true),
        entry("CT", 60.0, true),
        entry("HM", 60.0, true),
    ]
}

fn default_country_wages() -> BTreeMap<String, f64> {
    [
        ("United Kingdom", 12.21),
        ("Ireland", 13.50),
        ("France", 11.88),
        ("Germany", 12.82),
        ("Netherlands", 13.68),
        ("Belgium", 12.01),
        ("Spain", 8.51),
        ("Italy", 9.80),
        ("Portugal", 5.23),
        ("Poland", 4.95),
        ("Czech Republic", 4.95),
        ("Austria", 12.85),
        ("Switzerland", 25.00),
        ("Sweden", 0.00),
        ("Norway", 0.00),
        ("Denmark", 0.00),
        ("United Arab Emirates", 2.72),
        ("Saudi Arabia", 2.67),
        ("Qatar", 2.00),
        ("Kuwait", 2.72),
        ("Oman", 1.68),
        ("Bahrain", 2.13),
        ("Turkey", 3.29),
        ("Egypt", 1.36),
        ("Jordan", 2.27),
        ("Lebanon", 1.00),
        ("United States", 7.25),
        ("Canada", 11.00),
        ("Australia", 23.23),
        ("New Zealand", 22.70),
    ]
    .into_iter()
    .map(|(name, wage)| (name.to_string(), wage))
    .collect()
}

impl Default for InternationalRates {
    fn default() -> Self {
        Self {
            crew_size: default_intl_crew(),
            wage_fallback: default_wage_fallback(),
            productivity: default_intl_productivity(),
            tools_base: default_tools_base(),
            tools_per_day: default_tools_per_day(),
            supervision_per_day: default_supervision_per_day(),
            flight_ticket: default_flight_ticket(),
            ground_fixing_per_meter: default_ground_fixing_per_meter(),
        }
    }
}

impl Default for UkRates {
    fn default() -> Self {
        Self {
            daily_rate_per_man: default_uk_daily_rate(),
            accommodation_per_day_per_man: default_accommodation(),
            transport_per_driving_hour: default_transport_per_hour(),
            concrete_per_meter: default_concrete_per_meter(),
            tools_base: default_tools_base(),
            tools_per_day: default_tools_per_day(),
            default_crew: default_uk_crew(),
            max_crew: default_max_crew(),
            fence_types: default_uk_fence_types(),
        }
    }
}

impl Default for RateBook {
    fn default() -> Self {
        Self {
            countries: default_country_wages(),
            international: InternationalRates::default(),
            uk: UkRates::default(),
        }
    }
}

impl UkRates {
    /// Look up a fence-type entry by code.
    pub fn fence_type(&self, code: &str) -> Option<&UkFenceType> {
        self.fence_types.iter().find(|ft| ft.code == code)
    }
}

// ── TOML Parsing ────────────────────────────────────────────────

/// Parse a rate book from a TOML string.
pub fn parse_toml(content: &str) -> Result<RateBook> {
    let book: RateBook = toml::from_str(content)?;
    validate_book(&book)?;
    Ok(book)
}

/// Parse a rate book from a TOML file path.
pub fn parse_toml_file(path: &std::path::Path) -> Result<RateBook> {
    let content = std::fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a rate book from an optional path, falling back to the built-in book.
pub fn load_or_default(path: Option<&std::path::Path>) -> Result<RateBook> {
    match path {
        Some(p) => parse_toml_file(p),
        None => Ok(RateBook::default()),
    }
}

/// Validate a rate book for logical consistency.
fn validate_book(book: &RateBook) -> Result<()> {
    if book.countries.is_empty() {
        anyhow::bail!("countries table must not be empty");
    }
    if book.international.crew_size == 0 {
        anyhow::bail!("international.crew_size must be positive");
    }
    for (code, productivity) in &book.international.productivity {
        if *productivity <= 0.0 {
            anyhow::bail!("international productivity for '{}' must be positive", code);
        }
    }
    if book.uk.fence_types.is_empty() {
        anyhow::bail!("uk.fence_types must not be empty");
    }
    for ft in &book.uk.fence_types {
        if ft.productivity <= 0.0 {
            anyhow::bail!("uk productivity for '{}' must be positive", ft.code);
        }
    }
    if book.uk.daily_rate_per_man <= 0.0 {
        anyhow::bail!("uk.daily_rate_per_man must be positive");
    }
    if book.uk.default_crew == 0 {
        anyhow::bail!("uk.default_crew must be positive");
    }
    if book.uk.max_crew < book.uk.default_crew {
        anyhow::bail!("uk.max_crew must be at least uk.default_crew");
    }
    Ok(())
}
