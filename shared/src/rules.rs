//! Advisory rule engine
//!
//! Rules are data: a predicate over a [`WeatherObservation`] plus the
//! category, severity and message template of the advisory it produces.
//! The engine evaluates every rule, renders the messages of the rules that
//! fire and returns them in a deterministic total order:
//! severity (most urgent first), then category, then rule id.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{AdvisoryItem, WeatherObservation};
use crate::types::{AdvisoryCategory, Severity};

/// Version of the rule table returned by [`default_rules`]
pub const DEFAULT_RULE_SET_VERSION: &str = "2024.1";

/// Pure test over an observation
pub type Predicate = fn(&WeatherObservation) -> bool;

/// A single declarative advisory rule
#[derive(Clone)]
pub struct AdvisoryRule {
    pub id: String,
    pub category: AdvisoryCategory,
    pub severity: Severity,
    pub predicate: Predicate,
    /// Message text; may reference `{district}`, `{temperature_c}`,
    /// `{humidity_pct}`, `{rainfall_mm}` and `{wind_speed_kph}`
    pub message_template: String,
}

impl AdvisoryRule {
    pub fn new(
        id: impl Into<String>,
        category: AdvisoryCategory,
        severity: Severity,
        predicate: Predicate,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            predicate,
            message_template: message_template.into(),
        }
    }

    pub fn matches(&self, observation: &WeatherObservation) -> bool {
        (self.predicate)(observation)
    }
}

impl std::fmt::Debug for AdvisoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryRule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .field("message_template", &self.message_template)
            .finish_non_exhaustive()
    }
}

/// Errors raised while assembling a rule set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),

    #[error("Rule id cannot be empty")]
    EmptyRuleId,

    #[error("Rule set version cannot be empty")]
    EmptyVersion,
}

/// A versioned collection of rules with unique ids
#[derive(Debug, Clone)]
pub struct RuleSet {
    version: String,
    rules: Vec<AdvisoryRule>,
}

impl RuleSet {
    pub fn new(version: impl Into<String>, rules: Vec<AdvisoryRule>) -> Result<Self, RuleSetError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(RuleSetError::EmptyVersion);
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.id.trim().is_empty() {
                return Err(RuleSetError::EmptyRuleId);
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleSetError::DuplicateRuleId(rule.id.clone()));
            }
        }

        Ok(Self { version, rules })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[AdvisoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the observation, stamping items with the current time
    pub fn evaluate(&self, observation: &WeatherObservation) -> Vec<AdvisoryItem> {
        self.evaluate_at(observation, Utc::now())
    }

    /// Evaluate the observation with an explicit generation timestamp
    ///
    /// The same observation and timestamp always yield an identical list.
    pub fn evaluate_at(
        &self,
        observation: &WeatherObservation,
        generated_at: DateTime<Utc>,
    ) -> Vec<AdvisoryItem> {
        let mut seen = HashSet::new();
        let mut items: Vec<AdvisoryItem> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(observation))
            .filter(|rule| seen.insert(rule.id.as_str()))
            .map(|rule| AdvisoryItem {
                rule_id: rule.id.clone(),
                category: rule.category,
                severity: rule.severity,
                message: render_template(&rule.message_template, observation),
                translated_message: None,
                translation_degraded: false,
                district: observation.district.clone(),
                generated_at,
            })
            .collect();

        items.sort_by(advisory_order);
        items
    }
}

/// Total order for advisories: severity descending, category, rule id
pub fn advisory_order(a: &AdvisoryItem, b: &AdvisoryItem) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.rule_id.cmp(&b.rule_id))
}

/// Substitute observation values into a message template
pub fn render_template(template: &str, observation: &WeatherObservation) -> String {
    template
        .replace("{district}", &observation.district)
        .replace("{temperature_c}", &format_reading(observation.temperature_c))
        .replace("{humidity_pct}", &format_reading(observation.humidity_pct))
        .replace("{rainfall_mm}", &format_reading(observation.rainfall_mm))
        .replace("{wind_speed_kph}", &format_reading(observation.wind_speed_kph))
}

fn format_reading(value: Decimal) -> String {
    value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

// ============================================================================
// Default rule table
// ============================================================================

fn dec(value: i64, scale: u32) -> Decimal {
    Decimal::new(value, scale)
}

fn between(value: Decimal, low: i64, high: i64) -> bool {
    value >= Decimal::from(low) && value <= Decimal::from(high)
}

fn is_drought(o: &WeatherObservation) -> bool {
    o.rainfall_mm < dec(25, 1) && o.humidity_pct < dec(30, 0) && o.temperature_c >= dec(35, 0)
}

fn is_dry_spell(o: &WeatherObservation) -> bool {
    o.rainfall_mm < dec(25, 1) && o.humidity_pct < dec(45, 0) && !is_drought(o)
}

fn is_heavy_rain(o: &WeatherObservation) -> bool {
    o.rainfall_mm >= dec(50, 0)
}

fn is_flood_risk(o: &WeatherObservation) -> bool {
    o.rainfall_mm >= dec(200, 0)
}

fn is_fungal_pressure(o: &WeatherObservation) -> bool {
    o.humidity_pct >= dec(85, 0) && between(o.temperature_c, 20, 32)
}

fn is_spray_drift_wind(o: &WeatherObservation) -> bool {
    o.wind_speed_kph >= dec(20, 0) && o.wind_speed_kph < dec(40, 0)
}

fn is_sowing_window(o: &WeatherObservation) -> bool {
    o.rainfall_mm >= dec(10, 0)
        && o.rainfall_mm < dec(50, 0)
        && between(o.temperature_c, 20, 32)
        && o.wind_speed_kph < dec(40, 0)
}

fn is_harvest_rain(o: &WeatherObservation) -> bool {
    o.rainfall_mm >= dec(10, 0)
}

fn is_dry_harvest_window(o: &WeatherObservation) -> bool {
    o.rainfall_mm < dec(1, 0) && o.humidity_pct < dec(60, 0) && o.wind_speed_kph < dec(20, 0)
}

fn is_high_wind(o: &WeatherObservation) -> bool {
    o.wind_speed_kph >= dec(40, 0)
}

fn is_extreme_heat(o: &WeatherObservation) -> bool {
    o.temperature_c >= dec(42, 0)
}

fn is_frost_risk(o: &WeatherObservation) -> bool {
    o.temperature_c <= dec(2, 0)
}

/// The shipped agronomic rule table
///
/// Rules sharing a category are written to be mutually exclusive where their
/// advice would contradict (e.g. drought vs. dry spell vs. heavy rain).
pub fn default_rules() -> RuleSet {
    use AdvisoryCategory::*;
    use Severity::*;

    let rules = vec![
        AdvisoryRule::new(
            "drought-irrigation",
            Irrigation,
            Warning,
            is_drought,
            "Low rainfall ({rainfall_mm} mm) with {temperature_c}°C heat and {humidity_pct}% humidity in {district}. Increase irrigation and water in the early morning or evening.",
        ),
        AdvisoryRule::new(
            "dry-spell-irrigation",
            Irrigation,
            Advisory,
            is_dry_spell,
            "Little rainfall ({rainfall_mm} mm) and dry air ({humidity_pct}% humidity) in {district}. Check soil moisture and schedule irrigation for sensitive crops.",
        ),
        AdvisoryRule::new(
            "heavy-rain-irrigation-pause",
            Irrigation,
            Info,
            is_heavy_rain,
            "Heavy rainfall of {rainfall_mm} mm recorded in {district}. Pause irrigation and clear field drainage channels.",
        ),
        AdvisoryRule::new(
            "fungal-disease-pressure",
            PestRisk,
            Advisory,
            is_fungal_pressure,
            "High humidity ({humidity_pct}%) at {temperature_c}°C favours fungal disease and pest build-up. Inspect crops and apply preventive treatment where needed.",
        ),
        AdvisoryRule::new(
            "spray-drift-wind",
            PestRisk,
            Info,
            is_spray_drift_wind,
            "Winds of {wind_speed_kph} km/h will carry spray drift. Postpone pesticide and fertiliser spraying.",
        ),
        AdvisoryRule::new(
            "sowing-window",
            PlantingWindow,
            Info,
            is_sowing_window,
            "Rainfall of {rainfall_mm} mm has restored soil moisture in {district}. Conditions suit sowing.",
        ),
        AdvisoryRule::new(
            "harvest-rain-delay",
            HarvestTiming,
            Advisory,
            is_harvest_rain,
            "Rain ({rainfall_mm} mm) is wetting standing crops. Delay harvesting until fields and produce dry out.",
        ),
        AdvisoryRule::new(
            "dry-harvest-window",
            HarvestTiming,
            Info,
            is_dry_harvest_window,
            "Dry, calm conditions ({humidity_pct}% humidity, {wind_speed_kph} km/h wind). A good window to harvest and sun-dry produce.",
        ),
        AdvisoryRule::new(
            "high-wind-harvest",
            HarvestTiming,
            Warning,
            is_high_wind,
            "Strong winds of {wind_speed_kph} km/h can flatten mature crops. Harvest ready produce early and stake tall plants.",
        ),
        AdvisoryRule::new(
            "flood-risk",
            General,
            Critical,
            is_flood_risk,
            "Extreme rainfall of {rainfall_mm} mm in {district}. Move livestock and stored produce to higher ground and watch for flooding.",
        ),
        AdvisoryRule::new(
            "extreme-heat",
            General,
            Critical,
            is_extreme_heat,
            "Extreme heat of {temperature_c}°C in {district}. Provide shade and water for livestock and avoid field work at midday.",
        ),
        AdvisoryRule::new(
            "frost-risk",
            General,
            Critical,
            is_frost_risk,
            "Temperature has dropped to {temperature_c}°C in {district}. Cover nurseries and seedlings against frost injury.",
        ),
    ];

    RuleSet { version: DEFAULT_RULE_SET_VERSION.to_string(), rules }
}
