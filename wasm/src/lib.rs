//! WebAssembly module for the Farm Advisory Service
//!
//! Provides client-side computation for:
//! - Advisory evaluation against the shipped rule table
//! - District name validation and normalization
//!
//! Lets offline clients show advisories from a cached observation without
//! a round trip to the server.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::rules::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Evaluate an observation (JSON) and return the advisory list as JSON
#[wasm_bindgen]
pub fn evaluate_advisories(observation_json: &str) -> Result<String, JsValue> {
    evaluate_json(observation_json, now()).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })
}

/// Evaluate a reading given as plain numbers
#[wasm_bindgen]
pub fn evaluate_reading(
    district: &str,
    temperature_c: f64,
    humidity_pct: f64,
    rainfall_mm: f64,
    wind_speed_kph: f64,
) -> Result<String, JsValue> {
    reading_to_advisories(
        district,
        [temperature_c, humidity_pct, rainfall_mm, wind_speed_kph],
        now(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Check a district name before sending it to the server
#[wasm_bindgen]
pub fn is_valid_district(district: &str) -> bool {
    validate_district(district).is_ok()
}

/// Canonical form of a district name, as used for cache keys
#[wasm_bindgen]
pub fn normalize_district_name(district: &str) -> String {
    normalize_district(district)
}

/// Version of the bundled rule table
#[wasm_bindgen]
pub fn rule_set_version() -> String {
    default_rules().version().to_string()
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Non-finite or out-of-range numbers are unusable, never zero
fn to_decimal(field: &str, value: f64) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("Unusable {} reading: {}", field, value))
}

fn reading_to_advisories(district: &str, reading: [f64; 4], at: DateTime<Utc>) -> Result<String, String> {
    let [temperature_c, humidity_pct, rainfall_mm, wind_speed_kph] = reading;
    let observation = WeatherObservation {
        district: normalize_district(district),
        temperature_c: to_decimal("temperature", temperature_c)?,
        humidity_pct: to_decimal("humidity", humidity_pct)?,
        rainfall_mm: to_decimal("rainfall", rainfall_mm)?,
        wind_speed_kph: to_decimal("wind speed", wind_speed_kph)?,
        observed_at: at,
    };

    evaluate_observation(&observation, at)
}

fn evaluate_json(observation_json: &str, at: DateTime<Utc>) -> Result<String, String> {
    let observation: WeatherObservation = serde_json::from_str(observation_json)
        .map_err(|e| format!("Invalid observation JSON: {}", e))?;
    evaluate_observation(&observation, at)
}

fn evaluate_observation(observation: &WeatherObservation, at: DateTime<Utc>) -> Result<String, String> {
    validate_district(&observation.district).map_err(str::to_string)?;
    observation.validate().map_err(str::to_string)?;

    let items = default_rules().evaluate_at(observation, at);
    serde_json::to_string(&items).map_err(|e| format!("Failed to serialize advisories: {}", e))
}
