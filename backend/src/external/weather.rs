//! Weather API client for fetching district observations
//!
//! Integrates with OpenWeatherMap current conditions, looked up by place name

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use shared::WeatherObservation;

use crate::error::{AppError, AppResult};

/// Source of raw weather observations
///
/// `Ok(None)` means the source has no data for the district. Transport
/// failures and timeouts are reported as errors.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn get(&self, district: &str) -> AppResult<Option<WeatherObservation>>;
}

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    country_code: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    main: OWMMain,
    wind: OWMWind,
    rain: Option<OWMRain>,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

const MPS_TO_KPH: f64 = 3.6;

impl OpenWeatherClient {
    /// Create a new OpenWeatherClient
    pub fn new(
        api_key: String,
        base_url: String,
        country_code: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            country_code,
        })
    }

    /// Fetch current conditions for a normalized district name
    pub async fn get_current_weather(&self, district: &str) -> AppResult<Option<WeatherObservation>> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        let query = format!("{},{}", district, self.country_code);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::WeatherServiceUnavailable(format!("Weather API request failed: {}", e))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherServiceUnavailable(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::WeatherServiceUnavailable(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(convert_current_response(district, data))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn get(&self, district: &str) -> AppResult<Option<WeatherObservation>> {
        self.get_current_weather(district).await
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Rainfall over the last hour
///
/// Falls back to the hourly mean of the 3h total when only that is reported.
/// The provider omits the rain block when no rain fell, which is a zero reading.
fn hourly_rainfall(rain: Option<&OWMRain>) -> f64 {
    match rain {
        Some(OWMRain {
            one_hour: Some(mm), ..
        }) => *mm,
        Some(OWMRain {
            three_hour: Some(mm), ..
        }) => mm / 3.0,
        _ => 0.0,
    }
}

/// Convert an OpenWeatherMap response to an observation
///
/// A reading that cannot be represented is reported as no data.
fn convert_current_response(district: &str, data: OWMCurrentResponse) -> Option<WeatherObservation> {
    let rainfall = hourly_rainfall(data.rain.as_ref());
    let wind_kph = data.wind.speed * MPS_TO_KPH;

    Some(WeatherObservation {
        district: district.to_string(),
        temperature_c: to_decimal(data.main.temp)?,
        humidity_pct: to_decimal(data.main.humidity)?,
        rainfall_mm: to_decimal(rainfall)?,
        wind_speed_kph: to_decimal(wind_kph)?,
        observed_at: DateTime::from_timestamp(data.dt, 0)?,
    })
}
