//! Weather observation model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time weather reading for a district
///
/// Zero is a valid reading for every field. Missing data is never encoded
/// as a zero-valued observation; see `WeatherLookup` in the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    pub district: String,
    pub temperature_c: Decimal,
    pub humidity_pct: Decimal,
    /// Rain over the last hour, in millimetres
    pub rainfall_mm: Decimal,
    pub wind_speed_kph: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Check that the reading is physically usable
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.humidity_pct < Decimal::ZERO || self.humidity_pct > Decimal::ONE_HUNDRED {
            return Err("Humidity must be between 0 and 100 percent");
        }
        if self.rainfall_mm < Decimal::ZERO {
            return Err("Rainfall cannot be negative");
        }
        if self.wind_speed_kph < Decimal::ZERO {
            return Err("Wind speed cannot be negative");
        }
        Ok(())
    }
}
