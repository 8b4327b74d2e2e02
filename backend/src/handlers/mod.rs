//! HTTP handlers for the farm advisory API

pub mod advisory;
pub mod health;

pub use advisory::{get_advisory, invalidate_weather, list_rules};
pub use health::health_check;
