//! Business logic services for the farm advisory pipeline

pub mod advisory;
pub mod localization;
pub mod weather;

pub use advisory::AdvisoryService;
pub use localization::Localizer;
pub use weather::{WeatherLookup, WeatherSourceAdapter};
