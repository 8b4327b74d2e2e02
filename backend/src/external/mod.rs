//! External API integrations

pub mod translation;
pub mod weather;

pub use translation::{HttpTranslationClient, Translator};
pub use weather::{OpenWeatherClient, WeatherSource};
