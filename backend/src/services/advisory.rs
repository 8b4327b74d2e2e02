//! Weather-driven advisory pipeline
//!
//! district → weather lookup → rule evaluation → localization → result

use std::sync::Arc;

use chrono::Utc;
use shared::{default_rules, AdvisoryResult, Language, RuleSet};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{HttpTranslationClient, OpenWeatherClient};
use crate::services::{Localizer, WeatherLookup, WeatherSourceAdapter};

/// Advisory service composing the adapter, rule engine and localizer
#[derive(Clone)]
pub struct AdvisoryService {
    weather: WeatherSourceAdapter,
    rules: Arc<RuleSet>,
    localizer: Localizer,
}

impl AdvisoryService {
    pub fn new(weather: WeatherSourceAdapter, rules: RuleSet, localizer: Localizer) -> Self {
        Self {
            weather,
            rules: Arc::new(rules),
            localizer,
        }
    }

    /// Build the production pipeline from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        if config.weather.api_key.is_empty() {
            tracing::warn!("Weather API key not configured; upstream calls will be rejected");
        }

        let weather_client = OpenWeatherClient::new(
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
            config.weather.country_code.clone(),
            config.weather.timeout(),
        )?;
        let mut weather = WeatherSourceAdapter::new(Arc::new(weather_client), config.weather.timeout());
        if let Some(ttl) = config.weather.cache_ttl() {
            weather = weather.with_cache(ttl, config.weather.cache_max_entries);
        }

        let translation_client = HttpTranslationClient::new(
            config.translation.api_endpoint.clone(),
            config.translation.api_key.clone(),
            config.translation.timeout(),
        )?;
        let localizer = Localizer::new(Arc::new(translation_client), config.translation.timeout());

        Ok(Self::new(weather, default_rules(), localizer))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn weather_cache_enabled(&self) -> bool {
        self.weather.is_cached()
    }

    /// Force the next advisory for a district to re-fetch weather
    pub async fn refresh_district(&self, district: &str) -> AppResult<()> {
        shared::validate_district(district).map_err(|msg| AppError::invalid_input("district", msg))?;
        self.weather.invalidate(district).await;
        tracing::info!("Weather cache invalidated for {}", shared::normalize_district(district));
        Ok(())
    }

    /// Produce the advisory for a district in the requested language
    pub async fn get_advisory(&self, district: &str, language: Language) -> AppResult<AdvisoryResult> {
        let observation = match self.weather.fetch_observation(district).await? {
            WeatherLookup::Found(observation) => observation,
            WeatherLookup::NotFound { district } => {
                return Err(AppError::DataNotFound { district });
            }
        };

        let generated_at = Utc::now();
        let items = self.rules.evaluate_at(&observation, generated_at);
        tracing::info!(
            "Generated {} advisories for {} (rules v{})",
            items.len(),
            observation.district,
            self.rules.version()
        );

        let items = self.localizer.localize(items, language).await;
        let translation_degraded = items.iter().any(|item| item.translation_degraded);
        if translation_degraded {
            tracing::warn!("Advisory for {} served with degraded translation", observation.district);
        }

        Ok(AdvisoryResult {
            district: observation.district.clone(),
            observation,
            items,
            language,
            rule_set_version: self.rules.version().to_string(),
            translation_degraded,
            generated_at,
        })
    }
}
