//! Advisory item and result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::WeatherObservation;
use crate::types::{AdvisoryCategory, Language, Severity};

/// One actionable recommendation derived from a weather observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryItem {
    pub rule_id: String,
    pub category: AdvisoryCategory,
    pub severity: Severity,
    /// Rendered message in the source language
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_message: Option<String>,
    /// Set when a translation was requested but could not be produced
    #[serde(default)]
    pub translation_degraded: bool,
    pub district: String,
    pub generated_at: DateTime<Utc>,
}

impl AdvisoryItem {
    /// Message to show for the requested language, falling back to the source text
    pub fn display_message(&self) -> &str {
        self.translated_message.as_deref().unwrap_or(&self.message)
    }
}

/// Output of one advisory pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryResult {
    pub district: String,
    pub observation: WeatherObservation,
    pub items: Vec<AdvisoryItem>,
    pub language: Language,
    pub rule_set_version: String,
    pub translation_degraded: bool,
    pub generated_at: DateTime<Utc>,
}

impl AdvisoryResult {
    /// No rule fired; callers render this as "no alerts"
    pub fn is_all_clear(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest severity present in the result
    pub fn highest_severity(&self) -> Option<Severity> {
        self.items.first().map(|item| item.severity)
    }
}
