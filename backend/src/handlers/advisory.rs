//! HTTP handlers for advisory endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{AdvisoryCategory, AdvisoryItem, Language, Severity, WeatherObservation};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for an advisory request
#[derive(Debug, Deserialize)]
pub struct AdvisoryQuery {
    pub district: Option<String>,
    pub language: Option<String>,
}

/// Advisory payload returned to clients
#[derive(Debug, Serialize)]
pub struct AdvisoryResponse {
    pub district: String,
    pub weather: WeatherObservation,
    pub advisory: Vec<AdvisoryItem>,
    pub language: Language,
    pub rule_set_version: String,
    pub translation_degraded: bool,
    pub timestamp: DateTime<Utc>,
}

/// Get the advisory for a district
pub async fn get_advisory(
    State(state): State<AppState>,
    Query(query): Query<AdvisoryQuery>,
) -> AppResult<Json<AdvisoryResponse>> {
    let district = query
        .district
        .ok_or_else(|| AppError::invalid_input("district", "District name is required"))?;

    let language = match query.language.as_deref() {
        Some(code) => code
            .parse::<Language>()
            .map_err(|msg| AppError::invalid_input("language", msg))?,
        None => Language::SOURCE,
    };

    let result = state.advisory.get_advisory(&district, language).await?;

    Ok(Json(AdvisoryResponse {
        district: result.district,
        weather: result.observation,
        advisory: result.items,
        language: result.language,
        rule_set_version: result.rule_set_version,
        translation_degraded: result.translation_degraded,
        timestamp: result.generated_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CacheQuery {
    pub district: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheInvalidated {
    pub district: String,
    pub invalidated: bool,
}

/// Drop the cached observation for a district
pub async fn invalidate_weather(
    State(state): State<AppState>,
    Query(query): Query<CacheQuery>,
) -> AppResult<Json<CacheInvalidated>> {
    let district = query
        .district
        .ok_or_else(|| AppError::invalid_input("district", "District name is required"))?;

    state.advisory.refresh_district(&district).await?;

    Ok(Json(CacheInvalidated {
        district: shared::normalize_district(&district),
        invalidated: state.advisory.weather_cache_enabled(),
    }))
}

/// Summary of an active rule
#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub id: String,
    pub category: AdvisoryCategory,
    pub severity: Severity,
    pub message_template: String,
}

#[derive(Debug, Serialize)]
pub struct RulesResponse {
    pub version: String,
    pub rules: Vec<RuleSummary>,
}

/// List the active advisory rules
pub async fn list_rules(State(state): State<AppState>) -> Json<RulesResponse> {
    let rule_set = state.advisory.rules();
    let rules = rule_set
        .rules()
        .iter()
        .map(|rule| RuleSummary {
            id: rule.id.clone(),
            category: rule.category,
            severity: rule.severity,
            message_template: rule.message_template.clone(),
        })
        .collect();

    Json(RulesResponse {
        version: rule_set.version().to_string(),
        rules,
    })
}
