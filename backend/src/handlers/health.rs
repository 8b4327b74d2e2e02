//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub rule_set_version: String,
    pub weather_cache: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let weather_cache = if state.advisory.weather_cache_enabled() {
        "enabled".to_string()
    } else {
        "disabled".to_string()
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        rule_set_version: state.advisory.rules().version().to_string(),
        weather_cache,
    })
}
