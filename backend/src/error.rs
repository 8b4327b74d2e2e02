//! Error handling for the farm advisory service
//!
//! Provides consistent error responses in English and Kannada

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Invalid input: {message}")]
    InvalidInput { field: String, message: String },

    #[error("No weather data for district: {district}")]
    DataNotFound { district: String },

    // External service errors
    #[error("Weather service unavailable: {0}")]
    WeatherServiceUnavailable(String),

    #[error("Translation service error: {0}")]
    TranslationService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Whether the caller may usefully retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::WeatherServiceUnavailable(_))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_kn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub retryable: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let (status, error_detail) = match &self {
            AppError::InvalidInput { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_INPUT".to_string(),
                    message_en: message.clone(),
                    message_kn: format!("ಅಮಾನ್ಯ ಮಾಹಿತಿ: {}", message),
                    field: Some(field.clone()),
                    district: None,
                    retryable,
                },
            ),
            AppError::DataNotFound { district } => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "DATA_NOT_FOUND".to_string(),
                    message_en: format!("Weather advisory is unavailable for {}", district),
                    message_kn: format!("{} ಪ್ರದೇಶಕ್ಕೆ ಹವಾಮಾನ ಸಲಹೆ ಲಭ್ಯವಿಲ್ಲ", district),
                    field: None,
                    district: Some(district.clone()),
                    retryable,
                },
            ),
            AppError::WeatherServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "WEATHER_SERVICE_UNAVAILABLE".to_string(),
                    message_en: "Weather service is temporarily unavailable. Please try again shortly"
                        .to_string(),
                    message_kn: "ಹವಾಮಾನ ಸೇವೆ ತಾತ್ಕಾಲಿಕವಾಗಿ ಲಭ್ಯವಿಲ್ಲ. ಸ್ವಲ್ಪ ಸಮಯದ ನಂತರ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ"
                        .to_string(),
                    field: None,
                    district: None,
                    retryable,
                },
            ),
            AppError::TranslationService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "TRANSLATION_SERVICE_ERROR".to_string(),
                    message_en: format!("Translation service error: {}", msg),
                    message_kn: "ಅನುವಾದ ಸೇವೆಯಲ್ಲಿ ದೋಷ ಉಂಟಾಗಿದೆ".to_string(),
                    field: None,
                    district: None,
                    retryable,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_kn: "ಸಂರಚನೆಯಲ್ಲಿ ದೋಷ ಉಂಟಾಗಿದೆ".to_string(),
                    field: None,
                    district: None,
                    retryable,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
