//! Translation API client
//!
//! Client for a Google Translate v2 compatible text translation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::Language;

use crate::error::{AppError, AppResult};

/// Text translation collaborator
///
/// `Ok(None)` means the service answered but produced no translation.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> AppResult<Option<String>>;
}

/// Client for the translation service
#[derive(Clone)]
pub struct HttpTranslationClient {
    api_endpoint: String,
    api_key: String,
    http_client: Client,
}

/// Request to translate a single text
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'static str,
    target: &'static str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl HttpTranslationClient {
    /// Create a new translation client
    pub fn new(api_endpoint: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            http_client,
        })
    }

    /// Translate source-language text into the target language
    pub async fn translate_text(&self, text: &str, target: Language) -> AppResult<Option<String>> {
        let request = TranslateRequest {
            q: text,
            source: Language::SOURCE.code(),
            target: target.code(),
            format: "text",
        };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::TranslationService(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::TranslationService(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: TranslateResponse = response
            .json()
            .await
            .map_err(|e| AppError::TranslationService(format!("Failed to parse response: {}", e)))?;

        Ok(result
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl Translator for HttpTranslationClient {
    async fn translate(&self, text: &str, target: Language) -> AppResult<Option<String>> {
        self.translate_text(text, target).await
    }
}
