//! Cloud Translation (v2 REST) client
//!
//! POST {base_url}?key=...
//! { "q": "...", "target": "hi", "format": "text" }
//! Response: { "data": { "translations": [ { "translatedText": "..." } ] } }

use super::TranslationService;
use crate::error::AdvisorError;
use crate::models::Language;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Connection-pooled translation client
pub struct GoogleTranslateClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranslationService for GoogleTranslateClient {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(AdvisorError::Translation(
                "TRANSLATION_API_KEY not configured".to_string(),
            ));
        }

        let request = TranslateRequest {
            q: text,
            target: target.code(),
            format: "text",
        };

        debug!(target = %target, text_len = text.len(), "Calling translation API");

        let response = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Translation API request failed: {}", e);
                AdvisorError::Translation(format!("translation service unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Translation API error response: {}", error_text);
            return Err(AdvisorError::Translation(format!(
                "translation service returned {}: {}",
                status, error_text
            )));
        }

        let body: TranslateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse translation response: {}", e);
            AdvisorError::Translation(format!("translation parse error: {}", e))
        })?;

        extract_translation(body)
    }
}

fn extract_translation(body: TranslateResponse) -> Result<String> {
    body.data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| AdvisorError::Translation("translation service returned no translations".to_string()))
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
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
    #[serde(default)]
    #[allow(dead_code)]
    detected_source_language: Option<String>,
}
