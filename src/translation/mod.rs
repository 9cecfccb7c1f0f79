//! Translation gateway
//!
//! Wraps an external translation service. Blank input never reaches the
//! service, and every call is bounded by a timeout that surfaces as a
//! translation failure.

mod google;

pub use google::GoogleTranslateClient;

use crate::config::{AdvisorConfig, TranslationProvider};
use crate::error::AdvisorError;
use crate::models::Language;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Returned for empty or whitespace-only input.
pub const NO_TEXT_SENTINEL: &str = "No text provided for translation.";

/// External text translation capability
#[async_trait]
pub trait TranslationService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn translate(&self, text: &str, target: Language) -> Result<String>;
}

/// Returns text unchanged. Used when translation is disabled.
#[derive(Debug, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl TranslationService for PassthroughTranslator {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn translate(&self, text: &str, _target: Language) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Gateway every component translates through
#[derive(Clone)]
pub struct TranslationGateway {
    service: Arc<dyn TranslationService>,
    timeout: Duration,
}

impl TranslationGateway {
    pub fn new(service: Arc<dyn TranslationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let service: Arc<dyn TranslationService> = match config.translation.provider {
            TranslationProvider::Google => Arc::new(GoogleTranslateClient::new(
                config.translation.api_key.clone(),
                config.translation.base_url.clone(),
                config.translation.timeout,
            )?),
            TranslationProvider::Disabled => Arc::new(PassthroughTranslator),
        };

        info!(
            provider = service.name(),
            timeout_ms = config.translation.timeout.as_millis() as u64,
            "Translation gateway ready"
        );

        Ok(Self::new(service, config.translation.timeout))
    }

    /// Translate `text` into `target`.
    ///
    /// Text already in the target language still goes through the service.
    pub async fn translate(&self, text: &str, target: Language) -> Result<String> {
        if text.trim().is_empty() {
            debug!("Blank text, skipping translation call");
            return Ok(NO_TEXT_SENTINEL.to_string());
        }

        match tokio::time::timeout(self.timeout, self.service.translate(text, target)).await {
            Ok(Ok(translated)) => Ok(translated),
            Ok(Err(e)) => {
                warn!(
                    provider = self.service.name(),
                    target = %target,
                    error = %e,
                    "Translation failed"
                );
                Err(match e {
                    AdvisorError::Translation(_) => e,
                    other => AdvisorError::Translation(other.to_string()),
                })
            }
            Err(_) => {
                warn!(
                    provider = self.service.name(),
                    target = %target,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Translation timed out"
                );
                Err(AdvisorError::Translation(format!(
                    "translation timed out after {} ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTranslator, SlowTranslator};

    fn gateway(service: Arc<dyn TranslationService>) -> TranslationGateway {
        TranslationGateway::new(service, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_blank_text_returns_sentinel_without_call() {
        let service = Arc::new(ScriptedTranslator::new());
        let gateway = gateway(service.clone());

        assert_eq!(gateway.translate("", Language::Hindi).await.unwrap(), NO_TEXT_SENTINEL);
        assert_eq!(gateway.translate("  \n\t", Language::French).await.unwrap(), NO_TEXT_SENTINEL);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translates_through_service() {
        let service = Arc::new(ScriptedTranslator::new());
        let gateway = gateway(service.clone());

        let translated = gateway.translate("Loan can likely be sanctioned.", Language::Hindi).await;
        tokio_test::assert_ok!(&translated);
        assert_eq!(translated.unwrap(), "[hi] Loan can likely be sanctioned.");
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_same_language_still_calls_service() {
        let service = Arc::new(ScriptedTranslator::new());
        let gateway = gateway(service.clone());

        let translated = gateway.translate("hello", Language::English).await.unwrap();
        assert_eq!(translated, "hello");
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_is_translation_error() {
        let service = Arc::new(ScriptedTranslator::new().failing_on("EMI"));
        let gateway = gateway(service);

        let err = gateway.translate("EMI: ₹100.00", Language::German).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Translation(_)));
        assert!(err.to_string().starts_with("Translation Error:"));
    }

    #[tokio::test]
    async fn test_timeout_is_translation_error() {
        let gateway = TranslationGateway::new(
            Arc::new(SlowTranslator(Duration::from_millis(500))),
            Duration::from_millis(20),
        );

        let err = gateway.translate("hello", Language::Korean).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Translation(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn test_passthrough_keeps_unicode() {
        let gateway = gateway(Arc::new(PassthroughTranslator));
        let text = "ऋण आवेदन कैसे करें? 贷款 🏠";
        assert_eq!(gateway.translate(text, Language::English).await.unwrap(), text);
    }
}
