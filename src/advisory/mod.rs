//! Advisory model client
//!
//! Sends a prompt to the generative model and returns the answer verbatim.
//! Generative calls are not idempotent, so nothing is retried unless a
//! deployment opts in through `RetryPolicy`, and then only with a fresh call.

pub mod gemini;
pub use gemini::GeminiClient;

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Shown in place of an empty model answer.
pub const NO_RESPONSE_SENTINEL: &str = "Error: No response from the AI model.";

/// External generative-text capability
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure. 0 disables retries.
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Clone)]
pub struct AdvisoryModelClient {
    model: Arc<dyn GenerativeModel>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl AdvisoryModelClient {
    pub fn new(model: Arc<dyn GenerativeModel>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let gemini = GeminiClient::new(
            config.model.api_key.clone(),
            &config.model.base_url,
            &config.model.model,
            config.model.timeout,
        )?;

        info!(
            model = %config.model.model,
            timeout_ms = config.model.timeout.as_millis() as u64,
            max_retries = config.model.retry.max_retries,
            "Advisory model client ready"
        );

        Ok(Self::new(Arc::new(gemini), config.model.timeout).with_retry(config.model.retry))
    }

    /// Ask the model. `Ok(None)` means it answered with nothing.
    pub async fn ask(&self, prompt: &str) -> Result<Option<String>> {
        let mut attempt = 0;

        loop {
            match self.call_once(prompt).await {
                Ok(answer) if answer.trim().is_empty() => {
                    warn!(provider = self.model.name(), "Model returned an empty answer");
                    return Ok(None);
                }
                Ok(answer) => return Ok(Some(answer)),
                Err(e) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(
                        provider = self.model.name(),
                        attempt,
                        error = %e,
                        "Model call failed, retrying with a fresh request"
                    );
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_once(&self, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.model.generate(prompt)).await {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(e)) => Err(match e {
                AdvisorError::AdvisoryService(_) => e,
                other => AdvisorError::AdvisoryService(other.to_string()),
            }),
            Err(_) => Err(AdvisorError::AdvisoryService(format!(
                "model call timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedModel;

    fn client(model: Arc<ScriptedModel>) -> AdvisoryModelClient {
        AdvisoryModelClient::new(model, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_returns_answer_verbatim() {
        let model = Arc::new(ScriptedModel::new());
        let answer = client(model.clone()).ask("What is EMI?").await.unwrap();

        assert_eq!(answer.as_deref(), Some("Answer to: What is EMI?"));
        assert_eq!(model.prompts(), vec!["What is EMI?".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_answer_is_none() {
        let model = Arc::new(ScriptedModel::new().answering_empty());
        let answer = client(model).ask("anything").await.unwrap();
        assert_eq!(answer, None);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried_by_default() {
        let model = Arc::new(ScriptedModel::new().failing_times(1));
        let err = client(model.clone()).ask("eligible?").await.unwrap_err();

        assert!(matches!(err, AdvisorError::AdvisoryService(_)));
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_opt_in_retry_uses_fresh_call() {
        let model = Arc::new(ScriptedModel::new().failing_times(1));
        let client = client(model.clone()).with_retry(RetryPolicy {
            max_retries: 1,
            backoff: Duration::from_millis(1),
        });

        let answer = client.ask("eligible?").await.unwrap();
        assert_eq!(answer.as_deref(), Some("Answer to: eligible?"));
        assert_eq!(model.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_advisory_error() {
        let model = Arc::new(ScriptedModel::new().delayed(Duration::from_millis(500)));
        let client = AdvisoryModelClient::new(model, Duration::from_millis(20));

        let err = client.ask("slow").await.unwrap_err();
        assert!(matches!(err, AdvisorError::AdvisoryService(ref m) if m.contains("timed out")));
    }
}
