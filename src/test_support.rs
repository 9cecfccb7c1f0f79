//! In-process doubles for the external services, shared by unit tests.

use crate::advisory::{AdvisoryModelClient, GenerativeModel};
use crate::agent::AdvisoryOrchestrator;
use crate::application::{
    Applicant, EmploymentInfo, Gender, LoanApplication, LoanPurpose, LoanRequest, MaritalStatus,
};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::models::Language;
use crate::translation::{TranslationGateway, TranslationService};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tags text with the target code, `"[hi] text"`. English targets come back
/// unchanged so English renderings read naturally in assertions.
#[derive(Default)]
pub(crate) struct ScriptedTranslator {
    calls: Mutex<Vec<(String, Language)>>,
    fail_on: Vec<String>,
    mappings: HashMap<String, String>,
}

impl ScriptedTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any call whose text contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Answer `from` with `to` regardless of target.
    pub fn mapping(mut self, from: &str, to: &str) -> Self {
        self.mappings.insert(from.to_string(), to.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TranslationService for ScriptedTranslator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        self.calls.lock().unwrap().push((text.to_string(), target));

        if self.fail_on.iter().any(|needle| text.contains(needle.as_str())) {
            return Err(AdvisorError::Translation("service unavailable".to_string()));
        }
        if let Some(mapped) = self.mappings.get(text) {
            return Ok(mapped.clone());
        }
        if target == Language::English {
            return Ok(text.to_string());
        }
        Ok(format!("[{}] {}", target.code(), text))
    }
}

/// Sleeps before answering, for timeout tests.
pub(crate) struct SlowTranslator(pub Duration);

#[async_trait]
impl TranslationService for SlowTranslator {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn translate(&self, text: &str, _target: Language) -> Result<String> {
        tokio::time::sleep(self.0).await;
        Ok(text.to_string())
    }
}

/// Answers `"Answer to: {prompt}"` and records every prompt it sees.
#[derive(Default)]
pub(crate) struct ScriptedModel {
    prompts: Mutex<Vec<String>>,
    failures_left: AtomicU32,
    fail_on: Vec<String>,
    empty: bool,
    fixed: Option<String>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering_empty(mut self) -> Self {
        self.empty = true;
        self
    }

    /// Answer every prompt with `text`.
    pub fn answering(mut self, text: &str) -> Self {
        self.fixed = Some(text.to_string());
        self
    }

    /// Fail the first `n` calls.
    pub fn failing_times(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Fail any prompt containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail || self.fail_on.iter().any(|needle| prompt.contains(needle.as_str())) {
            return Err(AdvisorError::AdvisoryService("model unavailable".to_string()));
        }

        if self.empty {
            return Ok(String::new());
        }
        if let Some(text) = &self.fixed {
            return Ok(text.clone());
        }
        Ok(format!("Answer to: {}", prompt))
    }
}

pub(crate) fn orchestrator(
    translator: Arc<ScriptedTranslator>,
    model: Arc<ScriptedModel>,
) -> AdvisoryOrchestrator {
    AdvisoryOrchestrator::new(
        Arc::new(AdvisorConfig::default()),
        TranslationGateway::new(translator, Duration::from_secs(5)),
        AdvisoryModelClient::new(model, Duration::from_secs(5)),
    )
}

/// Salaried applicant earning 50,000 a month, asking 20 lakh over 10 years.
pub(crate) fn sample_application() -> LoanApplication {
    LoanApplication {
        applicant: Applicant {
            full_name: "Asha Verma".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            mobile: "9876543210".to_string(),
            email: "asha.verma@example.com".to_string(),
            pan: "ABCDE1234F".to_string(),
            aadhaar: "123456789012".to_string(),
            marital_status: MaritalStatus::Married,
            gender: Gender::Female,
            residential_address: "12 MG Road, Pune".to_string(),
            permanent_address: None,
        },
        employment: EmploymentInfo::Salaried {
            employer_name: "State Bank Works".to_string(),
            monthly_income: 50_000.0,
        },
        loan: LoanRequest {
            amount: 2_000_000.0,
            purpose: LoanPurpose::PurchaseOfHouse,
            tenure_years: 10,
            annual_rate_percent: Some(8.5),
        },
    }
}
