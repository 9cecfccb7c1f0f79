//! Process-wide configuration
//!
//! Loaded once at startup and passed explicitly into the orchestrator.
//! Read-only afterwards.

use crate::advisory::RetryPolicy;
use crate::classifier::IntentKeywords;
use crate::eligibility::{EligibilityPolicy, DEFAULT_MAX_INCOME_SHARE, DEFAULT_MIN_MONTHLY_INCOME};
use crate::error::AdvisorError;
use crate::models::Language;
use crate::Result;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TRANSLATION_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";
const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 8.5;
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationProvider {
    Google,
    /// Pass-through, text is returned unchanged
    Disabled,
}

impl FromStr for TranslationProvider {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(TranslationProvider::Google),
            "disabled" | "none" | "off" => Ok(TranslationProvider::Disabled),
            other => Err(AdvisorError::Config(format!(
                "TRANSLATION_PROVIDER must be 'google' or 'disabled', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

#[derive(Clone)]
pub struct TranslationConfig {
    pub provider: TranslationProvider,
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub pivot_language: Language,
    pub model: ModelConfig,
    pub translation: TranslationConfig,
    pub eligibility: EligibilityPolicy,
    pub keywords: IntentKeywords,
    /// Used for submissions that do not state a rate.
    pub default_annual_rate_percent: f64,
    pub currency_symbol: String,
    pub server_port: u16,
}

impl AdvisorConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let pivot_language = match get("PIVOT_LANGUAGE") {
            Some(code) => code
                .parse::<Language>()
                .map_err(|_| AdvisorError::Config(format!("PIVOT_LANGUAGE '{}' is not supported", code)))?,
            None => Language::English,
        };

        let model = ModelConfig {
            api_key: get("GEMINI_API_KEY").unwrap_or_default(),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_key(&get, "MODEL_TIMEOUT_SECS", 30u64)?),
            retry: RetryPolicy {
                max_retries: parse_key(&get, "MODEL_RETRY_ATTEMPTS", 0u32)?,
                backoff: Duration::from_millis(parse_key(&get, "MODEL_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS)?),
            },
        };

        let translation = TranslationConfig {
            provider: match get("TRANSLATION_PROVIDER") {
                Some(p) => p.parse()?,
                None => TranslationProvider::Google,
            },
            api_key: get("TRANSLATION_API_KEY").unwrap_or_default(),
            base_url: get("TRANSLATION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TRANSLATION_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_key(&get, "TRANSLATION_TIMEOUT_SECS", 10u64)?),
        };

        let eligibility = EligibilityPolicy {
            min_monthly_income: parse_key(&get, "MIN_MONTHLY_INCOME", DEFAULT_MIN_MONTHLY_INCOME)?,
            max_income_share: parse_key(&get, "MAX_INCOME_SHARE", DEFAULT_MAX_INCOME_SHARE)?,
        };

        let defaults = IntentKeywords::default();
        let keywords = IntentKeywords {
            loan_guidance: keyword_list(get("LOAN_GUIDANCE_KEYWORDS"), defaults.loan_guidance),
            financial_tip: keyword_list(get("FINANCIAL_TIP_KEYWORDS"), defaults.financial_tip),
            emi_calculation: keyword_list(get("EMI_KEYWORDS"), defaults.emi_calculation),
        };

        let server_port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| AdvisorError::Config(format!("PORT must be a valid u16, got '{}'", port)))?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            pivot_language,
            model,
            translation,
            eligibility,
            keywords,
            default_annual_rate_percent: parse_key(&get, "DEFAULT_ANNUAL_RATE", DEFAULT_ANNUAL_RATE_PERCENT)?,
            currency_symbol: get("CURRENCY_SYMBOL").unwrap_or_else(|| "₹".to_string()),
            server_port,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let share = self.eligibility.max_income_share;
        if !(share > 0.0 && share <= 1.0) {
            return Err(AdvisorError::Config(format!(
                "MAX_INCOME_SHARE must be in (0, 1], got {}",
                share
            )));
        }
        if !(self.eligibility.min_monthly_income >= 0.0) {
            return Err(AdvisorError::Config(
                "MIN_MONTHLY_INCOME must not be negative".to_string(),
            ));
        }
        if !(self.default_annual_rate_percent >= 0.0) {
            return Err(AdvisorError::Config(
                "DEFAULT_ANNUAL_RATE must not be negative".to_string(),
            ));
        }
        if self.model.timeout.is_zero() || self.translation.timeout.is_zero() {
            return Err(AdvisorError::Config(
                "MODEL_TIMEOUT_SECS and TRANSLATION_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            pivot_language: Language::English,
            model: ModelConfig {
                api_key: String::new(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                timeout: Duration::from_secs(30),
                retry: RetryPolicy {
                    max_retries: 0,
                    backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
                },
            },
            translation: TranslationConfig {
                provider: TranslationProvider::Google,
                api_key: String::new(),
                base_url: DEFAULT_TRANSLATION_BASE_URL.to_string(),
                timeout: Duration::from_secs(10),
            },
            eligibility: EligibilityPolicy::default(),
            keywords: IntentKeywords::default(),
            default_annual_rate_percent: DEFAULT_ANNUAL_RATE_PERCENT,
            currency_symbol: "₹".to_string(),
            server_port: DEFAULT_PORT,
        }
    }
}

fn parse_key<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AdvisorError::Config(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn keyword_list(raw: Option<String>, default: Vec<String>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    if parsed.is_empty() {
        default
    } else {
        parsed
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
