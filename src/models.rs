//! Core data models for the loan advisor

use crate::error::AdvisorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//
// ================= Language =================
//

/// Display/input language selected once per session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "zh-CN")]
    ChineseSimplified,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// Presentation order of the language selector.
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::ChineseSimplified,
        Language::Arabic,
        Language::Russian,
        Language::Japanese,
        Language::Portuguese,
        Language::Italian,
        Language::Korean,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::ChineseSimplified => "zh-CN",
            Language::Arabic => "ar",
            Language::Russian => "ru",
            Language::Japanese => "ja",
            Language::Portuguese => "pt",
            Language::Italian => "it",
            Language::Korean => "ko",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::ChineseSimplified => "Chinese (Simplified)",
            Language::Arabic => "Arabic",
            Language::Russian => "Russian",
            Language::Japanese => "Japanese",
            Language::Portuguese => "Portuguese",
            Language::Italian => "Italian",
            Language::Korean => "Korean",
        }
    }
}

impl FromStr for Language {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| AdvisorError::Validation(format!("Unsupported language code: {}", wanted)))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

//
// ================= Loan Figures =================
//

pub const MAX_CALCULATOR_TENURE_YEARS: u32 = 100;

/// Inputs to the EMI calculator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoanParameters {
    principal: f64,
    annual_rate_percent: f64,
    tenure_years: u32,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate_percent: f64, tenure_years: u32) -> crate::Result<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(AdvisorError::Validation(
                "Loan amount must be greater than zero".to_string(),
            ));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(AdvisorError::Validation(
                "Interest rate must not be negative".to_string(),
            ));
        }
        if tenure_years == 0 {
            return Err(AdvisorError::Validation(
                "Loan tenure must be at least one year".to_string(),
            ));
        }
        if tenure_years > MAX_CALCULATOR_TENURE_YEARS {
            return Err(AdvisorError::Validation(format!(
                "Loan tenure must not exceed {} years",
                MAX_CALCULATOR_TENURE_YEARS
            )));
        }

        Ok(Self {
            principal,
            annual_rate_percent,
            tenure_years,
        })
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn tenure_years(&self) -> u32 {
        self.tenure_years
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_years * 12
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EmiResult {
    pub emi: f64,
    pub total_interest: f64,
    pub total_payment: f64,
}

impl EmiResult {
    /// Three-line breakdown shown to the user.
    pub fn describe(&self, currency: &str) -> String {
        format!(
            "EMI: {currency}{:.2}\nTotal Interest Payable: {currency}{:.2}\nTotal Payment (Principal + Interest): {currency}{:.2}",
            self.emi,
            self.total_interest,
            self.total_payment,
            currency = currency,
        )
    }
}

//
// ================= Eligibility =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EligibilityInput {
    pub monthly_income: f64,
    pub loan_amount: f64,
    pub tenure_years: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityVerdict {
    InsufficientData,
    LoanTooHighRelativeToIncome,
    IncomeBelowThreshold,
    Approvable,
}

impl EligibilityVerdict {
    pub fn message(&self) -> &'static str {
        match self {
            EligibilityVerdict::InsufficientData => "Insufficient data provided.",
            EligibilityVerdict::LoanTooHighRelativeToIncome => {
                "Loan amount is too high relative to income and tenure."
            }
            EligibilityVerdict::IncomeBelowThreshold => "Income is below the minimum threshold.",
            EligibilityVerdict::Approvable => "Loan can likely be sanctioned.",
        }
    }
}

//
// ================= Query =================
//

/// Declaration order is the order blocks appear in a query response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    GeneralQuery,
    LoanGuidance,
    FinancialTip,
    EmiCalculation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryQuery {
    pub raw_text: String,
    /// Query in the pivot language, or the raw text when normalization failed.
    pub normalized_text: String,
    pub detected_intents: BTreeSet<Intent>,
}

//
// ================= Response =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Notice,
    AiAnswer,
    LoanGuidance,
    FinancialTip,
    EmiDetail,
    ApplicationSummary,
    SanctionCheck,
    AiEligibility,
}

impl BlockKind {
    /// English label, localized before it reaches the user.
    pub fn default_label(&self) -> &'static str {
        match self {
            BlockKind::Notice => "Notice:",
            BlockKind::AiAnswer => "AI Assistant Response:",
            BlockKind::LoanGuidance => "Loan Application Guidance:",
            BlockKind::FinancialTip => "Financial Literacy Tip:",
            BlockKind::EmiDetail => "EMI Calculation:",
            BlockKind::ApplicationSummary => "Application Submitted Successfully!",
            BlockKind::SanctionCheck => "Loan Sanction Check:",
            BlockKind::AiEligibility => "AI Eligibility Check:",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseBlock {
    pub kind: BlockKind,
    pub label: String,
    pub body: String,
    pub status: BlockStatus,
}

impl ResponseBlock {
    pub fn ok(kind: BlockKind, label: String, body: String) -> Self {
        Self {
            kind,
            label,
            body,
            status: BlockStatus::Ok,
        }
    }

    pub fn failed(kind: BlockKind, label: String, body: String) -> Self {
        Self {
            kind,
            label,
            body,
            status: BlockStatus::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == BlockStatus::Failed
    }
}

/// Ordered, already-localized blocks for one request. Never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub request_id: Uuid,
    pub language: Language,
    pub intents: Vec<Intent>,
    pub blocks: Vec<ResponseBlock>,
    /// Raw figures behind the EMI block, when one was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emi: Option<EmiResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<EligibilityVerdict>,
    pub created_at: DateTime<Utc>,
}

impl AdvisoryResponse {
    pub fn new(request_id: Uuid, language: Language, intents: Vec<Intent>, blocks: Vec<ResponseBlock>) -> Self {
        Self {
            request_id,
            language,
            intents,
            blocks,
            emi: None,
            verdict: None,
            created_at: Utc::now(),
        }
    }

    pub fn block(&self, kind: BlockKind) -> Option<&ResponseBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    pub fn failed_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_failed()).count()
    }

    /// Plain-text rendering, label then body, in block order.
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|b| format!("{}\n{}", b.label, b.body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("zh-cn".parse::<Language>().unwrap(), Language::ChineseSimplified);
        assert!("xx".parse::<Language>().is_err());
    }

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_language_serializes_as_code() {
        let json = serde_json::to_string(&Language::ChineseSimplified).unwrap();
        assert_eq!(json, "\"zh-CN\"");
    }

    #[test]
    fn test_loan_parameters_validation() {
        assert!(LoanParameters::new(100_000.0, 8.5, 10).is_ok());
        assert!(LoanParameters::new(100_000.0, 0.0, 10).is_ok());
        assert!(matches!(
            LoanParameters::new(0.0, 8.5, 10),
            Err(AdvisorError::Validation(_))
        ));
        assert!(LoanParameters::new(-5.0, 8.5, 10).is_err());
        assert!(LoanParameters::new(100_000.0, -1.0, 10).is_err());
        assert!(LoanParameters::new(100_000.0, 8.5, 0).is_err());
        assert!(LoanParameters::new(100_000.0, 8.5, 101).is_err());
        assert!(LoanParameters::new(f64::NAN, 8.5, 10).is_err());
    }

    #[test]
    fn test_emi_description() {
        let result = EmiResult {
            emi: 10_000.0,
            total_interest: 0.0,
            total_payment: 1_200_000.0,
        };
        assert_eq!(
            result.describe("₹"),
            "EMI: ₹10000.00\nTotal Interest Payable: ₹0.00\nTotal Payment (Principal + Interest): ₹1200000.00"
        );
    }

    #[test]
    fn test_intent_order_follows_block_order() {
        let intents: BTreeSet<Intent> =
            [Intent::EmiCalculation, Intent::GeneralQuery, Intent::LoanGuidance]
                .into_iter()
                .collect();
        let ordered: Vec<Intent> = intents.into_iter().collect();
        assert_eq!(
            ordered,
            vec![Intent::GeneralQuery, Intent::LoanGuidance, Intent::EmiCalculation]
        );
    }
}
