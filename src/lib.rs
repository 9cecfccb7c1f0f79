//! Multilingual Loan Advisor
//!
//! A loan advisory service that:
//! - Answers free-text questions in the user's language
//! - Detects loan guidance, financial tip and EMI intents by keyword
//! - Computes EMI and a rule-based sanction verdict deterministically
//! - Asks a generative model for open-ended advice and eligibility opinions
//! - Isolates failures per response block
//!
//! FLOW:
//! QUERY → NORMALIZE → CLASSIFY → ANSWER PER INTENT → LOCALIZE

pub mod advisory;
pub mod agent;
pub mod api;
pub mod application;
pub mod calculator;
pub mod classifier;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod translation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Result;

// Re-export common types
pub use agent::AdvisoryOrchestrator;
pub use config::AdvisorConfig;
pub use models::*;
