//! Error types for the loan advisor

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {

    // =============================
    // Advisory Pipeline Errors
    // =============================

    /// Missing, zero or negative required input. Blocks a submission.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Translation Error: {0}")]
    Translation(String),

    #[error("Advisory service error: {0}")]
    AdvisoryService(String),

    /// Closed-form EMI denominator `(1 + r)^n - 1` evaluated to zero.
    #[error("Division by zero in EMI formula")]
    DivisionByZero,

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdvisorError {
    /// Message without the kind prefix, used when the kind is already
    /// carried by the surrounding label.
    pub fn cause(&self) -> String {
        match self {
            AdvisorError::Validation(msg)
            | AdvisorError::Translation(msg)
            | AdvisorError::AdvisoryService(msg)
            | AdvisorError::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
