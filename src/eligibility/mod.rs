//! Eligibility evaluator for loan sanction checks
//!
//! Rules-based and deterministic. Rules run in a fixed order and the first
//! one that matches decides the verdict; rule 1 is a precondition, not a
//! severity ranking.

use crate::models::{EligibilityInput, EligibilityVerdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MIN_MONTHLY_INCOME: f64 = 20_000.0;
pub const DEFAULT_MAX_INCOME_SHARE: f64 = 0.5;

/// Thresholds the rules read. Loaded once with the rest of the config.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EligibilityPolicy {
    /// Monthly income below which a loan is not sanctioned.
    pub min_monthly_income: f64,
    /// Largest share of income over the whole tenure the loan may take.
    pub max_income_share: f64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_monthly_income: DEFAULT_MIN_MONTHLY_INCOME,
            max_income_share: DEFAULT_MAX_INCOME_SHARE,
        }
    }
}

/// Trait for a single sanction rule
pub trait EligibilityRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Verdict to report when this rule matches
    fn verdict(&self) -> EligibilityVerdict;

    fn matches(&self, input: &EligibilityInput, policy: &EligibilityPolicy) -> bool;
}

/// Evaluator holding the ordered rule set
pub struct EligibilityEvaluator {
    policy: EligibilityPolicy,
    rules: Vec<Box<dyn EligibilityRule>>,
}

impl EligibilityEvaluator {
    /// Evaluator with the standard rule order.
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self {
            policy,
            rules: vec![
                Box::new(InsufficientDataRule),
                Box::new(IncomeLeverageRule),
                Box::new(MinimumIncomeRule),
            ],
        }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    pub fn evaluate(&self, input: &EligibilityInput) -> EligibilityVerdict {
        let verdict = self
            .rules
            .iter()
            .find(|rule| rule.matches(input, &self.policy))
            .map(|rule| {
                debug!(rule = rule.name(), "Eligibility rule matched");
                rule.verdict()
            })
            .unwrap_or(EligibilityVerdict::Approvable);

        debug!(
            monthly_income = input.monthly_income,
            loan_amount = input.loan_amount,
            tenure_years = input.tenure_years,
            ?verdict,
            "Eligibility evaluated"
        );

        verdict
    }
}

impl Default for EligibilityEvaluator {
    fn default() -> Self {
        Self::new(EligibilityPolicy::default())
    }
}

/// Convenience wrapper over the default policy.
pub fn evaluate(monthly_income: f64, loan_amount: f64, tenure_years: u32) -> EligibilityVerdict {
    EligibilityEvaluator::default().evaluate(&EligibilityInput {
        monthly_income,
        loan_amount,
        tenure_years,
    })
}

//
// ========== Rules ==========
//

/// Rule 1: every figure must be positive. NaN counts as missing.
pub struct InsufficientDataRule;

impl EligibilityRule for InsufficientDataRule {
    fn name(&self) -> &'static str {
        "insufficient_data"
    }

    fn verdict(&self) -> EligibilityVerdict {
        EligibilityVerdict::InsufficientData
    }

    fn matches(&self, input: &EligibilityInput, _policy: &EligibilityPolicy) -> bool {
        missing(input.monthly_income) || missing(input.loan_amount) || input.tenure_years == 0
    }
}

fn missing(value: f64) -> bool {
    value.is_nan() || value <= 0.0
}

/// Rule 2: loan must not exceed the allowed share of income over the tenure.
pub struct IncomeLeverageRule;

impl EligibilityRule for IncomeLeverageRule {
    fn name(&self) -> &'static str {
        "income_leverage"
    }

    fn verdict(&self) -> EligibilityVerdict {
        EligibilityVerdict::LoanTooHighRelativeToIncome
    }

    fn matches(&self, input: &EligibilityInput, policy: &EligibilityPolicy) -> bool {
        let ceiling =
            input.monthly_income * f64::from(input.tenure_years) * 12.0 * policy.max_income_share;
        input.loan_amount > ceiling
    }
}

/// Rule 3: minimum monthly income.
pub struct MinimumIncomeRule;

impl EligibilityRule for MinimumIncomeRule {
    fn name(&self) -> &'static str {
        "minimum_income"
    }

    fn verdict(&self) -> EligibilityVerdict {
        EligibilityVerdict::IncomeBelowThreshold
    }

    fn matches(&self, input: &EligibilityInput, policy: &EligibilityPolicy) -> bool {
        input.monthly_income < policy.min_monthly_income
    }
}

//
// ================= Tests =================
//
