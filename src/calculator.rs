//! Financial calculator
//!
//! EMI = P × r × (1 + r)^n / [(1 + r)^n - 1]
//!
//! where r is the monthly rate (annual_rate / 12 / 100) and n the tenure in
//! months. Pure and deterministic; no I/O.

use crate::error::AdvisorError;
use crate::models::{EmiResult, LoanParameters};
use crate::Result;

const ROUNDING_TOLERANCE: f64 = 1e-9;

/// Closed-form amortized EMI.
///
/// Fails with `DivisionByZero` when `(1 + r)^n - 1` evaluates to zero, which
/// is the case for a zero rate.
pub fn amortized_emi(principal: f64, monthly_rate: f64, months: u32) -> Result<f64> {
    // (1 + r)^n - 1 via ln_1p/exp_m1 so tiny rates keep their precision
    let denominator = (f64::from(months) * monthly_rate.ln_1p()).exp_m1();
    let factor = denominator + 1.0;

    if denominator == 0.0 {
        return Err(AdvisorError::DivisionByZero);
    }

    Ok(principal * monthly_rate * factor / denominator)
}

/// EMI, total interest and total payment for a validated loan.
///
/// A zero effective rate is repaid in equal instalments of `principal / n`.
pub fn compute_emi(params: &LoanParameters) -> Result<EmiResult> {
    let monthly_rate = params.annual_rate_percent() / 12.0 / 100.0;
    let months = params.tenure_months();

    let emi = match amortized_emi(params.principal(), monthly_rate, months) {
        Ok(emi) => emi,
        Err(AdvisorError::DivisionByZero) => params.principal() / f64::from(months),
        Err(other) => return Err(other),
    };

    let total_payment = emi * f64::from(months);
    let mut total_interest = total_payment - params.principal();
    // only rounding noise is cleared; a real shortfall stays visible
    if total_interest < 0.0 && total_interest.abs() < ROUNDING_TOLERANCE * params.principal() {
        total_interest = 0.0;
    }

    Ok(EmiResult {
        emi,
        total_interest,
        total_payment,
    })
}
