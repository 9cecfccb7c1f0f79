//! Loan application submitted through the form
//!
//! Employment is a tagged variant so the income used for eligibility is
//! fixed by construction, never reconstructed from the occupation at
//! submission time.

use crate::error::AdvisorError;
use crate::models::{EligibilityInput, LoanParameters};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

pub const MIN_TENURE_YEARS: u32 = 1;
pub const MAX_TENURE_YEARS: u32 = 30;

const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    ThirdGender,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    PurchaseOfPlot,
    PurchaseOfHouse,
    Construction,
    Renovation,
    TakeoverOfLoan,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "occupation", rename_all = "snake_case")]
pub enum EmploymentInfo {
    Salaried {
        employer_name: String,
        monthly_income: f64,
    },
    SelfEmployed {
        business_name: String,
        annual_income: f64,
    },
    Business {
        business_name: String,
        annual_income: f64,
    },
    Retired {
        monthly_pension: f64,
    },
    Other {
        description: String,
        monthly_income: f64,
    },
}

impl EmploymentInfo {
    /// Income figure fed to the eligibility rules.
    pub fn monthly_income(&self) -> f64 {
        match self {
            EmploymentInfo::Salaried { monthly_income, .. }
            | EmploymentInfo::Other { monthly_income, .. } => *monthly_income,
            EmploymentInfo::SelfEmployed { annual_income, .. }
            | EmploymentInfo::Business { annual_income, .. } => *annual_income / 12.0,
            EmploymentInfo::Retired { monthly_pension } => *monthly_pension,
        }
    }

    fn occupation(&self) -> &'static str {
        match self {
            EmploymentInfo::Salaried { .. } => "Salaried",
            EmploymentInfo::SelfEmployed { .. } => "Self-Employed",
            EmploymentInfo::Business { .. } => "Business",
            EmploymentInfo::Retired { .. } => "Retired",
            EmploymentInfo::Other { .. } => "Other",
        }
    }

    /// `(label, value)` for the organisation line of the summary, if any.
    fn organisation(&self) -> Option<(&'static str, &str)> {
        match self {
            EmploymentInfo::Salaried { employer_name, .. } => Some(("Employer Name", employer_name)),
            EmploymentInfo::SelfEmployed { business_name, .. }
            | EmploymentInfo::Business { business_name, .. } => Some(("Business Name", business_name)),
            EmploymentInfo::Other { description, .. } => Some(("Occupation Details", description)),
            EmploymentInfo::Retired { .. } => None,
        }
    }

    fn income_line(&self) -> String {
        match self {
            EmploymentInfo::Salaried { monthly_income, .. }
            | EmploymentInfo::Other { monthly_income, .. } => format!("Monthly Income: {}", monthly_income),
            EmploymentInfo::SelfEmployed { annual_income, .. }
            | EmploymentInfo::Business { annual_income, .. } => format!("Annual Income: {}", annual_income),
            EmploymentInfo::Retired { monthly_pension } => format!("Monthly Pension: {}", monthly_pension),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub mobile: String,
    pub email: String,
    pub pan: String,
    pub aadhaar: String,
    pub marital_status: MaritalStatus,
    pub gender: Gender,
    pub residential_address: String,
    /// `None` when the permanent address is the residential one.
    #[serde(default)]
    pub permanent_address: Option<String>,
}

impl Applicant {
    pub fn permanent_address(&self) -> &str {
        self.permanent_address
            .as_deref()
            .unwrap_or(&self.residential_address)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub amount: f64,
    pub purpose: LoanPurpose,
    pub tenure_years: u32,
    /// Falls back to the configured default rate when absent.
    #[serde(default)]
    pub annual_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant: Applicant,
    pub employment: EmploymentInfo,
    pub loan: LoanRequest,
}

impl LoanApplication {
    /// Blocking checks run before anything is computed.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        let a = &self.applicant;
        let required = [&a.full_name, &a.mobile, &a.email, &a.pan, &a.aadhaar];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AdvisorError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
        if a.date_of_birth < earliest || a.date_of_birth > today {
            return Err(AdvisorError::Validation(format!(
                "Date of birth must be between {} and {}.",
                earliest, today
            )));
        }

        if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&self.loan.tenure_years) {
            return Err(AdvisorError::Validation(format!(
                "Loan tenure must be between {} and {} years.",
                MIN_TENURE_YEARS, MAX_TENURE_YEARS
            )));
        }

        if !self.loan.amount.is_finite() || self.loan.amount <= 0.0 {
            return Err(AdvisorError::Validation(
                "Requested loan amount must be greater than zero.".to_string(),
            ));
        }

        Ok(())
    }

    pub fn loan_parameters(&self, default_rate_percent: f64) -> Result<LoanParameters> {
        LoanParameters::new(
            self.loan.amount,
            self.loan.annual_rate_percent.unwrap_or(default_rate_percent),
            self.loan.tenure_years,
        )
    }

    pub fn eligibility_input(&self) -> EligibilityInput {
        EligibilityInput {
            monthly_income: self.employment.monthly_income(),
            loan_amount: self.loan.amount,
            tenure_years: self.loan.tenure_years,
        }
    }

    /// One-line data summary. With `mask_identifiers` the PAN and Aadhaar
    /// keep only their last four characters.
    pub fn summary(&self, mask_identifiers: bool) -> String {
        let a = &self.applicant;
        let (pan, aadhaar) = if mask_identifiers {
            (mask(&a.pan), mask(&a.aadhaar))
        } else {
            (a.pan.trim().to_string(), a.aadhaar.trim().to_string())
        };

        let mut parts = vec![
            format!("Name: {}", a.full_name.trim()),
            format!("Date of Birth: {}", a.date_of_birth),
            format!("Mobile: {}", a.mobile.trim()),
            format!("Email: {}", a.email.trim()),
            format!("PAN: {}", pan),
            format!("Aadhaar: {}", aadhaar),
            format!("Marital Status: {}", a.marital_status),
            format!("Gender: {}", a.gender),
            format!("Residential Address: {}", a.residential_address.trim()),
            format!("Permanent Address: {}", a.permanent_address().trim()),
            format!("Occupation: {}", self.employment.occupation()),
        ];
        if let Some((label, value)) = self.employment.organisation() {
            parts.push(format!("{}: {}", label, value.trim()));
        }
        parts.push(self.employment.income_line());
        parts.push(format!("Loan Amount: {}", self.loan.amount));
        parts.push(format!("Loan Purpose: {}", self.loan.purpose));
        parts.push(format!("Tenure: {} years.", self.loan.tenure_years));

        parts.join(", ")
    }

    /// Stable log correlation id that does not expose the PAN.
    pub fn applicant_ref(&self) -> String {
        let digest = Sha256::digest(self.applicant.pan.trim().to_uppercase().as_bytes());
        hex::encode(digest)[..12].to_string()
    }
}

fn mask(value: &str) -> String {
    let chars: Vec<char> = value.trim().chars().collect();
    let keep = chars.len().min(4);
    let hidden = chars.len() - keep;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "X".repeat(hidden), tail)
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Widowed => "Widowed",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::ThirdGender => "Third Gender",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoanPurpose::PurchaseOfPlot => "Purchase of Plot",
            LoanPurpose::PurchaseOfHouse => "Purchase of House/Flat",
            LoanPurpose::Construction => "Construction",
            LoanPurpose::Renovation => "Renovation",
            LoanPurpose::TakeoverOfLoan => "Takeover of Loan",
        };
        write!(f, "{}", s)
    }
}
