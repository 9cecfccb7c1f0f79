//! Prompt templates sent to the advisory model, in the pivot language.

pub fn general_query(query: &str) -> String {
    format!(
        "You are a loan advisor. Help the user with their query: {}",
        query.trim()
    )
}

pub fn loan_guidance(query: &str) -> String {
    format!(
        "Provide a brief guide on the loan application process, including the documents \
         usually required (identity proof, address proof, income proof, property papers). \
         The user asked: {}",
        query.trim()
    )
}

pub fn financial_tip(query: &str) -> String {
    format!(
        "Give one simple financial literacy tip, such as a saving strategy or a way to \
         improve a credit score, relevant to this question: {}",
        query.trim()
    )
}

/// `summary` must already have its identifiers masked.
pub fn eligibility(summary: &str) -> String {
    format!(
        "Based on the following details, is the applicant eligible for a home loan? {}",
        summary
    )
}
