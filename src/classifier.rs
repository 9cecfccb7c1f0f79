//! Intent classifier
//!
//! Case-insensitive substring match against fixed keyword sets. Each set is
//! checked independently, so one query can fire several intents. Every query
//! carries `GeneralQuery`, which produces the assistant's direct answer.

use crate::models::Intent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const LOAN_GUIDANCE_KEYWORDS: &[&str] = &["apply loan", "loan application", "documents"];

const FINANCIAL_TIP_KEYWORDS: &[&str] = &["financial tips", "saving", "credit score"];

const EMI_KEYWORDS: &[&str] = &["emi", "loan calculator"];

/// Keyword sets per intent, lower-case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentKeywords {
    pub loan_guidance: Vec<String>,
    pub financial_tip: Vec<String>,
    pub emi_calculation: Vec<String>,
}

impl Default for IntentKeywords {
    fn default() -> Self {
        Self {
            loan_guidance: owned(LOAN_GUIDANCE_KEYWORDS),
            financial_tip: owned(FINANCIAL_TIP_KEYWORDS),
            emi_calculation: owned(EMI_KEYWORDS),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    keywords: IntentKeywords,
}

impl IntentClassifier {
    pub fn new(keywords: IntentKeywords) -> Self {
        Self { keywords }
    }

    /// Classify one or more renderings of the same query (for example the
    /// raw text and its pivot-language translation). A keyword found in any
    /// of them fires its intent.
    pub fn classify(&self, texts: &[&str]) -> BTreeSet<Intent> {
        let lowered: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();
        let hit = |keywords: &[String]| {
            keywords
                .iter()
                .any(|kw| lowered.iter().any(|text| text.contains(kw.as_str())))
        };

        let mut intents = BTreeSet::new();
        intents.insert(Intent::GeneralQuery);

        if hit(&self.keywords.loan_guidance) {
            intents.insert(Intent::LoanGuidance);
        }
        if hit(&self.keywords.financial_tip) {
            intents.insert(Intent::FinancialTip);
        }
        if hit(&self.keywords.emi_calculation) {
            intents.insert(Intent::EmiCalculation);
        }

        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> BTreeSet<Intent> {
        IntentClassifier::default().classify(&[text])
    }

    #[test]
    fn test_multiple_intents_fire_together() {
        let intents = classify("How do I apply loan and get financial tips");
        assert!(intents.contains(&Intent::LoanGuidance));
        assert!(intents.contains(&Intent::FinancialTip));
        assert!(!intents.contains(&Intent::EmiCalculation));
    }

    #[test]
    fn test_case_insensitive() {
        let intents = classify("What DOCUMENTS are needed? Also my EMI please");
        assert!(intents.contains(&Intent::LoanGuidance));
        assert!(intents.contains(&Intent::EmiCalculation));
    }

    #[test]
    fn test_general_query_always_present() {
        let cases = vec!["hi", "what is a home loan?", "", "Loan calculator"];

        for c in cases {
            assert!(classify(c).contains(&Intent::GeneralQuery), "missing for {:?}", c);
        }
        assert_eq!(classify("hi").len(), 1);
    }

    #[test]
    fn test_keyword_in_any_rendering() {
        let classifier = IntentClassifier::default();
        let intents = classifier.classify(&["मेरा क्रेडिट स्कोर", "my credit score"]);
        assert!(intents.contains(&Intent::FinancialTip));
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = IntentClassifier::new(IntentKeywords {
            loan_guidance: vec!["paperwork".to_string()],
            financial_tip: vec![],
            emi_calculation: vec!["instalment".to_string()],
        });

        let intents = classifier.classify(&["Paperwork and monthly instalment"]);
        assert_eq!(
            intents.into_iter().collect::<Vec<_>>(),
            vec![Intent::GeneralQuery, Intent::LoanGuidance, Intent::EmiCalculation]
        );
    }
}
