//! Advisory orchestrator
//!
//! QUERY → NORMALIZE → CLASSIFY → ANSWER PER INTENT → LOCALIZE
//!
//! Every block is produced on its own. A failed translation or model call
//! marks that block failed and the remaining blocks still render.

mod prompts;

use crate::advisory::{AdvisoryModelClient, NO_RESPONSE_SENTINEL};
use crate::application::LoanApplication;
use crate::calculator::compute_emi;
use crate::classifier::IntentClassifier;
use crate::config::AdvisorConfig;
use crate::eligibility::EligibilityEvaluator;
use crate::error::AdvisorError;
use crate::models::{
    AdvisoryQuery, AdvisoryResponse, BlockKind, EmiResult, Intent, Language, LoanParameters,
    ResponseBlock,
};
use crate::translation::TranslationGateway;
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

const EMPTY_QUERY_MESSAGE: &str = "Please enter a question about loans.";

const EMI_INPUTS_NEEDED: &str =
    "Please provide the loan amount, annual interest rate and tenure in years to calculate your EMI.";

/// Coordinates classification, calculation, translation and model calls
pub struct AdvisoryOrchestrator {
    config: Arc<AdvisorConfig>,
    translator: TranslationGateway,
    model: AdvisoryModelClient,
    classifier: IntentClassifier,
    evaluator: EligibilityEvaluator,
}

impl AdvisoryOrchestrator {
    pub fn new(
        config: Arc<AdvisorConfig>,
        translator: TranslationGateway,
        model: AdvisoryModelClient,
    ) -> Self {
        let classifier = IntentClassifier::new(config.keywords.clone());
        let evaluator = EligibilityEvaluator::new(config.eligibility);

        Self {
            config,
            translator,
            model,
            classifier,
            evaluator,
        }
    }

    /// Build the production services described by `config`.
    pub fn from_config(config: Arc<AdvisorConfig>) -> Result<Self> {
        let translator = TranslationGateway::from_config(&config)?;
        let model = AdvisoryModelClient::from_config(&config)?;
        Ok(Self::new(config, translator, model))
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Translate a UI string. Falls back to `text` when translation fails.
    pub async fn localize(&self, text: &str, language: Language) -> String {
        match self.translator.translate(text, language).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(language = %language, error = %e, "Localization failed, keeping source text");
                text.to_string()
            }
        }
    }

    /// Normalize into the pivot language and classify. When normalization
    /// fails the query carries the raw text and the failure is handed back.
    pub async fn analyze(&self, raw_text: &str) -> (AdvisoryQuery, Option<AdvisorError>) {
        let (normalized_text, failure) = match self
            .translator
            .translate(raw_text, self.config.pivot_language)
            .await
        {
            Ok(text) => (text, None),
            Err(e) => (raw_text.trim().to_string(), Some(e)),
        };

        let detected_intents = self.classifier.classify(&[raw_text, &normalized_text]);

        (
            AdvisoryQuery {
                raw_text: raw_text.to_string(),
                normalized_text,
                detected_intents,
            },
            failure,
        )
    }

    /// Answer a free-text query with one block per detected intent.
    pub async fn answer_query(
        &self,
        raw_text: &str,
        language: Language,
        emi_inputs: Option<LoanParameters>,
    ) -> AdvisoryResponse {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        info!(
            %request_id,
            language = %language,
            query_chars = raw_text.chars().count(),
            "Advisory query received"
        );

        if raw_text.trim().is_empty() {
            let block = self.text_block(BlockKind::Notice, EMPTY_QUERY_MESSAGE, language).await;
            return AdvisoryResponse::new(request_id, language, Vec::new(), vec![block]);
        }

        let (query, normalization_failure) = self.analyze(raw_text).await;
        let mut blocks = Vec::with_capacity(query.detected_intents.len() + 1);

        if let Some(e) = normalization_failure {
            warn!(%request_id, error = %e, "Normalization failed, continuing with the raw text");
            let label = self.label(BlockKind::Notice, language).await;
            blocks.push(ResponseBlock::failed(BlockKind::Notice, label, e.to_string()));
        }

        debug!(%request_id, intents = ?query.detected_intents, "Intents detected");

        let mut emi = None;
        for intent in &query.detected_intents {
            let block = match intent {
                Intent::GeneralQuery => {
                    let prompt = prompts::general_query(&query.normalized_text);
                    self.advisory_block(BlockKind::AiAnswer, &prompt, language).await
                }
                Intent::LoanGuidance => {
                    let prompt = prompts::loan_guidance(&query.normalized_text);
                    self.advisory_block(BlockKind::LoanGuidance, &prompt, language).await
                }
                Intent::FinancialTip => {
                    let prompt = prompts::financial_tip(&query.normalized_text);
                    self.advisory_block(BlockKind::FinancialTip, &prompt, language).await
                }
                Intent::EmiCalculation => match emi_inputs {
                    Some(params) => {
                        let (block, result) = self.emi_block(&params, language).await;
                        emi = result;
                        block
                    }
                    None => {
                        self.text_block(BlockKind::EmiDetail, EMI_INPUTS_NEEDED, language)
                            .await
                    }
                },
            };
            blocks.push(block);
        }

        let intents = query.detected_intents.into_iter().collect();
        let mut response = AdvisoryResponse::new(request_id, language, intents, blocks);
        response.emi = emi;

        info!(
            %request_id,
            blocks = response.blocks.len(),
            failed = response.failed_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Advisory query answered"
        );

        response
    }

    /// Process a submitted application: summary, EMI, rule verdict and the
    /// model's eligibility opinion, in that order.
    pub async fn submit_application(
        &self,
        application: &LoanApplication,
        language: Language,
    ) -> Result<AdvisoryResponse> {
        application.validate(Utc::now().date_naive())?;
        let params = application.loan_parameters(self.config.default_annual_rate_percent)?;

        let request_id = Uuid::new_v4();
        let applicant_ref = application.applicant_ref();
        let start = Instant::now();

        info!(
            %request_id,
            applicant_ref = %applicant_ref,
            language = %language,
            "Loan application received"
        );

        let mut blocks = Vec::with_capacity(4);

        blocks.push(
            self.text_block(BlockKind::ApplicationSummary, &application.summary(false), language)
                .await,
        );

        let (emi_block, emi) = self.emi_block(&params, language).await;
        blocks.push(emi_block);

        let verdict = self.evaluator.evaluate(&application.eligibility_input());
        info!(%request_id, applicant_ref = %applicant_ref, verdict = ?verdict, "Sanction rules evaluated");
        blocks.push(
            self.text_block(BlockKind::SanctionCheck, verdict.message(), language)
                .await,
        );

        let prompt = prompts::eligibility(&application.summary(true));
        blocks.push(
            self.advisory_block(BlockKind::AiEligibility, &prompt, language)
                .await,
        );

        let mut response = AdvisoryResponse::new(request_id, language, Vec::new(), blocks);
        response.emi = emi;
        response.verdict = Some(verdict);

        info!(
            %request_id,
            applicant_ref = %applicant_ref,
            failed = response.failed_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loan application processed"
        );

        Ok(response)
    }

    async fn label(&self, kind: BlockKind, language: Language) -> String {
        self.localize(kind.default_label(), language).await
    }

    /// Block whose body is pivot-language text translated for the user.
    async fn text_block(&self, kind: BlockKind, text: &str, language: Language) -> ResponseBlock {
        let label = self.label(kind, language).await;

        match self.translator.translate(text, language).await {
            Ok(body) => ResponseBlock::ok(kind, label, body),
            Err(e) => {
                warn!(block = ?kind, error = %e, "Block translation failed");
                ResponseBlock::failed(kind, label, e.to_string())
            }
        }
    }

    async fn advisory_block(&self, kind: BlockKind, prompt: &str, language: Language) -> ResponseBlock {
        let failure = match self.model.ask(prompt).await {
            Ok(Some(answer)) => return self.text_block(kind, &answer, language).await,
            Ok(None) => NO_RESPONSE_SENTINEL.to_string(),
            Err(e) => {
                warn!(block = ?kind, error = %e, "Advisory model call failed");
                format!("Error: {}", e.cause())
            }
        };

        let label = self.label(kind, language).await;
        let body = self.localize(&failure, language).await;
        ResponseBlock::failed(kind, label, body)
    }

    async fn emi_block(
        &self,
        params: &LoanParameters,
        language: Language,
    ) -> (ResponseBlock, Option<EmiResult>) {
        match compute_emi(params) {
            Ok(result) => {
                let text = result.describe(&self.config.currency_symbol);
                (self.text_block(BlockKind::EmiDetail, &text, language).await, Some(result))
            }
            Err(e) => {
                warn!(error = %e, "EMI calculation failed");
                let label = self.label(BlockKind::EmiDetail, language).await;
                (ResponseBlock::failed(BlockKind::EmiDetail, label, e.to_string()), None)
            }
        }
    }
}
