//! REST API Server for the Loan Advisor
//!
//! Thin presentation adapter over the orchestrator. Every endpoint answers
//! with the same `ApiResponse` envelope.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::agent::AdvisoryOrchestrator;
use crate::application::LoanApplication;
use crate::error::AdvisorError;
use crate::models::{Language, LoanParameters};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct LocalizeRequest {
    pub text: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct LoanInputs {
    pub amount: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub language: Language,
    /// Figures for the EMI block, when the user filled in the calculator.
    pub loan: Option<LoanInputs>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationRequest {
    #[serde(default)]
    pub language: Language,
    #[serde(flatten)]
    pub application: LoanApplication,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LanguageOption {
    code: &'static str,
    name: &'static str,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<AdvisoryOrchestrator>,
}

/// Map an orchestrator error to a status and a user-facing message.
/// Validation messages are shown in the user's language.
async fn error_response(
    state: &ApiState,
    error: AdvisorError,
    language: Language,
) -> (StatusCode, Json<ApiResponse>) {
    match error {
        AdvisorError::Validation(message) => {
            let localized = state.orchestrator.localize(&message, language).await;
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(localized)),
            )
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(other.to_string())),
        ),
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Language Endpoints
/// =============================

async fn list_languages() -> Json<ApiResponse> {
    let options: Vec<LanguageOption> = Language::ALL
        .iter()
        .map(|lang| LanguageOption {
            code: lang.code(),
            name: lang.display_name(),
        })
        .collect();

    Json(ApiResponse::success(options))
}

async fn localize(
    State(state): State<ApiState>,
    Json(req): Json<LocalizeRequest>,
) -> Json<ApiResponse> {
    let text = state.orchestrator.localize(&req.text, req.language).await;
    Json(ApiResponse::success(serde_json::json!({ "text": text })))
}

/// =============================
/// Query Endpoint
/// =============================

async fn answer_query(
    State(state): State<ApiState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!(language = %req.language, "Received advisory query");

    let emi_inputs = match req.loan {
        Some(loan) => {
            match LoanParameters::new(loan.amount, loan.annual_rate_percent, loan.tenure_years) {
                Ok(params) => Some(params),
                Err(e) => return error_response(&state, e, req.language).await,
            }
        }
        None => None,
    };

    let response = state
        .orchestrator
        .answer_query(&req.query, req.language, emi_inputs)
        .await;

    (StatusCode::OK, Json(ApiResponse::success(response)))
}

/// =============================
/// Application Endpoint
/// =============================

async fn submit_application(
    State(state): State<ApiState>,
    Json(req): Json<ApplicationRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!(
        applicant_ref = %req.application.applicant_ref(),
        language = %req.language,
        "Received loan application"
    );

    match state
        .orchestrator
        .submit_application(&req.application, req.language)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::success(response))),
        Err(e) => error_response(&state, e, req.language).await,
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<AdvisoryOrchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/localize", post(localize))
        .route("/api/query", post(answer_query))
        .route("/api/application", post(submit_application))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<AdvisoryOrchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
