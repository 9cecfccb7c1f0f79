use loan_advisor::{api::start_server, AdvisorConfig, AdvisoryOrchestrator};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Loads .env before reading the environment
    let config = Arc::new(AdvisorConfig::from_env()?);

    if config.model.api_key.is_empty() {
        warn!("GEMINI_API_KEY not set, advisory blocks will report a service error");
    }

    info!("🚀 Multilingual Loan Advisor - API Server");
    info!("📍 Port: {}", config.server_port);
    info!(
        pivot = %config.pivot_language,
        model = %config.model.model,
        "Configuration loaded"
    );

    let port = config.server_port;
    let orchestrator = Arc::new(AdvisoryOrchestrator::from_config(config)?);

    info!("✅ Orchestrator initialized");
    info!("📡 Starting API server...");

    start_server(orchestrator, port).await?;

    Ok(())
}
