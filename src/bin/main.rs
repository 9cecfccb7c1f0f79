use loan_advisor::{AdvisorConfig, AdvisoryOrchestrator, Language, LoanParameters};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: advisor <language-code> [--loan <amount> <annual-rate-%> <tenure-years>] <query...>";

/// Split `--loan a r t` out of the remaining arguments.
fn parse_loan(args: Vec<String>) -> Result<(Option<LoanParameters>, Vec<String>), Box<dyn std::error::Error>> {
    let Some(pos) = args.iter().position(|a| a == "--loan") else {
        return Ok((None, args));
    };
    if args.len() < pos + 4 {
        return Err(USAGE.into());
    }

    let amount: f64 = args[pos + 1].parse()?;
    let rate: f64 = args[pos + 2].parse()?;
    let years: u32 = args[pos + 3].parse()?;

    let rest = args[..pos]
        .iter()
        .chain(args[pos + 4..].iter())
        .cloned()
        .collect();

    Ok((Some(LoanParameters::new(amount, rate, years)?), rest))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only the answer
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let language: Language = args.next().ok_or(USAGE)?.parse()?;
    let (emi_inputs, words) = parse_loan(args.collect())?;

    let query = words.join(" ");
    if query.trim().is_empty() {
        return Err(USAGE.into());
    }

    let config = Arc::new(AdvisorConfig::from_env()?);
    let orchestrator = AdvisoryOrchestrator::from_config(config)?;

    info!(language = %language, "Running advisory query");

    let response = orchestrator.answer_query(&query, language, emi_inputs).await;
    println!("{}", response.render());

    if response.failed_count() > 0 {
        eprintln!("{} block(s) could not be produced", response.failed_count());
    }

    Ok(())
}
