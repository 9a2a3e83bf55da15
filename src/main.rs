//! depgate - Dependency-update policy evaluator CLI tool
//!
//! Reads a bot configuration and a feed of update candidates, and reports
//! which candidates to propose now, which wait, and which need approval.

use anyhow::Context;
use clap::Parser;
use depgate::cli::{CliArgs, LogFormat};
use depgate::config::BotConfig;
use depgate::error::AppError;
use depgate::feed::{load_feed, CandidateFeed};
use depgate::orchestrator::Orchestrator;
use depgate::output::{create_formatter, Verbosity};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = init_tracing(args.log_format, args.verbose) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG overrides the default level
fn init_tracing(log_format: LogFormat, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init tracing: {}", e))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init tracing: {}", e))?,
    }

    Ok(())
}

/// Configuration and feed errors are fatal: never evaluate with invalid rules
fn load_inputs(args: &CliArgs) -> Result<(BotConfig, CandidateFeed), AppError> {
    let config = BotConfig::load(&args.config)?;
    let feed = load_feed(&args.candidates)?;
    Ok((config, feed))
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let (config, feed) = load_inputs(&args)?;

    let now = args.evaluation_time();
    let orchestrator = Orchestrator::new(config, now, args.dry_run)
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;
    let result = orchestrator
        .run_with_progress(feed, args.show_progress())
        .await;

    // Output results
    let verbosity = Verbosity::from_flags(args.verbose, args.quiet);
    let formatter = create_formatter(args.json, verbosity, !args.no_color);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    for error in &result.errors {
        eprintln!("Error: {}", error);
    }

    if result.is_partial() {
        // Partial success - some candidates could not be decided
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
