//! CLI argument parsing module for depgate

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Parse an RFC 3339 timestamp, e.g. 2024-06-01T12:00:00Z
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable log lines
    #[default]
    Text,
    /// One JSON object per log line
    Json,
}

/// Dependency-update policy evaluator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depgate",
    version,
    about = "Decide which dependency updates to propose"
)]
pub struct CliArgs {
    /// Candidate feed (JSON)
    pub candidates: PathBuf,

    /// Bot configuration file (.json or .toml)
    #[arg(short, long, default_value = "depgate.json")]
    pub config: PathBuf,

    /// Evaluation instant in RFC 3339 (default: now)
    #[arg(long, value_parser = parse_timestamp)]
    pub now: Option<DateTime<Utc>>,

    // General options
    /// Dry run mode - report decisions without acting on them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log format for diagnostics on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Returns the evaluation instant
    pub fn evaluation_time(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Returns true if interactive progress should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
