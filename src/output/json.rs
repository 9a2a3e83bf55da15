//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of decisions and proposals
//! - Structured per-repository information with summary counts

use crate::config::{BotIdentity, Platform};
use crate::domain::{Disposition, EvaluationSummary, ProposalGroup, RepositoryEvaluation, RuleRef};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Bot identity
    identity: &'a BotIdentity,
    /// Hosting platform
    platform: Platform,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-repository results
    repositories: Vec<JsonRepository<'a>>,
    /// Feed records that belong to no tracked repository
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected: Vec<String>,
    /// Candidates skipped before evaluation (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<JsonSkipped<'a>>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    propose_now: usize,
    wait: usize,
    needs_approval: usize,
    suppressed: usize,
    rejected: usize,
    proposals: usize,
}

impl JsonSummary {
    fn from_summary(summary: &EvaluationSummary) -> Self {
        Self {
            propose_now: summary.total(Disposition::ProposeNow),
            wait: summary.total(Disposition::Wait),
            needs_approval: summary.total(Disposition::NeedsApproval),
            suppressed: summary.total(Disposition::Suppressed),
            rejected: summary.total_rejected(),
            proposals: summary.total_proposals(),
        }
    }
}

/// JSON representation of a repository result
#[derive(Serialize)]
#[serde(untagged)]
enum JsonRepository<'a> {
    /// Full record, including the candidate behind each decision
    Full(&'a RepositoryEvaluation),
    /// Compact record
    Compact(JsonCompactRepository<'a>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonCompactRepository<'a> {
    repository: &'a str,
    decisions: Vec<JsonDecision<'a>>,
    proposals: &'a [ProposalGroup],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDecision<'a> {
    package: &'a str,
    from: &'a str,
    to: &'a str,
    update_type: &'static str,
    disposition: Disposition,
    rule: Option<&'a RuleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eligible_at: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSkipped<'a> {
    repository: &'a str,
    candidates: usize,
    reason: String,
}

impl JsonFormatter {
    fn repository_to_json<'a>(&self, repository: &'a RepositoryEvaluation) -> JsonRepository<'a> {
        if self.verbosity == Verbosity::Verbose {
            return JsonRepository::Full(repository);
        }

        JsonRepository::Compact(JsonCompactRepository {
            repository: &repository.repository,
            decisions: repository
                .decisions
                .iter()
                .map(|d| JsonDecision {
                    package: &d.candidate.package,
                    from: &d.candidate.current_value,
                    to: &d.candidate.new_value,
                    update_type: d.update_type.as_str(),
                    disposition: d.disposition,
                    rule: d.rule.as_ref(),
                    eligible_at: d.eligible_at.map(|at| at.to_rfc3339()),
                })
                .collect(),
            proposals: &repository.proposals,
            rejected: repository.rejected.iter().map(|e| e.to_string()).collect(),
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let skipped = if self.verbosity == Verbosity::Verbose {
            result
                .skipped
                .iter()
                .map(|s| JsonSkipped {
                    repository: &s.repository,
                    candidates: s.candidates,
                    reason: s.reason.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let output = JsonOutput {
            dry_run: result.summary.dry_run,
            identity: &result.identity,
            platform: result.platform,
            summary: JsonSummary::from_summary(&result.summary),
            repositories: result
                .summary
                .repositories
                .iter()
                .map(|r| self.repository_to_json(r))
                .collect(),
            rejected: result.summary.rejected.iter().map(|e| e.to_string()).collect(),
            skipped,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
