//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-repository decision listing with colored dispositions
//! - Proposal groups and rejected candidates
//! - Summary line with counts per disposition

use crate::domain::{Decision, Disposition, EvaluationSummary, RepositoryEvaluation, UpdateType};
use crate::error::CandidateError;
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    pub fn new(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint_disposition(&self, disposition: Disposition) -> String {
        let label = disposition.label();
        if !self.color {
            return label.to_string();
        }
        match disposition {
            Disposition::ProposeNow => label.green().to_string(),
            Disposition::Wait => label.yellow().to_string(),
            Disposition::NeedsApproval => label.cyan().to_string(),
            Disposition::Suppressed => label.dimmed().to_string(),
        }
    }

    fn paint_update_type(&self, update_type: UpdateType) -> String {
        let label = update_type.as_str();
        if !self.color {
            return label.to_string();
        }
        match update_type {
            UpdateType::Major => label.red().bold().to_string(),
            UpdateType::Minor => label.yellow().to_string(),
            UpdateType::Patch => label.green().to_string(),
            _ => label.dimmed().to_string(),
        }
    }

    /// Format a single decision line
    fn format_decision_line(
        &self,
        decision: &Decision,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let candidate = &decision.candidate;
        let arrow = if self.color {
            "→".dimmed().to_string()
        } else {
            "->".to_string()
        };

        let mut detail = String::new();
        if let Some(at) = decision.eligible_at {
            detail.push_str(&format!(" until {}", at.format("%Y/%m/%d %H:%M")));
        }
        if let Some(rule) = &decision.rule {
            detail.push_str(&format!(" via {}", rule));
        }
        let detail = if self.color {
            detail.dimmed().to_string()
        } else {
            detail
        };

        writeln!(
            writer,
            "  {:width$} {} {} {} [{}] {}{}",
            candidate.package,
            candidate.current_value,
            arrow,
            candidate.new_value,
            self.paint_update_type(decision.update_type),
            self.paint_disposition(decision.disposition),
            detail,
            width = max_name_len
        )
    }

    /// Counts per disposition, in display order, omitting zeros
    fn disposition_counts(&self, counts: impl Fn(Disposition) -> usize) -> String {
        let parts: Vec<String> = Disposition::all()
            .iter()
            .filter_map(|d| {
                let n = counts(*d);
                (n > 0).then(|| format!("{} {}", n, self.paint_disposition(*d)))
            })
            .collect();
        if parts.is_empty() {
            "no candidates".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            if self.verbosity == Verbosity::Verbose {
                writeln!(
                    writer,
                    "{} on {} as {}",
                    result.identity.username,
                    result.platform,
                    result.identity.git_author
                )?;
                writeln!(writer)?;
            }

            for repository in &result.summary.repositories {
                self.write_repository(repository, result.summary.dry_run, writer)?;
            }

            if !result.summary.rejected.is_empty() {
                writeln!(writer, "Rejected feed records:")?;
                self.write_rejected(&result.summary.rejected, "  ", writer)?;
                writeln!(writer)?;
            }

            if self.verbosity == Verbosity::Verbose && !result.skipped.is_empty() {
                writeln!(writer, "Skipped:")?;
                for skip in &result.skipped {
                    writeln!(
                        writer,
                        "  {} ({} candidates): {}",
                        skip.repository, skip.candidates, skip.reason
                    )?;
                }
                writeln!(writer)?;
            }
        }

        self.write_summary(&result.summary, writer)
    }
}

impl TextFormatter {
    fn write_summary(
        &self,
        summary: &EvaluationSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = if summary.dry_run { "(dry-run) " } else { "" };
        let counts = self.disposition_counts(|d| summary.total(d));
        let proposals = summary.total_proposals();
        let rejected = summary.total_rejected();

        let mut line = format!(
            "{}Summary: {} across {} {}; {} {}",
            prefix,
            counts,
            summary.repositories.len(),
            if summary.repositories.len() == 1 {
                "repository"
            } else {
                "repositories"
            },
            proposals,
            if proposals == 1 { "proposal" } else { "proposals" }
        );
        if rejected > 0 {
            line.push_str(&format!("; {} rejected", rejected));
        }

        if self.color {
            writeln!(writer, "{}", line.bold())
        } else {
            writeln!(writer, "{}", line)
        }
    }

    fn write_repository(
        &self,
        repository: &RepositoryEvaluation,
        dry_run: bool,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        // Empty repositories only show up in verbose mode
        if repository.decisions.is_empty()
            && repository.rejected.is_empty()
            && self.verbosity != Verbosity::Verbose
        {
            return Ok(());
        }

        let prefix = match (dry_run, self.color) {
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
            (false, _) => String::new(),
        };
        let name = if self.color {
            repository.repository.bold().to_string()
        } else {
            repository.repository.clone()
        };
        writeln!(
            writer,
            "{}{} — {}",
            prefix,
            name,
            self.disposition_counts(|d| repository.count(d))
        )?;

        let max_name_len = repository
            .decisions
            .iter()
            .map(|d| d.candidate.package.len())
            .max()
            .unwrap_or(0)
            .max(20);
        for decision in &repository.decisions {
            self.format_decision_line(decision, max_name_len, writer)?;
        }

        if !repository.proposals.is_empty() {
            writeln!(writer, "  Proposals:")?;
            for group in &repository.proposals {
                writeln!(writer, "    {}: {}", group.name, group.packages.join(", "))?;
            }
        }

        if !repository.rejected.is_empty() {
            writeln!(writer, "  Rejected:")?;
            self.write_rejected(&repository.rejected, "    ", writer)?;
        }

        writeln!(writer)
    }

    fn write_rejected(
        &self,
        rejected: &[CandidateError],
        indent: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for err in rejected {
            let msg = err.to_string();
            if self.color {
                writeln!(writer, "{}{}", indent, msg.red())?;
            } else {
                writeln!(writer, "{}{}", indent, msg)?;
            }
        }
        Ok(())
    }
}
