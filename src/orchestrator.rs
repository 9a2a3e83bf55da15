//! Evaluation orchestrator: the hosting context around the policy evaluator
//!
//! This module provides:
//! - Partitioning of the candidate feed per tracked repository
//! - Repository and fork filters from the bot configuration
//! - Concurrent per-repository evaluation over a shared rule list
//! - Proposal grouping and summary assembly in configuration order

use crate::config::{BotConfig, BotIdentity, Platform};
use crate::domain::{EvaluationSummary, RepositoryEvaluation, UpdateCandidate};
use crate::error::{CandidateError, ConfigError};
use crate::feed::CandidateFeed;
use crate::policy::{group_proposals, PolicyEvaluator};
use crate::progress::Progress;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Why a batch of candidates was not evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Repository is not listed in the configuration
    UntrackedRepository,
    /// Repository is a fork and forks are not included
    Fork,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UntrackedRepository => write!(f, "repository not tracked"),
            SkipReason::Fork => write!(f, "fork (includeForks is off)"),
        }
    }
}

/// Candidates of one repository that were not evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRepository {
    /// Repository identifier
    pub repository: String,
    /// Number of candidates skipped
    pub candidates: usize,
    /// Why they were skipped
    pub reason: SkipReason,
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// An evaluation task panicked or was cancelled
    TaskFailed { repository: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::TaskFailed {
                repository,
                message,
            } => write!(f, "Evaluation of {} failed: {}", repository, message),
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Bot identity the decisions are made under
    pub identity: BotIdentity,
    /// Hosting platform
    pub platform: Platform,
    /// Per-repository decisions and proposals
    pub summary: EvaluationSummary,
    /// Candidates that were filtered out before evaluation
    pub skipped: Vec<SkippedRepository>,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if some candidates could not be decided
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty() || self.summary.total_rejected() > 0
    }
}

/// Orchestrator for one evaluation run
pub struct Orchestrator {
    /// Bot configuration
    config: BotConfig,
    /// Bot identity resolved from the configuration
    identity: BotIdentity,
    /// Evaluator shared by all repository tasks
    evaluator: Arc<PolicyEvaluator>,
    /// Whether this run is a dry run
    dry_run: bool,
    /// Evaluation instant
    now: DateTime<Utc>,
}

impl Orchestrator {
    /// Create a new orchestrator; `dry_run` forces dry-run on top of the configuration
    pub fn new(config: BotConfig, now: DateTime<Utc>, dry_run: bool) -> Result<Self, ConfigError> {
        let identity = config.identity()?;
        let evaluator = Arc::new(config.evaluator()?);
        let dry_run = dry_run || config.dry_run;
        Ok(Self {
            config,
            identity,
            evaluator,
            dry_run,
            now,
        })
    }

    /// Evaluate a list of well-formed candidates
    pub async fn run(&self, candidates: Vec<UpdateCandidate>) -> OrchestratorResult {
        self.run_with_progress(CandidateFeed::from(candidates), false).await
    }

    /// Evaluate the candidate feed with optional progress display
    pub async fn run_with_progress(
        &self,
        feed: CandidateFeed,
        show_progress: bool,
    ) -> OrchestratorResult {
        let mut summary = EvaluationSummary::new(self.dry_run);
        let mut errors = Vec::new();

        // Step 1: Partition candidates per tracked repository
        let (batches, mut skipped) = self.partition(feed.candidates);
        for skip in &skipped {
            warn!(
                repository = %skip.repository,
                candidates = skip.candidates,
                reason = %skip.reason,
                "candidates skipped"
            );
        }

        // Step 2: Evaluate each repository in its own task
        let progress = Progress::start(show_progress, batches.len());
        let mut tasks = JoinSet::new();
        let mut task_repositories = HashMap::new();
        for (index, (repository, batch)) in batches.into_iter().enumerate() {
            let evaluator = Arc::clone(&self.evaluator);
            let now = self.now;
            let name = repository.clone();
            let handle = tasks.spawn_blocking(move || {
                let evaluation = evaluator.evaluate(&batch, now);
                let mut result = RepositoryEvaluation::new(repository);
                result.proposals = group_proposals(&evaluation.decisions);
                result.decisions = evaluation.decisions;
                result.rejected = evaluation.rejected;
                (index, result)
            });
            task_repositories.insert(handle.id(), name);
        }

        let mut slots: Vec<Option<RepositoryEvaluation>> = vec![None; task_repositories.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    progress.repository_done(&result.repository);
                    slots[index] = Some(result);
                }
                Err(e) => errors.push(OrchestratorError::TaskFailed {
                    repository: task_repositories.get(&e.id()).cloned().unwrap_or_default(),
                    message: e.to_string(),
                }),
            }
        }
        progress.finish();

        // Step 3: Reassemble in configuration order
        for result in slots.into_iter().flatten() {
            summary.add_repository(result);
        }

        // Step 4: Attach malformed feed records to their repository
        for record in feed.rejected {
            self.attach_rejected_record(record, &mut summary, &mut skipped);
        }

        info!(
            repositories = summary.repositories.len(),
            decisions = summary.total_decisions(),
            proposals = summary.total_proposals(),
            rejected = summary.total_rejected(),
            dry_run = self.dry_run,
            "evaluation finished"
        );

        OrchestratorResult {
            identity: self.identity.clone(),
            platform: self.config.platform,
            summary,
            skipped,
            errors,
        }
    }

    /// Malformed records from untracked repositories are skipped like any other candidate
    fn attach_rejected_record(
        &self,
        record: CandidateError,
        summary: &mut EvaluationSummary,
        skipped: &mut Vec<SkippedRepository>,
    ) {
        let repository = record.repository().to_string();
        if let Some(result) = summary
            .repositories
            .iter_mut()
            .find(|r| r.repository == repository)
        {
            result.rejected.push(record);
        } else if repository.is_empty() || self.config.tracks(&repository) {
            summary.rejected.push(record);
        } else {
            record_skip(skipped, &repository, SkipReason::UntrackedRepository);
        }
    }

    /// Split candidates into per-repository batches in configuration order
    ///
    /// Every tracked repository gets a batch, even an empty one.
    fn partition(
        &self,
        candidates: Vec<UpdateCandidate>,
    ) -> (Vec<(String, Vec<UpdateCandidate>)>, Vec<SkippedRepository>) {
        let mut batches: Vec<(String, Vec<UpdateCandidate>)> = self
            .config
            .repositories
            .iter()
            .map(|r| (r.clone(), Vec::new()))
            .collect();
        let mut skipped: Vec<SkippedRepository> = Vec::new();

        for candidate in candidates {
            let reason = if !self.config.tracks(&candidate.repository) {
                Some(SkipReason::UntrackedRepository)
            } else if candidate.fork && !self.config.include_forks {
                Some(SkipReason::Fork)
            } else {
                None
            };

            match reason {
                Some(reason) => record_skip(&mut skipped, &candidate.repository, reason),
                None => {
                    if let Some((_, batch)) =
                        batches.iter_mut().find(|(r, _)| *r == candidate.repository)
                    {
                        batch.push(candidate);
                    }
                }
            }
        }

        (batches, skipped)
    }
}

fn record_skip(skipped: &mut Vec<SkippedRepository>, repository: &str, reason: SkipReason) {
    match skipped
        .iter_mut()
        .find(|s| s.repository == repository && s.reason == reason)
    {
        Some(entry) => entry.candidates += 1,
        None => skipped.push(SkippedRepository {
            repository: repository.to_string(),
            candidates: 1,
            reason,
        }),
    }
}
