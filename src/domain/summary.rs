//! Evaluation result summary types
//!
//! Provides structures for tracking decisions at repository and overall levels.

use super::{Decision, Disposition, ProposalGroup};
use crate::error::CandidateError;
use serde::{Serialize, Serializer};

/// Evaluation result for a single repository
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryEvaluation {
    /// Repository identifier ("owner/name")
    pub repository: String,
    /// Decisions, in candidate feed order
    pub decisions: Vec<Decision>,
    /// Candidates excluded from evaluation
    #[serde(serialize_with = "serialize_errors")]
    pub rejected: Vec<CandidateError>,
    /// Proposals to open now
    pub proposals: Vec<ProposalGroup>,
}

fn serialize_errors<S: Serializer>(errors: &[CandidateError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(errors.iter().map(|e| e.to_string()))
}

impl RepositoryEvaluation {
    /// Creates an empty evaluation for a repository
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            decisions: Vec::new(),
            rejected: Vec::new(),
            proposals: Vec::new(),
        }
    }

    /// Returns the number of decisions with the given disposition
    pub fn count(&self, disposition: Disposition) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.disposition == disposition)
            .count()
    }
}

/// Overall summary of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    /// Results for each tracked repository
    pub repositories: Vec<RepositoryEvaluation>,
    /// Feed records that could not be attributed to a repository
    #[serde(serialize_with = "serialize_errors")]
    pub rejected: Vec<CandidateError>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl EvaluationSummary {
    /// Creates a new EvaluationSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            repositories: Vec::new(),
            rejected: Vec::new(),
            dry_run,
        }
    }

    /// Adds a repository result
    pub fn add_repository(&mut self, repository: RepositoryEvaluation) {
        self.repositories.push(repository);
    }

    /// Returns the total number of candidates decided
    pub fn total_decisions(&self) -> usize {
        self.repositories.iter().map(|r| r.decisions.len()).sum()
    }

    /// Returns the total number of decisions with the given disposition
    pub fn total(&self, disposition: Disposition) -> usize {
        self.repositories.iter().map(|r| r.count(disposition)).sum()
    }

    /// Returns the total number of rejected candidates and feed records
    pub fn total_rejected(&self) -> usize {
        self.rejected.len() + self.repositories.iter().map(|r| r.rejected.len()).sum::<usize>()
    }

    /// Returns the total number of proposals
    pub fn total_proposals(&self) -> usize {
        self.repositories.iter().map(|r| r.proposals.len()).sum()
    }

    /// Returns the result for a repository
    pub fn repository(&self, name: &str) -> Option<&RepositoryEvaluation> {
        self.repositories.iter().find(|r| r.repository == name)
    }
}
