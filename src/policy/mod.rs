//! Policy evaluation for update candidates
//!
//! This module provides:
//! - Rule validation at load time
//! - First-match rule selection over the declared rule order
//! - The decision engine that assigns each candidate a disposition
//! - Grouping of propose-now decisions into proposals

mod grouping;

pub use grouping::group_proposals;

use crate::domain::{Decision, Disposition, PackageRule, RuleRef, UpdateCandidate, UpdateType};
use crate::error::{CandidateError, ConfigError};
use chrono::{DateTime, Utc};
use tracing::{debug, info_span, warn};

/// Output of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Decisions, in input order
    pub decisions: Vec<Decision>,
    /// Candidates excluded from the output
    pub rejected: Vec<CandidateError>,
}

/// Check that every rule matches at least one update type
pub fn validate_rules(rules: &[PackageRule]) -> Result<(), ConfigError> {
    match rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.match_update_types.is_empty())
    {
        Some((index, rule)) => Err(ConfigError::invalid_rule(index, &rule.description)),
        None => Ok(()),
    }
}

/// Decision engine over an immutable, ordered rule list
///
/// Holds no state besides the rules, so a single instance can be shared
/// across concurrent evaluation runs.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    /// Rules in declaration order
    rules: Vec<PackageRule>,
    /// Rule applied when no declared rule matches
    fallback: Option<PackageRule>,
}

impl PolicyEvaluator {
    /// Create an evaluator, rejecting rules that match nothing
    pub fn new(rules: Vec<PackageRule>) -> Result<Self, ConfigError> {
        validate_rules(&rules)?;
        Ok(Self {
            rules,
            fallback: Some(PackageRule::no_special_handling()),
        })
    }

    /// Suppress candidates no declared rule matches instead of applying the default rule
    pub fn suppress_unmatched(mut self) -> Self {
        self.fallback = None;
        self
    }

    /// Select the effective rule for an update type
    ///
    /// The first declared rule containing the update type wins, later
    /// matches are ignored.
    pub fn select_rule(&self, update_type: UpdateType) -> Option<(RuleRef, &PackageRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(update_type))
            .map(|(index, rule)| (RuleRef::declared(index, rule), rule))
            .or_else(|| self.fallback.as_ref().map(|rule| (RuleRef::Default, rule)))
    }

    /// Decide a single candidate at the instant `now`
    pub fn decide(
        &self,
        candidate: &UpdateCandidate,
        now: DateTime<Utc>,
    ) -> Result<Decision, CandidateError> {
        let update_type = candidate.resolve_update_type()?;

        let Some((rule_ref, rule)) = self.select_rule(update_type) else {
            return Ok(Decision::suppressed(candidate.clone(), update_type));
        };

        if rule.dependency_dashboard_approval {
            return Ok(Decision::new(
                candidate.clone(),
                update_type,
                Disposition::NeedsApproval,
                Some(rule_ref),
            ));
        }

        if rule.stability_days > 0 && candidate.age(now) < rule.stability_window() {
            let eligible_at = candidate
                .discovered_at
                .checked_add_signed(rule.stability_window());
            return Ok(Decision::wait(
                candidate.clone(),
                update_type,
                rule_ref,
                eligible_at,
            ));
        }

        Ok(Decision::new(
            candidate.clone(),
            update_type,
            Disposition::ProposeNow,
            Some(rule_ref),
        ))
    }

    /// Decide every candidate, preserving input order
    ///
    /// Invalid candidates are reported in [`Evaluation::rejected`] and do not
    /// stop the pass.
    pub fn evaluate(&self, candidates: &[UpdateCandidate], now: DateTime<Utc>) -> Evaluation {
        let _span = info_span!(
            "evaluate",
            candidates = candidates.len(),
            rules = self.rules.len()
        )
        .entered();

        let mut evaluation = Evaluation::default();
        for candidate in candidates {
            match self.decide(candidate, now) {
                Ok(decision) => {
                    debug!(
                        package = %candidate.package,
                        repository = %candidate.repository,
                        update_type = %decision.update_type,
                        disposition = %decision.disposition,
                        "candidate decided"
                    );
                    evaluation.decisions.push(decision);
                }
                Err(err) => {
                    warn!(%err, "candidate rejected");
                    evaluation.rejected.push(err);
                }
            }
        }
        evaluation
    }
}

/// Evaluate `candidates` against `rules` at the instant `now`
pub fn evaluate(
    candidates: &[UpdateCandidate],
    rules: &[PackageRule],
    now: DateTime<Utc>,
) -> Result<Evaluation, ConfigError> {
    let evaluator = PolicyEvaluator::new(rules.to_vec())?;
    Ok(evaluator.evaluate(candidates, now))
}
