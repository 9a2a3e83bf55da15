//! Evaluation decision types

use super::{PackageRule, UpdateCandidate, UpdateType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What should happen to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    /// Propose the update right away
    ProposeNow,
    /// Candidate is still inside its stability window
    Wait,
    /// Proposal is gated on dashboard approval
    NeedsApproval,
    /// No rule applies and unmatched candidates are not proposed
    Suppressed,
}

impl Disposition {
    /// Returns the display label
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::ProposeNow => "propose-now",
            Disposition::Wait => "wait",
            Disposition::NeedsApproval => "needs-approval",
            Disposition::Suppressed => "suppressed",
        }
    }

    /// Returns all dispositions in display order
    pub fn all() -> &'static [Disposition] {
        &[
            Disposition::ProposeNow,
            Disposition::Wait,
            Disposition::NeedsApproval,
            Disposition::Suppressed,
        ]
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Reference to the rule that produced a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleRef {
    /// A rule from the configured list, by declaration index
    Declared { index: usize, description: String },
    /// The fallback rule for unmatched update types
    Default,
}

impl RuleRef {
    /// Creates a reference to a declared rule
    pub fn declared(index: usize, rule: &PackageRule) -> Self {
        RuleRef::Declared {
            index,
            description: rule.description.clone(),
        }
    }

    /// Returns the declaration index, if this is a declared rule
    pub fn index(&self) -> Option<usize> {
        match self {
            RuleRef::Declared { index, .. } => Some(*index),
            RuleRef::Default => None,
        }
    }
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRef::Declared { index, description } if description.is_empty() => {
                write!(f, "rule #{}", index)
            }
            RuleRef::Declared { index, description } => {
                write!(f, "rule #{} ({})", index, description)
            }
            RuleRef::Default => write!(f, "default rule"),
        }
    }
}

/// Decision produced for a single candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// The candidate this decision is about
    pub candidate: UpdateCandidate,
    /// Resolved update type of the candidate
    pub update_type: UpdateType,
    /// What should happen to the candidate
    pub disposition: Disposition,
    /// Rule that produced the decision; `None` for suppressed candidates
    pub rule: Option<RuleRef>,
    /// When a waiting candidate becomes eligible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_at: Option<DateTime<Utc>>,
}

impl Decision {
    /// Creates a new decision
    pub fn new(
        candidate: UpdateCandidate,
        update_type: UpdateType,
        disposition: Disposition,
        rule: Option<RuleRef>,
    ) -> Self {
        Self {
            candidate,
            update_type,
            disposition,
            rule,
            eligible_at: None,
        }
    }

    /// Creates a wait decision
    ///
    /// `eligible_at` is `None` when the window ends past the representable
    /// date range.
    pub fn wait(
        candidate: UpdateCandidate,
        update_type: UpdateType,
        rule: RuleRef,
        eligible_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            eligible_at,
            ..Self::new(candidate, update_type, Disposition::Wait, Some(rule))
        }
    }

    /// Creates a suppressed decision
    pub fn suppressed(candidate: UpdateCandidate, update_type: UpdateType) -> Self {
        Self::new(candidate, update_type, Disposition::Suppressed, None)
    }

    /// Returns true if the candidate should be proposed now
    pub fn is_actionable(&self) -> bool {
        self.disposition == Disposition::ProposeNow
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {} ({}) {}",
            self.candidate.package,
            self.candidate.current_value,
            self.candidate.new_value,
            self.update_type,
            self.disposition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_candidate() -> UpdateCandidate {
        UpdateCandidate::new(
            "lodash",
            "4.17.20",
            "4.17.21",
            "patch",
            "acme/web",
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_disposition_labels() {
        assert_eq!(Disposition::ProposeNow.label(), "propose-now");
        assert_eq!(Disposition::Wait.label(), "wait");
        assert_eq!(Disposition::NeedsApproval.label(), "needs-approval");
        assert_eq!(Disposition::Suppressed.label(), "suppressed");
    }

    #[test]
    fn test_disposition_serde_matches_label() {
        for d in Disposition::all() {
            let json = serde_json::to_string(d).unwrap();
            assert_eq!(json, format!("\"{}\"", d.label()));
        }
    }

    #[test]
    fn test_rule_ref_display() {
        let rule = PackageRule::new("hold majors", vec![UpdateType::Major]);
        assert_eq!(
            format!("{}", RuleRef::declared(1, &rule)),
            "rule #1 (hold majors)"
        );
        let unnamed = PackageRule::new("", vec![UpdateType::Major]);
        assert_eq!(format!("{}", RuleRef::declared(0, &unnamed)), "rule #0");
        assert_eq!(format!("{}", RuleRef::Default), "default rule");
    }

    #[test]
    fn test_rule_ref_index() {
        let rule = PackageRule::new("", vec![UpdateType::Major]);
        assert_eq!(RuleRef::declared(3, &rule).index(), Some(3));
        assert_eq!(RuleRef::Default.index(), None);
    }

    #[test]
    fn test_wait_decision_carries_eligibility() {
        let at = Utc.with_ymd_and_hms(2024, 6, 4, 12, 0, 0).unwrap();
        let decision = Decision::wait(sample_candidate(), UpdateType::Patch, RuleRef::Default, Some(at));
        assert_eq!(decision.disposition, Disposition::Wait);
        assert_eq!(decision.eligible_at, Some(at));
        assert!(!decision.is_actionable());
    }

    #[test]
    fn test_suppressed_decision_has_no_rule() {
        let decision = Decision::suppressed(sample_candidate(), UpdateType::Patch);
        assert_eq!(decision.disposition, Disposition::Suppressed);
        assert!(decision.rule.is_none());
    }

    #[test]
    fn test_decision_display() {
        let decision = Decision::new(
            sample_candidate(),
            UpdateType::Patch,
            Disposition::ProposeNow,
            Some(RuleRef::Default),
        );
        assert_eq!(
            format!("{}", decision),
            "lodash: 4.17.20 → 4.17.21 (patch) propose-now"
        );
        assert!(decision.is_actionable());
    }

    #[test]
    fn test_serde_decision() {
        let decision = Decision::new(
            sample_candidate(),
            UpdateType::Patch,
            Disposition::NeedsApproval,
            Some(RuleRef::Default),
        );
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains("\"disposition\":\"needs-approval\""));
        assert!(json.contains("\"kind\":\"default\""));
        assert!(!json.contains("eligibleAt"));
        let parsed: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, decision);
    }
}
