//! Package rules: an update-type predicate plus its effect

use super::UpdateType;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A matching rule loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PackageRule {
    /// Free text description
    #[serde(default)]
    pub description: String,
    /// Update types this rule applies to
    pub match_update_types: Vec<UpdateType>,
    /// Days a candidate must age before being proposed
    #[serde(default)]
    pub stability_days: u32,
    /// Whether proposals wait for sign-off on the dependency dashboard
    #[serde(default)]
    pub dependency_dashboard_approval: bool,
}

impl PackageRule {
    /// Creates a rule matching the given update types with no effect
    pub fn new(description: impl Into<String>, match_update_types: Vec<UpdateType>) -> Self {
        Self {
            description: description.into(),
            match_update_types,
            stability_days: 0,
            dependency_dashboard_approval: false,
        }
    }

    /// The rule applied to candidates no declared rule matches
    pub fn no_special_handling() -> Self {
        Self::new("no special handling", UpdateType::all().to_vec())
    }

    /// Sets the stability window (builder pattern)
    pub fn with_stability_days(mut self, days: u32) -> Self {
        self.stability_days = days;
        self
    }

    /// Requires dashboard approval (builder pattern)
    pub fn with_dashboard_approval(mut self, required: bool) -> Self {
        self.dependency_dashboard_approval = required;
        self
    }

    /// Returns true if the rule applies to the given update type
    pub fn matches(&self, update_type: UpdateType) -> bool {
        self.match_update_types.contains(&update_type)
    }

    /// Returns the stability window as a duration
    pub fn stability_window(&self) -> Duration {
        Duration::days(i64::from(self.stability_days))
    }
}

impl fmt::Display for PackageRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.match_update_types.iter().map(|t| t.as_str()).collect();
        if self.description.is_empty() {
            write!(f, "[{}]", types.join(", "))
        } else {
            write!(f, "{} [{}]", self.description, types.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let rule = PackageRule::new("majors", vec![UpdateType::Major]);
        assert!(rule.matches(UpdateType::Major));
        assert!(!rule.matches(UpdateType::Minor));
    }

    #[test]
    fn test_no_special_handling_matches_everything() {
        let rule = PackageRule::no_special_handling();
        for t in UpdateType::all() {
            assert!(rule.matches(*t));
        }
        assert_eq!(rule.stability_days, 0);
        assert!(!rule.dependency_dashboard_approval);
    }

    #[test]
    fn test_stability_window() {
        let rule = PackageRule::new("", vec![UpdateType::Patch]).with_stability_days(3);
        assert_eq!(rule.stability_window(), Duration::days(3));
    }

    #[test]
    fn test_display() {
        let rule = PackageRule::new("hold", vec![UpdateType::Major, UpdateType::Minor]);
        assert_eq!(format!("{}", rule), "hold [major, minor]");
        let unnamed = PackageRule::new("", vec![UpdateType::Pin]);
        assert_eq!(format!("{}", unnamed), "[pin]");
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{"matchUpdateTypes": ["lockFileMaintenance"]}"#;
        let rule: PackageRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.match_update_types, vec![UpdateType::LockFileMaintenance]);
        assert_eq!(rule.stability_days, 0);
        assert!(!rule.dependency_dashboard_approval);
        assert!(rule.description.is_empty());
    }

    #[test]
    fn test_serde_rejects_unknown_update_type() {
        let json = r#"{"matchUpdateTypes": ["security-patch"]}"#;
        assert!(serde_json::from_str::<PackageRule>(json).is_err());
    }

    #[test]
    fn test_serde_rejects_negative_stability_days() {
        let json = r#"{"matchUpdateTypes": ["major"], "stabilityDays": -1}"#;
        assert!(serde_json::from_str::<PackageRule>(json).is_err());
    }
}
