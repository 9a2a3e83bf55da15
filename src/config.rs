//! Bot configuration loading and validation
//!
//! The configuration is read once at process start (JSON or TOML, chosen by
//! file extension) and is read-only afterwards. Any validation failure is
//! fatal.

use crate::domain::PackageRule;
use crate::error::ConfigError;
use crate::policy::{validate_rules, PolicyEvaluator};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static GIT_AUTHOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^<>\s][^<>]*?)\s*<([^<>\s@]+@[^<>\s@]+)>\s*$").unwrap());

static REPOSITORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

/// Source-control hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Gitlab,
    Bitbucket,
    Azure,
    Gitea,
    Forgejo,
    Local,
}

impl Platform {
    /// Returns the display name for this platform
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Github => "GitHub",
            Platform::Gitlab => "GitLab",
            Platform::Bitbucket => "Bitbucket",
            Platform::Azure => "Azure DevOps",
            Platform::Gitea => "Gitea",
            Platform::Forgejo => "Forgejo",
            Platform::Local => "local",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Commit author in "Name <email>" form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitAuthor {
    pub name: String,
    pub email: String,
}

impl GitAuthor {
    /// Parse a "Name <email>" string
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let caps = GIT_AUTHOR_PATTERN
            .captures(value)
            .ok_or_else(|| ConfigError::InvalidGitAuthor {
                value: value.to_string(),
            })?;
        Ok(Self {
            name: caps[1].to_string(),
            email: caps[2].to_string(),
        })
    }
}

impl fmt::Display for GitAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Identity the bot acts under on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotIdentity {
    pub username: String,
    pub git_author: GitAuthor,
}

/// Bot configuration as written by the user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BotConfig {
    /// JSON schema reference, ignored
    #[serde(rename = "$schema", default)]
    pub schema: Option<String>,
    /// Bot account name
    pub username: String,
    /// Commit author, "Name <email>"
    pub git_author: String,
    /// Onboarding proposals are a platform concern; accepted for compatibility and ignored
    #[serde(default)]
    pub onboarding: bool,
    /// Hosting platform
    pub platform: Platform,
    /// Tracked repositories ("owner/name")
    #[serde(default)]
    pub repositories: Vec<String>,
    /// Whether forked repositories are processed
    #[serde(default)]
    pub include_forks: bool,
    /// Report decisions without acting on them
    #[serde(default)]
    pub dry_run: bool,
    /// Suppress candidates no rule matches instead of applying the default rule
    #[serde(default)]
    pub suppress_unmatched: bool,
    /// Ordered package rules
    #[serde(default)]
    pub package_rules: Vec<PackageRule>,
}

impl BotConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)
                .map_err(|e| ConfigError::json_parse_error(path, e.to_string()))?,
            Some("toml") => Self::from_toml(&content)
                .map_err(|e| ConfigError::toml_parse_error(path, e.to_string()))?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        config.validate()?;
        debug!(
            path = %path.display(),
            repositories = config.repositories.len(),
            rules = config.package_rules.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse JSON content without validating it
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Parse TOML content without validating it
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check the semantic constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::missing("username"));
        }
        GitAuthor::parse(&self.git_author)?;
        if let Some(repo) = self
            .repositories
            .iter()
            .find(|r| !REPOSITORY_PATTERN.is_match(r))
        {
            return Err(ConfigError::InvalidRepository {
                value: repo.clone(),
            });
        }
        validate_rules(&self.package_rules)
    }

    /// Returns the bot identity
    pub fn identity(&self) -> Result<BotIdentity, ConfigError> {
        Ok(BotIdentity {
            username: self.username.clone(),
            git_author: GitAuthor::parse(&self.git_author)?,
        })
    }

    /// Returns true if the repository is tracked
    pub fn tracks(&self, repository: &str) -> bool {
        self.repositories.iter().any(|r| r == repository)
    }

    /// Build the policy evaluator for this configuration
    pub fn evaluator(&self) -> Result<PolicyEvaluator, ConfigError> {
        let evaluator = PolicyEvaluator::new(self.package_rules.clone())?;
        Ok(if self.suppress_unmatched {
            evaluator.suppress_unmatched()
        } else {
            evaluator
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpdateType;

    const SAMPLE_JSON: &str = r#"{
        "username": "deps-bot",
        "gitAuthor": "Deps Bot <bot@example.com>",
        "onboarding": false,
        "platform": "github",
        "repositories": ["acme/web", "acme/api"],
        "packageRules": [
            {
                "description": "Lock file maintenance needs approval",
                "matchUpdateTypes": ["lockFileMaintenance"],
                "dependencyDashboardApproval": true,
                "stabilityDays": 0
            }
        ]
    }"#;

    #[test]
    fn test_parse_json_with_defaults() {
        let config = BotConfig::from_json(SAMPLE_JSON).unwrap();
        assert_eq!(config.username, "deps-bot");
        assert_eq!(config.platform, Platform::Github);
        assert_eq!(config.repositories, vec!["acme/web", "acme/api"]);
        assert!(!config.dry_run);
        assert!(!config.include_forks);
        assert!(!config.suppress_unmatched);
        assert_eq!(config.package_rules.len(), 1);
        assert!(config.package_rules[0].dependency_dashboard_approval);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
username = "deps-bot"
gitAuthor = "Deps Bot <bot@example.com>"
platform = "gitlab"
repositories = ["group/project"]
dryRun = true
includeForks = true

[[packageRules]]
description = "hold majors"
matchUpdateTypes = ["major"]
stabilityDays = 3
"#;
        let config = BotConfig::from_toml(content).unwrap();
        assert_eq!(config.platform, Platform::Gitlab);
        assert!(config.dry_run);
        assert!(config.include_forks);
        assert_eq!(
            config.package_rules[0].match_update_types,
            vec![UpdateType::Major]
        );
        assert_eq!(config.package_rules[0].stability_days, 3);
    }

    #[test]
    fn test_schema_key_accepted() {
        let json = SAMPLE_JSON.replacen('{', r#"{"$schema": "https://example.com/schema.json","#, 1);
        assert!(BotConfig::from_json(&json).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = SAMPLE_JSON.replacen('{', r#"{"automerge": true,"#, 1);
        assert!(BotConfig::from_json(&json).is_err());
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let json = SAMPLE_JSON.replace("\"github\"", "\"sourcehut\"");
        assert!(BotConfig::from_json(&json).is_err());
    }

    #[test]
    fn test_empty_rule_rejected() {
        let json = SAMPLE_JSON.replace(r#"["lockFileMaintenance"]"#, "[]");
        let config = BotConfig::from_json(&json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRule { index: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_repository_rejected() {
        let json = SAMPLE_JSON.replace("acme/api", "not-a-repo");
        let config = BotConfig::from_json(&json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRepository { .. })
        ));
    }

    #[test]
    fn test_empty_username_rejected() {
        let json = SAMPLE_JSON.replace("deps-bot", " ");
        let config = BotConfig::from_json(&json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_git_author_parse() {
        let author = GitAuthor::parse("Deps Bot <bot@example.com>").unwrap();
        assert_eq!(author.name, "Deps Bot");
        assert_eq!(author.email, "bot@example.com");
        assert_eq!(format!("{}", author), "Deps Bot <bot@example.com>");
    }

    #[test]
    fn test_git_author_invalid() {
        assert!(GitAuthor::parse("Deps Bot").is_err());
        assert!(GitAuthor::parse("<bot@example.com>").is_err());
        assert!(GitAuthor::parse("Deps Bot <not-an-email>").is_err());
    }

    #[test]
    fn test_identity_and_tracking() {
        let config = BotConfig::from_json(SAMPLE_JSON).unwrap();
        let identity = config.identity().unwrap();
        assert_eq!(identity.username, "deps-bot");
        assert_eq!(identity.git_author.email, "bot@example.com");
        assert!(config.tracks("acme/web"));
        assert!(!config.tracks("acme/other"));
    }

    #[test]
    fn test_evaluator_respects_suppress_unmatched() {
        let json = SAMPLE_JSON.replacen('{', r#"{"suppressUnmatched": true,"#, 1);
        let config = BotConfig::from_json(&json).unwrap();
        let evaluator = config.evaluator().unwrap();
        assert!(evaluator.select_rule(UpdateType::Patch).is_none());
        assert!(evaluator
            .select_rule(UpdateType::LockFileMaintenance)
            .is_some());
    }

    #[test]
    fn test_onboarding_accepted_and_ignored() {
        let on = BotConfig::from_json(&SAMPLE_JSON.replace(
            r#""onboarding": false"#,
            r#""onboarding": true"#,
        ))
        .unwrap();
        let off = BotConfig::from_json(SAMPLE_JSON).unwrap();
        assert!(on.onboarding);
        assert!(on.validate().is_ok());
        assert_eq!(on.identity().unwrap(), off.identity().unwrap());
        assert_eq!(
            on.evaluator().unwrap().select_rule(UpdateType::LockFileMaintenance),
            off.evaluator().unwrap().select_rule(UpdateType::LockFileMaintenance)
        );
    }
}
