//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Issues with the bot configuration (fatal at load time)
//! - FeedError: Issues reading the update candidate feed
//! - CandidateError: Issues with a single update candidate (non-fatal)

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before anything is evaluated
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Candidate feed related errors
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Errors related to the bot configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read configuration file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// Unsupported configuration file format
    #[error("unsupported configuration format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// A package rule that matches no update type
    #[error("package rule #{index} ('{description}') has an empty matchUpdateTypes list")]
    InvalidRule { index: usize, description: String },

    /// Malformed git author
    #[error("invalid gitAuthor '{value}': expected format 'Name <email>'")]
    InvalidGitAuthor { value: String },

    /// Malformed repository identifier
    #[error("invalid repository '{value}': expected format 'owner/name'")]
    InvalidRepository { value: String },

    /// Missing required value
    #[error("missing required configuration value: {field}")]
    MissingValue { field: String },
}

/// Errors related to the update candidate feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// Failed to read feed file
    #[error("failed to read candidate feed {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Feed is not valid JSON or has the wrong shape
    #[error("failed to parse candidate feed {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Errors related to a single update candidate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    /// Update type is not one of the recognized values
    #[error("candidate '{package}' in {repository}: unrecognized update type '{update_type}'")]
    InvalidUpdateType {
        package: String,
        repository: String,
        update_type: String,
    },

    /// Update type was omitted and could not be inferred from the versions
    #[error("candidate '{package}' in {repository}: cannot infer update type from {from} → {to}")]
    UnclassifiedChange {
        package: String,
        repository: String,
        from: String,
        to: String,
    },

    /// Feed entry that does not have the shape of a candidate
    #[error("feed record #{index} ('{package}' in {repository}): {message}")]
    MalformedRecord {
        index: usize,
        package: String,
        repository: String,
        message: String,
    },
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidRule error
    pub fn invalid_rule(index: usize, description: impl Into<String>) -> Self {
        ConfigError::InvalidRule {
            index,
            description: description.into(),
        }
    }

    /// Creates a new MissingValue error
    pub fn missing(field: impl Into<String>) -> Self {
        ConfigError::MissingValue {
            field: field.into(),
        }
    }
}

impl FeedError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FeedError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl CandidateError {
    /// Creates a new InvalidUpdateType error
    pub fn invalid_update_type(
        package: impl Into<String>,
        repository: impl Into<String>,
        update_type: impl Into<String>,
    ) -> Self {
        CandidateError::InvalidUpdateType {
            package: package.into(),
            repository: repository.into(),
            update_type: update_type.into(),
        }
    }

    /// Returns the package the failing candidate refers to
    pub fn package(&self) -> &str {
        match self {
            CandidateError::InvalidUpdateType { package, .. } => package,
            CandidateError::UnclassifiedChange { package, .. } => package,
            CandidateError::MalformedRecord { package, .. } => package,
        }
    }

    /// Returns the repository the failing candidate belongs to
    pub fn repository(&self) -> &str {
        match self {
            CandidateError::InvalidUpdateType { repository, .. } => repository,
            CandidateError::UnclassifiedChange { repository, .. } => repository,
            CandidateError::MalformedRecord { repository, .. } => repository,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_invalid_rule() {
        let err = ConfigError::invalid_rule(2, "hold majors");
        let msg = format!("{}", err);
        assert!(msg.contains("#2"));
        assert!(msg.contains("hold majors"));
        assert!(msg.contains("empty matchUpdateTypes"));
    }

    #[test]
    fn test_config_error_json_parse() {
        let err = ConfigError::json_parse_error("/path/to/depgate.json", "unexpected token");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_config_error_toml_parse() {
        let err = ConfigError::toml_parse_error("/path/to/depgate.toml", "invalid key");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse TOML"));
        assert!(msg.contains("invalid key"));
    }

    #[test]
    fn test_config_error_git_author() {
        let err = ConfigError::InvalidGitAuthor {
            value: "bot".to_string(),
        };
        assert!(format!("{}", err).contains("Name <email>"));
    }

    #[test]
    fn test_feed_error_parse() {
        let err = FeedError::parse_error("/tmp/feed.json", "expected array");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse candidate feed"));
        assert!(msg.contains("expected array"));
    }

    #[test]
    fn test_candidate_error_invalid_update_type() {
        let err = CandidateError::invalid_update_type("lodash", "acme/web", "security-patch");
        let msg = format!("{}", err);
        assert!(msg.contains("unrecognized update type 'security-patch'"));
        assert_eq!(err.package(), "lodash");
        assert_eq!(err.repository(), "acme/web");
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::missing("username").into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("missing required configuration value: username"));
    }

    #[test]
    fn test_app_error_from_feed_error() {
        let app_err: AppError = FeedError::parse_error("/tmp/feed.json", "expected array").into();
        assert!(matches!(app_err, AppError::Feed(_)));
        assert!(format!("{}", app_err).contains("/tmp/feed.json"));
    }

    #[test]
    fn test_candidate_error_malformed_record() {
        let err = CandidateError::MalformedRecord {
            index: 3,
            package: "lodash".to_string(),
            repository: "acme/web".to_string(),
            message: "invalid type: integer `5`, expected a string".to_string(),
        };
        assert_eq!(err.repository(), "acme/web");
        assert!(err.to_string().starts_with("feed record #3 ('lodash' in acme/web)"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ConfigError::missing("platform");
        let debug = format!("{:?}", err);
        assert!(debug.contains("MissingValue"));
    }
}
