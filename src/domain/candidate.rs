//! Update candidate records produced by the external version feed

use super::{version_change, UpdateType};
use crate::error::CandidateError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One proposed dependency change
///
/// The update type is kept as delivered by the feed and only validated when
/// the candidate is evaluated, so one bad record cannot poison a whole feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidate {
    /// Package identifier
    pub package: String,
    /// Current version or digest
    pub current_value: String,
    /// Target version or digest
    pub new_value: String,
    /// Update type as reported by the feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_type: Option<String>,
    /// Source repository ("owner/name")
    pub repository: String,
    /// When the target version was first seen
    pub discovered_at: DateTime<Utc>,
    /// Whether the source repository is a fork
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fork: bool,
}

impl UpdateCandidate {
    /// Creates a new candidate with an explicit update type
    pub fn new(
        package: impl Into<String>,
        current_value: impl Into<String>,
        new_value: impl Into<String>,
        update_type: impl Into<String>,
        repository: impl Into<String>,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            package: package.into(),
            current_value: current_value.into(),
            new_value: new_value.into(),
            update_type: Some(update_type.into()),
            repository: repository.into(),
            discovered_at,
            fork: false,
        }
    }

    /// Drops the explicit update type so it gets inferred (builder pattern)
    pub fn without_update_type(mut self) -> Self {
        self.update_type = None;
        self
    }

    /// Marks the candidate as coming from a fork (builder pattern)
    pub fn from_fork(mut self) -> Self {
        self.fork = true;
        self
    }

    /// Resolves the update type, inferring it from the versions when absent
    pub fn resolve_update_type(&self) -> Result<UpdateType, CandidateError> {
        match &self.update_type {
            Some(raw) => raw.parse().map_err(|_| {
                CandidateError::invalid_update_type(&self.package, &self.repository, raw)
            }),
            None => version_change::classify(&self.current_value, &self.new_value).ok_or_else(
                || CandidateError::UnclassifiedChange {
                    package: self.package.clone(),
                    repository: self.repository.clone(),
                    from: self.current_value.clone(),
                    to: self.new_value.clone(),
                },
            ),
        }
    }

    /// Returns how long the candidate has been known at `now`
    ///
    /// Negative when the discovery timestamp lies in the future.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.discovered_at
    }
}

impl fmt::Display for UpdateCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {} [{}]",
            self.package, self.current_value, self.new_value, self.repository
        )
    }
}
