//! Update type classification for dependency changes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Classification of a proposed dependency change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateType {
    /// Replace a range with the exact version it resolves to
    Pin,
    /// Move to a new digest of the same tag
    Digest,
    /// Patch release (fixes)
    Patch,
    /// Minor release (features)
    Minor,
    /// Major release (breaking)
    Major,
    /// Refresh of the lock file without manifest changes
    LockFileMaintenance,
}

impl UpdateType {
    /// Returns the configuration spelling of this update type
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Pin => "pin",
            UpdateType::Digest => "digest",
            UpdateType::Patch => "patch",
            UpdateType::Minor => "minor",
            UpdateType::Major => "major",
            UpdateType::LockFileMaintenance => "lockFileMaintenance",
        }
    }

    /// Returns all recognized update types
    pub fn all() -> &'static [UpdateType] {
        &[
            UpdateType::Pin,
            UpdateType::Digest,
            UpdateType::Patch,
            UpdateType::Minor,
            UpdateType::Major,
            UpdateType::LockFileMaintenance,
        ]
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not a recognized update type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown update type '{0}'")]
pub struct UnknownUpdateType(pub String);

impl FromStr for UpdateType {
    type Err = UnknownUpdateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpdateType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownUpdateType(s.to_string()))
    }
}
