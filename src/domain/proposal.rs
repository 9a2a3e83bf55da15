//! Grouped proposals

use serde::{Deserialize, Serialize};

/// Name of the per-repository lock file maintenance batch
pub const LOCK_FILE_MAINTENANCE_GROUP: &str = "lock-file-maintenance";

/// A set of propose-now candidates that land in one proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalGroup {
    /// Repository the proposal is opened against
    pub repository: String,
    /// Group name, unique within the repository
    pub name: String,
    /// Packages in the group, in decision order
    pub packages: Vec<String>,
}

impl ProposalGroup {
    /// Creates an empty group
    pub fn new(repository: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            packages: Vec::new(),
        }
    }
}
