//! Core domain models for depgate
//!
//! This module contains the fundamental types used throughout the application:
//! - Update types and their inference from version changes
//! - Update candidates delivered by the external feed
//! - Package rules loaded from configuration
//! - Decisions, proposal groups and summaries

mod candidate;
mod decision;
mod package_rule;
mod proposal;
mod summary;
mod update_type;
pub mod version_change;

pub use candidate::UpdateCandidate;
pub use decision::{Decision, Disposition, RuleRef};
pub use package_rule::PackageRule;
pub use proposal::{ProposalGroup, LOCK_FILE_MAINTENANCE_GROUP};
pub use summary::{EvaluationSummary, RepositoryEvaluation};
pub use update_type::{UnknownUpdateType, UpdateType};
