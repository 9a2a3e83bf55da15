//! depgate - Dependency-update policy evaluator library
//!
//! This library decides, for each dependency update candidate, whether it
//! should be proposed now, wait out its stability window, be held for
//! dashboard approval, or be suppressed:
//! - Ordered package rules with first-match-wins selection
//! - Per-repository evaluation over a shared, immutable rule list
//! - Grouping of actionable candidates into proposals

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod orchestrator;
pub mod output;
pub mod policy;
pub mod progress;
