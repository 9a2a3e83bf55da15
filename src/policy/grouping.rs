//! Aggregation of propose-now decisions into proposal groups

use crate::domain::{
    version_change, Decision, ProposalGroup, UpdateType, LOCK_FILE_MAINTENANCE_GROUP,
};

/// Group name for a decision within its repository
fn group_name(decision: &Decision) -> String {
    let candidate = &decision.candidate;
    match decision.update_type {
        UpdateType::LockFileMaintenance => LOCK_FILE_MAINTENANCE_GROUP.to_string(),
        UpdateType::Major => match major_of(&candidate.new_value) {
            Some(major) => format!("{}-{}.x", candidate.package, major),
            None => format!("{}-major", candidate.package),
        },
        _ => candidate.package.clone(),
    }
}

fn major_of(value: &str) -> Option<u64> {
    if version_change::is_digest(value) {
        return None;
    }
    let v = value.trim();
    let v = v.strip_prefix('v').unwrap_or(v);
    v.split(['.', '-']).next()?.parse().ok()
}

/// Group the actionable decisions, keeping first-appearance order
///
/// Lock file maintenance is batched per repository. Major updates get a
/// group of their own so they never share a proposal with a minor or patch
/// update of the same package.
pub fn group_proposals(decisions: &[Decision]) -> Vec<ProposalGroup> {
    let mut groups: Vec<ProposalGroup> = Vec::new();

    for decision in decisions.iter().filter(|d| d.is_actionable()) {
        let repository = &decision.candidate.repository;
        let name = group_name(decision);
        let package = decision.candidate.package.clone();

        match groups
            .iter_mut()
            .find(|g| &g.repository == repository && g.name == name)
        {
            Some(group) => {
                if !group.packages.contains(&package) {
                    group.packages.push(package);
                }
            }
            None => {
                let mut group = ProposalGroup::new(repository, name);
                group.packages.push(package);
                groups.push(group);
            }
        }
    }

    groups
}
