//! Inference of an update type from a version change
//!
//! Used when the candidate feed omits the update type.

use super::UpdateType;
use regex::Regex;
use semver::{Version, VersionReq};
use std::sync::LazyLock;

static DIGEST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:sha256:)?[a-f0-9]{7,64}$").unwrap());

/// Parse a version leniently: strips a leading 'v' and pads missing parts
fn parse_version(value: &str) -> Option<Version> {
    let v = value.trim();
    let v = v.strip_prefix('v').unwrap_or(v);
    if let Ok(version) = Version::parse(v) {
        return Some(version);
    }

    let parts: Vec<&str> = v.split('.').collect();
    match parts.len() {
        1 => Version::parse(&format!("{}.0.0", parts[0])).ok(),
        2 => Version::parse(&format!("{}.{}.0", parts[0], parts[1])).ok(),
        _ => None,
    }
}

/// Returns true if the value looks like a content digest or commit hash
pub fn is_digest(value: &str) -> bool {
    DIGEST_PATTERN.is_match(value.trim())
}

/// Infer the update type of a change from `current` to `target`
///
/// Returns `None` when the change cannot be classified, including downgrades.
pub fn classify(current: &str, target: &str) -> Option<UpdateType> {
    if is_digest(current) && is_digest(target) {
        return Some(UpdateType::Digest);
    }

    let new = parse_version(target)?;

    let Some(old) = parse_version(current) else {
        // A range that resolves to the target is a pin
        let req = VersionReq::parse(current.trim()).ok()?;
        return req.matches(&new).then_some(UpdateType::Pin);
    };

    if new <= old {
        return None;
    }

    if new.major != old.major {
        Some(UpdateType::Major)
    } else if new.minor != old.minor {
        Some(UpdateType::Minor)
    } else {
        Some(UpdateType::Patch)
    }
}
