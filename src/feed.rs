//! Update candidate feed loading
//!
//! The feed is a JSON file holding either a bare array of candidates or an
//! object with a `candidates` array.

use crate::domain::UpdateCandidate;
use crate::error::{CandidateError, FeedError};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    List(Vec<Value>),
    Wrapped { candidates: Vec<Value> },
}

/// Candidates read from a feed, plus the entries that could not be read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFeed {
    pub candidates: Vec<UpdateCandidate>,
    pub rejected: Vec<CandidateError>,
}

impl From<Vec<UpdateCandidate>> for CandidateFeed {
    fn from(candidates: Vec<UpdateCandidate>) -> Self {
        Self {
            candidates,
            rejected: Vec::new(),
        }
    }
}

fn string_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse feed content
///
/// Only the document shape is fatal. Each entry is decoded on its own, and
/// entries that are not valid candidates end up in [`CandidateFeed::rejected`].
pub fn parse_feed(content: &str) -> Result<CandidateFeed, serde_json::Error> {
    let records = match serde_json::from_str::<FeedDocument>(content)? {
        FeedDocument::List(records) => records,
        FeedDocument::Wrapped { candidates } => candidates,
    };

    let mut feed = CandidateFeed::default();
    for (index, record) in records.into_iter().enumerate() {
        match UpdateCandidate::deserialize(&record) {
            Ok(candidate) => feed.candidates.push(candidate),
            Err(e) => {
                let err = CandidateError::MalformedRecord {
                    index,
                    package: string_field(&record, "package"),
                    repository: string_field(&record, "repository"),
                    message: e.to_string(),
                };
                warn!(%err, "feed record rejected");
                feed.rejected.push(err);
            }
        }
    }
    Ok(feed)
}

/// Load candidates from a feed file
pub fn load_feed(path: &Path) -> Result<CandidateFeed, FeedError> {
    let content = fs::read_to_string(path).map_err(|e| FeedError::read_error(path, e))?;
    let feed = parse_feed(&content).map_err(|e| FeedError::parse_error(path, e.to_string()))?;
    debug!(
        path = %path.display(),
        candidates = feed.candidates.len(),
        rejected = feed.rejected.len(),
        "candidate feed loaded"
    );
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const CANDIDATE: &str = r#"{
        "package": "lodash",
        "currentValue": "4.17.20",
        "newValue": "4.17.21",
        "updateType": "patch",
        "repository": "acme/web",
        "discoveredAt": "2024-06-01T12:00:00Z"
    }"#;

    #[test]
    fn test_parse_bare_array() {
        let feed = parse_feed(&format!("[{}]", CANDIDATE)).unwrap();
        assert_eq!(feed.candidates.len(), 1);
        assert_eq!(feed.candidates[0].package, "lodash");
        assert!(feed.rejected.is_empty());
    }

    #[test]
    fn test_parse_wrapped() {
        let feed = parse_feed(&format!(r#"{{"candidates": [{0}, {0}]}}"#, CANDIDATE)).unwrap();
        assert_eq!(feed.candidates.len(), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_feed("[]").unwrap(), CandidateFeed::default());
    }

    #[test]
    fn test_unknown_update_type_still_parses() {
        let content = format!("[{}]", CANDIDATE.replace("\"patch\"", "\"security-patch\""));
        let feed = parse_feed(&content).unwrap();
        assert_eq!(feed.candidates[0].update_type.as_deref(), Some("security-patch"));
    }

    #[test]
    fn test_malformed_records_rejected_individually() {
        let bad_type = CANDIDATE.replace("\"patch\"", "5");
        let bad_time = CANDIDATE
            .replace("lodash", "react")
            .replace("2024-06-01T12:00:00Z", "last tuesday");
        let content = format!("[{}, {}, {}, 42]", bad_type, CANDIDATE, bad_time);
        let feed = parse_feed(&content).unwrap();

        assert_eq!(feed.candidates.len(), 1);
        assert_eq!(feed.rejected.len(), 3);
        assert!(matches!(
            &feed.rejected[0],
            CandidateError::MalformedRecord { index: 0, package, repository, .. }
                if package == "lodash" && repository == "acme/web"
        ));
        assert_eq!(feed.rejected[1].package(), "react");
        assert!(matches!(
            &feed.rejected[2],
            CandidateError::MalformedRecord { index: 3, package, .. } if package.is_empty()
        ));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_feed("{\"nope\": 1}").is_err());
        assert!(parse_feed("not json").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_feed(&PathBuf::from("/nonexistent/feed.json")).unwrap_err();
        assert!(matches!(err, FeedError::ReadError { .. }));
    }
}
