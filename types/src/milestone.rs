//! Milestone records — the append-only proof log behind avatar evolution.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a milestone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MilestoneError {
    #[error("milestone title must not be empty")]
    EmptyTitle,

    #[error("proof digest must be a 64-character lowercase hex string")]
    InvalidProofDigest,
}

/// One recorded milestone.
///
/// Milestones are append-only: per account, insertion order is chronological
/// order is display order. Duplicate titles are allowed; entries are never
/// reordered or deduplicated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Human-readable title.
    pub title: String,
    /// SHA-256 digest of the milestone's proof (text or file content), hex.
    pub proof_digest: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional category (e.g. "education", "career", "personal").
    #[serde(default)]
    pub category: Option<String>,
    /// When the milestone was durably recorded.
    pub recorded_at: Timestamp,
}

impl Milestone {
    /// Build a milestone, validating the title and digest format up front.
    ///
    /// The digest must already have been computed — a milestone is never
    /// appended with a placeholder proof.
    pub fn new(
        title: impl Into<String>,
        proof_digest: impl Into<String>,
        description: Option<String>,
        category: Option<String>,
        recorded_at: Timestamp,
    ) -> Result<Self, MilestoneError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(MilestoneError::EmptyTitle);
        }
        let proof_digest = proof_digest.into();
        if !is_proof_digest(&proof_digest) {
            return Err(MilestoneError::InvalidProofDigest);
        }
        Ok(Self {
            title,
            proof_digest,
            description,
            category,
            recorded_at,
        })
    }
}

/// Whether a string looks like a SHA-256 hex digest.
pub fn is_proof_digest(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
}

/// Serialize a milestone log for the string-valued key-value store.
pub fn encode_log(milestones: &[Milestone]) -> String {
    serde_json::to_string(milestones).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a milestone log from stored JSON.
///
/// Malformed persisted data is treated as "no data" rather than an error so a
/// corrupt entry can never wedge the caller.
pub fn decode_log(raw: &str) -> Vec<Milestone> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "220c51adeff868a58ac17e66f013f0bce329907e5bed732db941801d3e2e2fd3";

    #[test]
    fn test_new_rejects_empty_title() {
        let err = Milestone::new("  ", DIGEST, None, None, Timestamp::new(1)).unwrap_err();
        assert_eq!(err, MilestoneError::EmptyTitle);
    }

    #[test]
    fn test_new_rejects_bad_digest() {
        let err = Milestone::new("run", "abc123", None, None, Timestamp::new(1)).unwrap_err();
        assert_eq!(err, MilestoneError::InvalidProofDigest);
    }

    #[test]
    fn test_digest_format() {
        assert!(is_proof_digest(DIGEST));
        assert!(!is_proof_digest(&DIGEST[..63]));
        assert!(!is_proof_digest(&DIGEST.to_uppercase()));
        assert!(!is_proof_digest(&format!("{}g", &DIGEST[..63])));
    }

    #[test]
    fn test_decode_log_tolerates_garbage() {
        assert!(decode_log("not json at all").is_empty());
        assert!(decode_log("{\"oops\":1}").is_empty());
        assert!(decode_log("").is_empty());
    }

    #[test]
    fn test_log_preserves_order_and_duplicates() {
        let a = Milestone::new("run", DIGEST, None, None, Timestamp::new(1)).unwrap();
        let b = Milestone::new("run", DIGEST, None, None, Timestamp::new(2)).unwrap();
        let decoded = decode_log(&encode_log(&[a.clone(), b.clone()]));
        assert_eq!(decoded, vec![a, b]);
    }
}
