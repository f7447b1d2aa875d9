use serde::{Deserialize, Serialize};

use crate::entity::{EdgeRecord, NodeRecord};

/// On-disk/response snapshot format for `GET /:org/metadata/export` and
/// `POST /:org/metadata/import`, per SPEC_FULL.md §6.4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub org_id: String,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Snapshot format version this build produces and accepts. Per SPEC_FULL.md
/// §4.7, import of an unknown version is rejected rather than best-effort parsed.
pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug)]
pub enum SnapshotError {
    UnsupportedVersion(String),
    OrgMismatch { expected: String, found: String },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::UnsupportedVersion(v) => write!(f, "unsupported snapshot version: {v}"),
            SnapshotError::OrgMismatch { expected, found } => {
                write!(f, "snapshot org_id '{found}' does not match target org '{expected}'")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl Snapshot {
    pub fn new(org_id: String, nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>, taken_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            timestamp: taken_at,
            version: SNAPSHOT_VERSION.to_string(),
            org_id,
            nodes,
            edges,
        }
    }

    /// Validates a snapshot is importable into `target_org`: known version,
    /// and (if the snapshot carries an org_id) it must match the target.
    pub fn validate_for_import(&self, target_org: &str) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version.clone()));
        }
        if !self.org_id.is_empty() && self.org_id != target_org {
            return Err(SnapshotError::OrgMismatch {
                expected: target_org.to_string(),
                found: self.org_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> Snapshot {
        Snapshot::new("acme".to_string(), vec![], vec![], Utc::now())
    }

    #[test]
    fn validate_accepts_matching_org_and_version() {
        let snap = sample();
        assert!(snap.validate_for_import("acme").is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_org() {
        let snap = sample();
        let err = snap.validate_for_import("other").unwrap_err();
        assert!(matches!(err, SnapshotError::OrgMismatch { .. }));
    }

    #[test]
    fn validate_rejects_unknown_version() {
        let mut snap = sample();
        snap.version = "2.0".to_string();
        let err = snap.validate_for_import("acme").unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion(_)));
    }
}
