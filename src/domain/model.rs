use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::error::InventoryError;

/// Ecosystem tag carried by every extracted record.
pub const RECORD_TYPE: &str = "maven";

/// Ecosystem tag expected by the inventory API.
pub const PAYLOAD_TYPE: &str = "mvn";

/// One dependency declared in the manifest with a concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl DependencyRecord {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            kind: RECORD_TYPE.to_string(),
            version: version.into(),
        }
    }
}

/// A dependency dropped because its version was absent or a `${...}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDependency {
    pub artifact_id: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    pub path: PathBuf,
    pub url: String,
    pub freshly_cloned: bool,
}

/// What the extractor managed to read before finishing or giving up.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub records: Vec<DependencyRecord>,
    pub skipped: Vec<SkippedDependency>,
    pub error: Option<InventoryError>,
}

impl ParseReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub enum ManifestOutcome {
    Missing { path: PathBuf },
    Parsed(ParseReport),
}

#[derive(Debug)]
pub struct Extraction {
    pub location: RepositoryLocation,
    pub manifest: ManifestOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl From<&DependencyRecord> for PackageEntry {
    fn from(record: &DependencyRecord) -> Self {
        Self {
            name: record.artifact_id.clone(),
            kind: PAYLOAD_TYPE.to_string(),
            version: record.version.clone(),
        }
    }
}

/// Request body for the inventory API; serialises as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryPayload(pub Vec<PackageEntry>);

impl InventoryPayload {
    pub fn from_records(records: &[DependencyRecord]) -> Self {
        Self(records.iter().map(PackageEntry::from).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Accepted(serde_json::Value),
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    NotAttempted,
    Accepted(serde_json::Value),
    Rejected { status: u16, body: String },
    Failed(String),
}

impl From<ReportOutcome> for Delivery {
    fn from(outcome: ReportOutcome) -> Self {
        match outcome {
            ReportOutcome::Accepted(body) => Delivery::Accepted(body),
            ReportOutcome::Rejected { status, body } => Delivery::Rejected { status, body },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    Missing,
    Parsed,
    Partial { error: String },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub location: RepositoryLocation,
    pub manifest: ManifestStatus,
    pub submitted: usize,
    pub skipped: usize,
    pub delivery: Delivery,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serialises_as_bare_array() {
        let records = vec![DependencyRecord::new("org.foo", "foo", "1.0")];
        let payload = InventoryPayload::from_records(&records);

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"[{"name":"foo","type":"mvn","version":"1.0"}]"#);
    }

    #[test]
    fn test_payload_keeps_order_and_duplicates() {
        let records = vec![
            DependencyRecord::new("g", "b", "2"),
            DependencyRecord::new("g", "a", "1"),
            DependencyRecord::new("g", "b", "2"),
        ];
        let payload = InventoryPayload::from_records(&records);

        let names: Vec<&str> = payload.0.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_record_type_is_maven() {
        let record = DependencyRecord::new("org.springframework", "spring-core", "3.2.1");
        assert_eq!(record.kind, "maven");
    }

    #[test]
    fn test_delivery_from_outcome() {
        let delivery: Delivery = ReportOutcome::Rejected {
            status: 401,
            body: "unauthorized".to_string(),
        }
        .into();
        assert_eq!(
            delivery,
            Delivery::Rejected {
                status: 401,
                body: "unauthorized".to_string()
            }
        );
    }
}
