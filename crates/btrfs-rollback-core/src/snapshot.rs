use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    #[serde(rename(deserialize = "num"))]
    pub id: String,
    #[serde(rename(deserialize = "type"), default)]
    pub method: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Error)]
pub enum SnapshotMetadataError {
    #[error("could not decode snapshot metadata")]
    Decode(#[from] quick_xml::de::DeError),
    #[error("snapshot metadata has an empty <num> element")]
    EmptyId,
}

impl SnapshotDescriptor {
    pub fn from_info_xml(input: &str) -> Result<Self, SnapshotMetadataError> {
        let mut descriptor: Self = quick_xml::de::from_str(input)?;
        descriptor.id = descriptor.id.trim().to_string();
        if descriptor.id.is_empty() {
            return Err(SnapshotMetadataError::EmptyId);
        }
        Ok(descriptor)
    }

    pub fn numeric_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }

    pub fn description_or_placeholder(&self) -> &str {
        if self.description.trim().is_empty() {
            "N/A"
        } else {
            &self.description
        }
    }
}

pub fn sort_snapshots(snapshots: &mut [SnapshotDescriptor]) {
    snapshots.sort_by(|left, right| match (left.numeric_id(), right.numeric_id()) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
