use serde::{Deserialize, Serialize};

/// A single support ticket as handed over by the ingestion layer.
///
/// Every field is optional: exports routinely leave columns blank, and the
/// engine treats a missing field the same as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stakeholder_priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Which of the two priority columns a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityField {
    Developer,
    Stakeholder,
}

impl PriorityField {
    pub fn value(self, record: &Record) -> Option<&str> {
        match self {
            Self::Developer => record.dev_priority.as_deref(),
            Self::Stakeholder => record.stakeholder_priority.as_deref(),
        }
    }
}

/// The canonical record synthesized from one cluster of duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedRecord {
    pub title: String,
    pub owner_tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stakeholder_priority: Option<String>,
    /// Original text of the earliest parseable creation date, or `""`.
    pub created_at: String,
    pub member_ids: Vec<String>,
    pub member_count: usize,
}

/// Result of one clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupReport {
    pub records: Vec<MergedRecord>,
    pub total_records: usize,
    pub total_clusters: usize,
    pub duplicates_found: usize,
    pub comparisons: usize,
}
