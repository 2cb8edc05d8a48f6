use crate::config::ClusterConfig;
use crate::models::Record;
use crate::normalize::normalize_field;
use crate::similarity::{is_contained, similarity};

/// Comparison form of a record, computed once before the pair loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub title: String,
    pub description: String,
}

impl NormalizedRecord {
    pub fn from_record(record: &Record) -> Self {
        Self {
            title: normalize_field(record.title.as_deref()),
            description: normalize_field(record.description.as_deref()),
        }
    }
}

/// Why a pair was judged to describe the same issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// Title similarity reached `title_high`.
    TitleHigh,
    /// One long title contains (or mostly prefixes) the other.
    Containment,
    /// Medium title similarity backed by similar descriptions.
    DescriptionCorroborated,
    /// Medium-high title similarity with a description missing.
    TitleWithoutDescription,
}

/// Decide whether two records are duplicates. Rules are checked in order and
/// the first that fires wins.
pub fn decide(
    left: &NormalizedRecord,
    right: &NormalizedRecord,
    config: &ClusterConfig,
) -> Option<MatchReason> {
    if left.title.is_empty() || right.title.is_empty() {
        return None;
    }

    let thresholds = &config.thresholds;
    let title_sim = similarity(&left.title, &right.title);
    let contained = is_contained(&left.title, &right.title, &config.containment);

    if title_sim >= thresholds.title_high {
        return Some(MatchReason::TitleHigh);
    }
    if contained {
        return Some(MatchReason::Containment);
    }
    if title_sim < thresholds.title_low {
        return None;
    }

    if !left.description.is_empty() && !right.description.is_empty() {
        let desc_sim = similarity(&left.description, &right.description);
        (desc_sim >= thresholds.desc_low).then_some(MatchReason::DescriptionCorroborated)
    } else {
        (title_sim >= thresholds.title_very_low).then_some(MatchReason::TitleWithoutDescription)
    }
}

pub fn is_match(left: &NormalizedRecord, right: &NormalizedRecord, config: &ClusterConfig) -> bool {
    decide(left, right, config).is_some()
}
