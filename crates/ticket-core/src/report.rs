use crate::config::ClusterConfig;
use crate::dates::{DateParser, LocaleDateParser};
use crate::error::{AppError, Result};
use crate::grouping::cluster_records;
use crate::matching::NormalizedRecord;
use crate::merge::merge_cluster;
use crate::models::{DedupReport, MergedRecord, Record};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Cluster `records` and synthesize one merged record per cluster.
///
/// Never fails; see [`Deduplicator::run`] for the guarded entry point.
pub fn deduplicate(records: &[Record], config: &ClusterConfig, dates: &dyn DateParser) -> DedupReport {
    let normalized: Vec<NormalizedRecord> = records.iter().map(NormalizedRecord::from_record).collect();
    let clustering = cluster_records(&normalized, config);

    let mut merged: Vec<MergedRecord> = clustering
        .clusters
        .iter()
        .map(|members| {
            let record = merge_cluster(records, members, config, dates);
            if members.len() > 1 {
                debug!(members = members.len(), title = %record.title, "Merged duplicate cluster");
            }
            record
        })
        .collect();
    sort_by_created_at(&mut merged, dates);

    let duplicates_found = clustering.clusters.iter().filter(|c| c.len() > 1).count();
    info!(
        records = records.len(),
        clusters = merged.len(),
        duplicates = duplicates_found,
        comparisons = clustering.comparisons,
        "Deduplication complete"
    );

    DedupReport {
        total_records: records.len(),
        total_clusters: merged.len(),
        duplicates_found,
        comparisons: clustering.comparisons,
        records: merged,
    }
}

/// Order merged records oldest first; unknown dates go last and ties keep
/// their discovery order.
pub fn sort_by_created_at(merged: &mut [MergedRecord], dates: &dyn DateParser) {
    merged.sort_by_cached_key(|record| dates.parse(&record.created_at).unwrap_or(NaiveDate::MAX));
}

/// Configured entry point that enforces the record limit.
pub struct Deduplicator {
    config: ClusterConfig,
    dates: Box<dyn DateParser>,
}

impl Deduplicator {
    pub fn new(config: ClusterConfig) -> Self {
        Self::with_date_parser(config, Box::new(LocaleDateParser))
    }

    pub fn with_date_parser(config: ClusterConfig, dates: Box<dyn DateParser>) -> Self {
        Self { config, dates }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn run(&self, records: &[Record]) -> Result<DedupReport> {
        if records.len() > self.config.max_records {
            warn!(
                count = records.len(),
                limit = self.config.max_records,
                "Refusing full pairwise comparison"
            );
            return Err(AppError::TooManyRecords {
                count: records.len(),
                limit: self.config.max_records,
            });
        }
        Ok(deduplicate(records, &self.config, self.dates.as_ref()))
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}
