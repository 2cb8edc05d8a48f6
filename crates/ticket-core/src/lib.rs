pub mod config;
pub mod dates;
pub mod error;
pub mod grouping;
pub mod matching;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod report;
pub mod similarity;

pub use config::ClusterConfig;
pub use dates::{DateParser, LocaleDateParser};
pub use error::{AppError, Result};
pub use models::{DedupReport, MergedRecord, Record};
pub use report::{deduplicate, Deduplicator};
