use crate::error::{AppError, Result};
use crate::models::PriorityField;
use serde::{Deserialize, Serialize};

/// Similarity cut-offs applied by the pairwise match decider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Title similarity that is decisive on its own.
    pub title_high: f64,
    /// Title similarity that needs corroboration.
    pub title_low: f64,
    /// Description similarity required to corroborate a `title_low` match.
    pub desc_low: f64,
    /// Title similarity accepted when either description is missing.
    pub title_very_low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_high: 0.9,
            title_low: 0.70,
            desc_low: 0.5,
            title_very_low: 0.80,
        }
    }
}

/// Long-title containment heuristic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContainmentPolicy {
    pub enabled: bool,
    /// Both titles must be strictly longer than this (in characters).
    pub min_title_chars: usize,
    /// Share of the shorter title that must prefix the longer one.
    pub prefix_ratio: f64,
}

impl Default for ContainmentPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_title_chars: 20,
            prefix_ratio: 0.8,
        }
    }
}

/// Marker strings the export uses for "no value".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sentinels {
    pub owner_tag: String,
    pub dev_priority: String,
    pub stakeholder_priority: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            owner_tag: "Нет: застройщик".into(),
            dev_priority: "Нет: приоритет застройщика".into(),
            stakeholder_priority: "Нет: приоритет от стейкхолдера".into(),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    pub thresholds: Thresholds,
    pub containment: ContainmentPolicy,
    pub sentinels: Sentinels,
    /// Recognized priority levels, highest first.
    pub priority_levels: Vec<String>,
    /// Upper bound on records accepted by [`crate::Deduplicator::run`].
    pub max_records: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            containment: ContainmentPolicy::default(),
            sentinels: Sentinels::default(),
            priority_levels: vec!["A".into(), "B".into(), "C".into()],
            max_records: 20_000,
        }
    }
}

impl ClusterConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| AppError::ConfigError(e.to_string()))
    }

    /// Reject configurations that are well-defined but almost certainly a mistake.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, value) in [
            ("title_high", t.title_high),
            ("title_low", t.title_low),
            ("desc_low", t.desc_low),
            ("title_very_low", t.title_very_low),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::ConfigError(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if t.title_low > t.title_high {
            return Err(AppError::ConfigError(format!(
                "title_low ({}) exceeds title_high ({})",
                t.title_low, t.title_high
            )));
        }
        if t.title_very_low < t.title_low || t.title_very_low > t.title_high {
            return Err(AppError::ConfigError(format!(
                "title_very_low ({}) must lie between title_low ({}) and title_high ({})",
                t.title_very_low, t.title_low, t.title_high
            )));
        }
        let ratio = self.containment.prefix_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(AppError::ConfigError(format!(
                "containment.prefix_ratio must be within (0, 1], got {ratio}"
            )));
        }
        if self.priority_levels.is_empty() {
            return Err(AppError::ConfigError("priority_levels is empty".into()));
        }
        Ok(())
    }

    /// Rank of a priority value; 0 for anything unrecognized.
    pub fn priority_rank(&self, value: &str) -> usize {
        self.priority_levels
            .iter()
            .position(|level| level == value)
            .map_or(0, |idx| self.priority_levels.len() - idx)
    }

    pub fn priority_sentinel(&self, field: PriorityField) -> &str {
        match field {
            PriorityField::Developer => &self.sentinels.dev_priority,
            PriorityField::Stakeholder => &self.sentinels.stakeholder_priority,
        }
    }
}
