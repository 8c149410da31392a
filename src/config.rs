//! Trend settings, stored as a JSON file on disk.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::trend::{CheckpointPlan, RatingScale};

/// Settings for computing and storing the star trend.
///
/// Every field is optional in the file:
/// ```json
/// {
///   "timespan_months": 6,
///   "interval_weeks": 2,
///   "levels": [0, 1, 2, 3, 4],
///   "stats_dir": "stats"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub timespan_months: i64,
    pub interval_weeks: i64,
    pub levels: Vec<u8>,
    pub stats_dir: PathBuf,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            timespan_months: 6,
            interval_weeks: 2,
            levels: RatingScale::default().levels().to_vec(),
            stats_dir: PathBuf::from("stats"),
        }
    }
}

impl TrendConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn plan(&self) -> CheckpointPlan {
        CheckpointPlan::months_by_weeks(self.timespan_months, self.interval_weeks)
    }

    pub fn scale(&self) -> Result<RatingScale> {
        Ok(RatingScale::new(self.levels.iter().copied())?)
    }
}
