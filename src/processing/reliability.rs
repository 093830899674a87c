//! The 30% rule: is the mean a trustworthy summary of a column?
//!
//! When the standard deviation is under 30% of the absolute mean the mean is
//! reliable; otherwise the median is recommended.

use serde::Serialize;

use crate::data::dataset::Dataset;
use crate::processing::column_results::ColumnResults;
use crate::processing::statistics::{round_to, ColumnStats};

/// Relative dispersion (percent) at or above which the mean is unreliable.
pub const RELIABILITY_THRESHOLD_PERCENT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CentralTendency {
    Mean,
    Median,
}

impl CentralTendency {
    pub fn label(&self) -> &'static str {
        match self {
            CentralTendency::Mean => "Mean",
            CentralTendency::Median => "Median",
        }
    }
}

/// Mean/median reliability judgment. `mean`, `std`, `median` are rounded to
/// 4 decimals and `std_percent` to 2; `mean_reliable` is decided on the
/// rounded `std_percent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityVerdict {
    pub mean: f64,
    pub std: f64,
    /// `+inf` when the mean is exactly zero.
    pub std_percent: f64,
    pub mean_reliable: bool,
    pub recommended: CentralTendency,
    pub median: f64,
}

impl ReliabilityVerdict {
    pub fn from_stats(stats: &ColumnStats) -> Self {
        let std_percent = if stats.mean == 0.0 {
            f64::INFINITY
        } else {
            round_to(stats.std / stats.mean.abs() * 100.0, 2)
        };
        // NaN (single value) and +inf both compare false.
        let mean_reliable = std_percent < RELIABILITY_THRESHOLD_PERCENT;

        Self {
            mean: round_to(stats.mean, 4),
            std: round_to(stats.std, 4),
            std_percent,
            mean_reliable,
            recommended: if mean_reliable {
                CentralTendency::Mean
            } else {
                CentralTendency::Median
            },
            median: round_to(stats.median, 4),
        }
    }
}

/// Reliability verdicts for every numeric column with at least one value.
pub fn classify_reliability(dataset: &Dataset) -> ColumnResults<ReliabilityVerdict> {
    let mut results = ColumnResults::new();
    for column in dataset.numeric_columns() {
        let values = column.numeric_values().unwrap_or_default();
        if let Some(stats) = ColumnStats::compute(&values) {
            results.insert(column.name.clone(), ReliabilityVerdict::from_stats(&stats));
        }
    }
    tracing::debug!("Reliability rule covered {} columns", results.len());
    results
}
