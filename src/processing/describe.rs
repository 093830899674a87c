use serde::Serialize;

use crate::data::dataset::{ColumnKind, Dataset};
use crate::processing::column_results::ColumnResults;
use crate::processing::reliability::{CentralTendency, ReliabilityVerdict};
use crate::processing::statistics::ColumnStats;

/// Extended `describe()` row for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDescription {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
    pub missing: usize,
    pub std_percent: Option<f64>,
    pub recommended: Option<CentralTendency>,
}

/// Describe every numeric column; all-missing columns get a zero count and NaN statistics.
pub fn describe_numeric(
    dataset: &Dataset,
    reliability: &ColumnResults<ReliabilityVerdict>,
) -> Vec<NumericDescription> {
    dataset
        .numeric_columns()
        .map(|column| {
            let values = column.numeric_values().unwrap_or_default();
            let stats = ColumnStats::compute(&values);
            let verdict = reliability.get(&column.name);
            let stat = |f: fn(&ColumnStats) -> f64| stats.as_ref().map_or(f64::NAN, f);
            NumericDescription {
                column: column.name.clone(),
                count: stats.as_ref().map_or(0, |s| s.count),
                mean: stat(|s| s.mean),
                std: stat(|s| s.std),
                min: stat(|s| s.min),
                q1: stat(|s| s.q1),
                median: stat(|s| s.median),
                q3: stat(|s| s.q3),
                max: stat(|s| s.max),
                iqr: stat(|s| s.iqr),
                missing: column.missing_count(),
                std_percent: verdict.map(|v| v.std_percent),
                recommended: verdict.map(|v| v.recommended),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub distinct: usize,
    pub missing: usize,
    /// First cell, if present.
    pub example: Option<String>,
}

/// Shape of the dataset and a one-line profile per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub numeric: usize,
    pub categorical: usize,
    pub temporal: usize,
    pub column_profiles: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let count_kind = |pred: fn(ColumnKind) -> bool| dataset.columns().iter().filter(|c| pred(c.kind())).count();
        Self {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
            numeric: count_kind(|k| matches!(k, ColumnKind::Numeric(_))),
            categorical: count_kind(|k| k == ColumnKind::Categorical),
            temporal: count_kind(|k| k == ColumnKind::Temporal),
            column_profiles: dataset
                .columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    kind: c.kind(),
                    distinct: c.distinct_count(),
                    missing: c.missing_count(),
                    example: c.display_value(0),
                })
                .collect(),
        }
    }
}
