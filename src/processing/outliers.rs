//! IQR fence outlier detection.

use serde::Serialize;

use crate::data::dataset::Dataset;
use crate::processing::column_results::ColumnResults;
use crate::processing::statistics::{round_to, ColumnStats};

/// Fence distance in multiples of the IQR.
pub const FENCE_FACTOR: f64 = 1.5;

/// Outlier counts for one column. Bounds and percentage are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub count: usize,
    pub percentage: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// How heavily outliers weigh on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutlierBurden {
    /// Under 10%: keep them and prefer robust statistics.
    Low,
    /// 10% to 15%: evaluate case by case.
    Moderate,
    /// Over 15%: rank-based correlation, consider transformations.
    High,
}

impl OutlierBurden {
    pub fn label(&self) -> &'static str {
        match self {
            OutlierBurden::Low => "low",
            OutlierBurden::Moderate => "moderate",
            OutlierBurden::High => "high",
        }
    }
}

impl OutlierReport {
    /// Apply the 1.5 x IQR fence rule. Values strictly outside
    /// `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]` are outliers; with zero IQR the fences
    /// collapse onto the quartiles.
    pub fn from_values(values: &[f64]) -> Self {
        let Some(stats) = ColumnStats::compute(values) else {
            return Self {
                count: 0,
                percentage: 0.0,
                lower_bound: f64::NAN,
                upper_bound: f64::NAN,
            };
        };

        let (lower, upper) = fences(&stats);
        let count = values
            .iter()
            .filter(|v| !v.is_nan() && (**v < lower || **v > upper))
            .count();

        Self {
            count,
            percentage: round_to(count as f64 / stats.count as f64 * 100.0, 2),
            lower_bound: round_to(lower, 2),
            upper_bound: round_to(upper, 2),
        }
    }

    pub fn burden(&self) -> OutlierBurden {
        if self.percentage > 15.0 {
            OutlierBurden::High
        } else if self.percentage >= 10.0 {
            OutlierBurden::Moderate
        } else {
            OutlierBurden::Low
        }
    }
}

/// Unrounded `(Q1 - 1.5 IQR, Q3 + 1.5 IQR)`. Classification uses these; the
/// bounds stored in `OutlierReport` are rounded for display only.
pub fn fences(stats: &ColumnStats) -> (f64, f64) {
    (
        stats.q1 - FENCE_FACTOR * stats.iqr,
        stats.q3 + FENCE_FACTOR * stats.iqr,
    )
}

/// Outlier reports for every numeric column with at least one value.
pub fn detect_outliers(dataset: &Dataset) -> ColumnResults<OutlierReport> {
    let mut results = ColumnResults::new();
    for column in dataset.numeric_columns() {
        let values = column.numeric_values().unwrap_or_default();
        if values.is_empty() {
            continue;
        }
        results.insert(column.name.clone(), OutlierReport::from_values(&values));
    }
    tracing::debug!("Outlier detection covered {} columns", results.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Column;

    #[test]
    fn single_extreme_value_is_flagged() {
        let report = OutlierReport::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        assert_eq!(report.count, 1);
        assert_eq!(report.percentage, 16.67);
        assert_eq!(report.lower_bound, -1.5);
        assert_eq!(report.upper_bound, 8.5);
        assert_eq!(report.burden(), OutlierBurden::High);
    }

    #[test]
    fn values_on_the_fence_are_not_outliers() {
        // Q1 = 2, Q3 = 4, fences [-1, 7]
        let report = OutlierReport::from_values(&[-1.0, 2.0, 2.0, 3.0, 4.0, 4.0, 7.0]);
        assert_eq!(report.count, 0);
        assert_eq!(report.burden(), OutlierBurden::Low);
    }

    #[test]
    fn zero_iqr_flags_any_departure() {
        let mut values = vec![5.0; 9];
        values.push(5.1);
        let report = OutlierReport::from_values(&values);
        assert_eq!(report.lower_bound, 5.0);
        assert_eq!(report.upper_bound, 5.0);
        assert_eq!(report.count, 1);
        assert_eq!(report.percentage, 10.0);
        assert_eq!(report.burden(), OutlierBurden::Moderate);
    }

    #[test]
    fn reported_bounds_are_display_rounded() {
        let values = [1.006, 1.006, 1.0064, 1.0064];
        let stats = ColumnStats::compute(&values).unwrap();
        let (lower, upper) = fences(&stats);
        assert!(lower <= stats.q1 && stats.q3 <= upper);

        let report = OutlierReport::from_values(&values);
        assert_eq!((report.lower_bound, report.upper_bound), (1.01, 1.01));
        assert_eq!(report.count, 0);
    }

    #[test]
    fn empty_column_yields_zero_count() {
        let report = OutlierReport::from_values(&[]);
        assert_eq!(report.count, 0);
        assert_eq!(report.percentage, 0.0);
    }

    #[test]
    fn dataset_scan_skips_non_numeric_and_empty_columns() {
        let ds = Dataset::new(vec![
            Column::float("a", vec![1.0, 2.0]),
            Column::float("b", vec![f64::NAN, f64::NAN]),
            Column::categorical("c", vec![Some("x"), Some("y")]),
        ])
        .unwrap();
        let results = detect_outliers(&ds);
        assert_eq!(results.names().collect::<Vec<_>>(), vec!["a"]);
    }
}
