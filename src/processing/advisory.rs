//! Flat list of advisory messages over the whole dataset.
//!
//! Message groups come out in a fixed order: dataset size, per-column
//! cardinality/variance checks, the 30% rule, normality, outliers. Each group
//! walks columns in dataset order.

use serde::Serialize;

use crate::data::dataset::Dataset;
use crate::processing::column_results::ColumnResults;
use crate::processing::normality::{KurtosisClass, NormalityVerdict, SkewClass};
use crate::processing::outliers::OutlierReport;
use crate::processing::reliability::ReliabilityVerdict;
use crate::processing::statistics::ColumnStats;

/// Datasets with fewer rows get a representativeness warning.
pub const MIN_REPRESENTATIVE_ROWS: usize = 50;
/// Distinct-to-row ratio above which a column counts as high cardinality.
pub const HIGH_CARDINALITY_RATIO: f64 = 0.9;
/// Float columns with a smaller standard deviation are near-constant.
pub const NEAR_CONSTANT_STD: f64 = 1e-3;
/// Outlier percentage above which outliers may distort means and regressions.
pub const OUTLIER_IMPACT_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvisoryKind {
    FewDataPoints,
    SingleValue,
    HighCardinality,
    NearConstant,
    UseMedian,
    ConsiderTransformation,
    NonParametricTest,
    OutlierImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryMessage {
    pub kind: AdvisoryKind,
    /// `None` for dataset-level messages.
    pub column: Option<String>,
    pub text: String,
}

impl AdvisoryMessage {
    fn column(kind: AdvisoryKind, column: &str, text: String) -> Self {
        Self { kind, column: Some(column.to_string()), text }
    }
}

/// Evaluate every advisory rule. The cardinality/variance checks are
/// exclusive per column; all other rules are independent.
pub fn advise(
    dataset: &Dataset,
    reliability: &ColumnResults<ReliabilityVerdict>,
    normality: &ColumnResults<NormalityVerdict>,
    outliers: &ColumnResults<OutlierReport>,
) -> Vec<AdvisoryMessage> {
    let mut messages = Vec::new();
    let rows = dataset.row_count();

    if rows < MIN_REPRESENTATIVE_ROWS {
        messages.push(AdvisoryMessage {
            kind: AdvisoryKind::FewDataPoints,
            column: None,
            text: format!("Few data points ({rows} rows): results may not be representative."),
        });
    }

    for column in dataset.columns() {
        let name = column.name.as_str();
        let distinct = column.distinct_count();
        if distinct == 1 {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::SingleValue,
                name,
                format!("Column `{name}` has a single unique value: it is uninformative."),
            ));
        } else if rows > 0 && distinct as f64 / rows as f64 > HIGH_CARDINALITY_RATIO {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::HighCardinality,
                name,
                format!("Column `{name}` has very high cardinality ({distinct} unique values)."),
            ));
        } else if column.is_float() && float_std(column.numeric_values()) < NEAR_CONSTANT_STD {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::NearConstant,
                name,
                format!("Column `{name}` has very low variance: it is nearly constant."),
            ));
        }
    }

    for (name, verdict) in reliability.iter() {
        if !verdict.mean_reliable {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::UseMedian,
                name,
                format!(
                    "30% rule: for `{name}` use the median ({}) instead of the mean (std = {}%).",
                    verdict.median, verdict.std_percent
                ),
            ));
        }
    }

    for (name, verdict) in normality.iter() {
        if verdict.skew_class == SkewClass::HighlySkewed {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::ConsiderTransformation,
                name,
                format!(
                    "`{name}` is highly skewed (skewness = {}): consider a transformation (log, sqrt).",
                    verdict.skewness
                ),
            ));
        }
        if verdict.kurt_class == KurtosisClass::NonNormal {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::NonParametricTest,
                name,
                format!(
                    "`{name}` does not follow a normal distribution (kurtosis = {}): use non-parametric tests.",
                    verdict.kurtosis
                ),
            ));
        }
    }

    for (name, report) in outliers.iter() {
        if report.percentage > OUTLIER_IMPACT_PERCENT {
            messages.push(AdvisoryMessage::column(
                AdvisoryKind::OutlierImpact,
                name,
                format!(
                    "`{name}` has {}% outliers: they may distort the mean or regressions.",
                    report.percentage
                ),
            ));
        }
    }

    tracing::debug!("Advisory aggregation produced {} messages", messages.len());
    messages
}

/// Sample std of the present values; NaN when undefined.
fn float_std(values: Option<Vec<f64>>) -> f64 {
    values
        .and_then(|v| ColumnStats::compute(&v))
        .map(|s| s.std)
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Column;
    use crate::processing::normality::classify_normality;
    use crate::processing::outliers::detect_outliers;
    use crate::processing::reliability::classify_reliability;

    fn run(ds: &Dataset) -> Vec<AdvisoryMessage> {
        advise(ds, &classify_reliability(ds), &classify_normality(ds), &detect_outliers(ds))
    }

    fn kinds(messages: &[AdvisoryMessage]) -> Vec<(AdvisoryKind, Option<&str>)> {
        messages.iter().map(|m| (m.kind, m.column.as_deref())).collect()
    }

    #[test]
    fn empty_dataset_only_warns_about_size() {
        let messages = run(&Dataset::default());
        assert_eq!(kinds(&messages), vec![(AdvisoryKind::FewDataPoints, None)]);
    }

    #[test]
    fn size_warning_threshold() {
        let small = Dataset::new(vec![Column::float("x", vec![1.0; 30])]).unwrap();
        assert!(run(&small).iter().any(|m| m.kind == AdvisoryKind::FewDataPoints));

        let large = Dataset::new(vec![Column::float("x", vec![1.0; 51])]).unwrap();
        assert!(!run(&large).iter().any(|m| m.kind == AdvisoryKind::FewDataPoints));
    }

    #[test]
    fn cardinality_checks_are_exclusive() {
        let ids: Vec<i64> = (0..60).collect();
        let near_constant: Vec<f64> = (0..60).map(|i| 1.0 + (i % 2) as f64 * 1e-5).collect();
        let ds = Dataset::new(vec![
            Column::categorical("country", vec![Some("IT"); 60]),
            Column::integer("id", ids),
            Column::float("sensor", near_constant),
        ])
        .unwrap();
        let messages = run(&ds);
        let per_column: Vec<_> = kinds(&messages)
            .into_iter()
            .filter(|(k, _)| {
                matches!(
                    k,
                    AdvisoryKind::SingleValue | AdvisoryKind::HighCardinality | AdvisoryKind::NearConstant
                )
            })
            .collect();
        assert_eq!(
            per_column,
            vec![
                (AdvisoryKind::SingleValue, Some("country")),
                (AdvisoryKind::HighCardinality, Some("id")),
                (AdvisoryKind::NearConstant, Some("sensor")),
            ]
        );
    }

    #[test]
    fn groups_follow_fixed_order() {
        // One extreme value: unreliable mean, skewed, heavy-tailed, 1/12 outliers.
        let mut values = vec![10.0, 11.0, 9.0, 10.0, 12.0, 8.0, 10.0, 11.0, 9.0, 10.0, 10.0];
        values.push(500.0);
        let ds = Dataset::new(vec![Column::float("income", values)]).unwrap();
        let messages = run(&ds);
        assert_eq!(
            messages.iter().map(|m| m.kind).collect::<Vec<_>>(),
            vec![
                AdvisoryKind::FewDataPoints,
                AdvisoryKind::UseMedian,
                AdvisoryKind::ConsiderTransformation,
                AdvisoryKind::NonParametricTest,
            ]
        );
        assert!(messages[1].text.contains("median (10)"));
    }

    #[test]
    fn outlier_impact_over_ten_percent() {
        let mut values = vec![5.0; 8];
        values.extend([50.0, 60.0]);
        let ds = Dataset::new(vec![Column::float("x", values)]).unwrap();
        let messages = run(&ds);
        let last = messages.last().unwrap();
        assert_eq!(last.kind, AdvisoryKind::OutlierImpact);
        assert!(last.text.contains("20%"));
    }
}
