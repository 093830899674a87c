//! Skewness/kurtosis normality classification (Fisher's rule).

use serde::Serialize;

use crate::data::dataset::Dataset;
use crate::processing::column_results::ColumnResults;
use crate::processing::statistics::{kurtosis, round_to, skewness};

/// Minimum number of values for skewness to be defined.
pub const MIN_NORMALITY_VALUES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkewClass {
    Symmetric,
    ModeratelySkewed,
    HighlySkewed,
}

impl SkewClass {
    /// `[-0.5, 0.5]` symmetric, magnitude strictly under 1 moderately skewed.
    pub fn classify(skew: f64) -> Self {
        if (-0.5..=0.5).contains(&skew) {
            SkewClass::Symmetric
        } else if skew.abs() < 1.0 {
            SkewClass::ModeratelySkewed
        } else {
            SkewClass::HighlySkewed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkewClass::Symmetric => "Symmetric",
            SkewClass::ModeratelySkewed => "Moderately skewed",
            SkewClass::HighlySkewed => "Highly skewed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KurtosisClass {
    Normal,
    NearNormal,
    NonNormal,
}

impl KurtosisClass {
    /// By magnitude: under 0.5 normal, under 1 near normal. Undefined
    /// kurtosis (NaN) is non-normal.
    pub fn classify(kurt: f64) -> Self {
        if kurt.abs() < 0.5 {
            KurtosisClass::Normal
        } else if kurt.abs() < 1.0 {
            KurtosisClass::NearNormal
        } else {
            KurtosisClass::NonNormal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KurtosisClass::Normal => "Normal",
            KurtosisClass::NearNormal => "Near normal",
            KurtosisClass::NonNormal => "Non-normal",
        }
    }
}

/// Normality judgment, with skewness and kurtosis rounded to 4 decimals.
/// Classes are derived from the rounded values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalityVerdict {
    pub skewness: f64,
    /// Excess kurtosis. NaN when the column has exactly 3 values.
    pub kurtosis: f64,
    pub skew_class: SkewClass,
    pub kurt_class: KurtosisClass,
    pub is_normal: bool,
}

impl NormalityVerdict {
    pub fn from_moments(skew: f64, kurt: f64) -> Self {
        let skewness = round_to(skew, 4);
        let kurtosis = round_to(kurt, 4);
        let skew_class = SkewClass::classify(skewness);
        let kurt_class = KurtosisClass::classify(kurtosis);
        Self {
            skewness,
            kurtosis,
            skew_class,
            kurt_class,
            is_normal: skew_class == SkewClass::Symmetric && kurt_class == KurtosisClass::Normal,
        }
    }

    /// `None` when there are fewer than 3 values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let skew = skewness(values)?;
        let kurt = kurtosis(values).unwrap_or(f64::NAN);
        Some(Self::from_moments(skew, kurt))
    }
}

/// Normality verdicts for every numeric column with at least 3 values.
pub fn classify_normality(dataset: &Dataset) -> ColumnResults<NormalityVerdict> {
    let mut results = ColumnResults::new();
    for column in dataset.numeric_columns() {
        let values = column.numeric_values().unwrap_or_default();
        if values.len() < MIN_NORMALITY_VALUES {
            continue;
        }
        if let Some(verdict) = NormalityVerdict::from_values(&values) {
            results.insert(column.name.clone(), verdict);
        }
    }
    tracing::debug!("Normality classification covered {} columns", results.len());
    results
}

/// How many classified columns look normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NormalitySummary {
    Empty,
    /// Prefer Spearman or Kendall.
    NoneNormal { total: usize },
    /// Pearson is appropriate throughout.
    AllNormal { total: usize },
    Mixed { normal: usize, total: usize },
}

impl NormalitySummary {
    pub fn from_verdicts(verdicts: &ColumnResults<NormalityVerdict>) -> Self {
        let total = verdicts.len();
        let normal = verdicts.values().filter(|v| v.is_normal).count();
        match (normal, total) {
            (_, 0) => NormalitySummary::Empty,
            (0, total) => NormalitySummary::NoneNormal { total },
            (n, total) if n == total => NormalitySummary::AllNormal { total },
            (normal, total) => NormalitySummary::Mixed { normal, total },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            NormalitySummary::Empty => "No numeric column has enough values for a normality test.".to_string(),
            NormalitySummary::NoneNormal { .. } => {
                "No column is normally distributed: prefer Spearman or Kendall for correlations.".to_string()
            }
            NormalitySummary::AllNormal { total } => {
                format!("All {total} columns are normally distributed: Pearson is appropriate.")
            }
            NormalitySummary::Mixed { normal, total } => {
                format!("{normal}/{total} columns are normally distributed: judge case by case.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Column;

    #[test]
    fn skew_boundaries_are_inclusive() {
        assert_eq!(SkewClass::classify(0.5), SkewClass::Symmetric);
        assert_eq!(SkewClass::classify(-0.5), SkewClass::Symmetric);
        assert_eq!(SkewClass::classify(0.5001), SkewClass::ModeratelySkewed);
        assert_eq!(SkewClass::classify(-0.9999), SkewClass::ModeratelySkewed);
        assert_eq!(SkewClass::classify(1.0), SkewClass::HighlySkewed);
        assert_eq!(SkewClass::classify(-3.0), SkewClass::HighlySkewed);
    }

    #[test]
    fn kurtosis_boundaries_are_exclusive() {
        assert_eq!(KurtosisClass::classify(0.4999), KurtosisClass::Normal);
        assert_eq!(KurtosisClass::classify(-0.4999), KurtosisClass::Normal);
        assert_eq!(KurtosisClass::classify(0.5), KurtosisClass::NearNormal);
        assert_eq!(KurtosisClass::classify(-0.9999), KurtosisClass::NearNormal);
        assert_eq!(KurtosisClass::classify(1.0), KurtosisClass::NonNormal);
        assert_eq!(KurtosisClass::classify(f64::NAN), KurtosisClass::NonNormal);
    }

    #[test]
    fn normal_needs_both_conditions() {
        assert!(NormalityVerdict::from_moments(0.5, 0.4999).is_normal);
        assert!(NormalityVerdict::from_moments(-0.5, -0.3).is_normal);
        assert!(!NormalityVerdict::from_moments(0.5, 0.5).is_normal);
        assert!(!NormalityVerdict::from_moments(0.6, 0.0).is_normal);
    }

    #[test]
    fn constant_column_does_not_fail() {
        let v = NormalityVerdict::from_values(&[10.0; 5]).unwrap();
        assert_eq!(v.skewness, 0.0);
        assert_eq!(v.kurtosis, 0.0);
        assert!(v.is_normal);
    }

    #[test]
    fn three_values_have_undefined_kurtosis() {
        let v = NormalityVerdict::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v.skewness, 0.0);
        assert!(v.kurtosis.is_nan());
        assert_eq!(v.kurt_class, KurtosisClass::NonNormal);
        assert!(!v.is_normal);
    }

    #[test]
    fn short_columns_are_excluded() {
        let ds = Dataset::new(vec![
            Column::float("short", vec![1.0, 2.0, f64::NAN]),
            Column::float("long", vec![1.0, 2.0, 4.0]),
        ])
        .unwrap();
        let results = classify_normality(&ds);
        assert!(!results.contains("short"));
        assert!(results.contains("long"));
    }

    #[test]
    fn summary_counts_normal_columns() {
        let mut verdicts = ColumnResults::new();
        assert_eq!(NormalitySummary::from_verdicts(&verdicts), NormalitySummary::Empty);
        verdicts.insert("a", NormalityVerdict::from_moments(0.1, 0.1));
        assert_eq!(NormalitySummary::from_verdicts(&verdicts), NormalitySummary::AllNormal { total: 1 });
        verdicts.insert("b", NormalityVerdict::from_moments(2.0, 3.0));
        assert_eq!(
            NormalitySummary::from_verdicts(&verdicts),
            NormalitySummary::Mixed { normal: 1, total: 2 }
        );
    }
}
