//! Correlation method recommendation from normality and outlier burden.

use serde::{Deserialize, Serialize};

use crate::processing::column_results::ColumnResults;
use crate::processing::normality::NormalityVerdict;
use crate::processing::outliers::OutlierReport;

/// Outlier percentage above which rank concordance (Kendall) is recommended.
pub const HIGH_OUTLIER_PERCENT: f64 = 15.0;

/// Correlation methods, ordered from least to most conservative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
    #[serde(alias = "kendall")]
    KendallTau,
}

impl CorrelationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "Pearson",
            CorrelationMethod::Spearman => "Spearman",
            CorrelationMethod::KendallTau => "Kendall Tau",
        }
    }

    /// When the method fits best.
    pub fn guidance(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "ideal for normal data and linear relationships",
            CorrelationMethod::Spearman => "better for non-normal data or monotonic relationships",
            CorrelationMethod::KendallTau => "robust with many outliers, ties or small samples",
        }
    }
}

impl std::str::FromStr for CorrelationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            "kendall" | "kendall_tau" | "kendalltau" => Ok(CorrelationMethod::KendallTau),
            other => Err(format!("Unknown correlation method: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMethodSuggestion {
    pub method: CorrelationMethod,
    pub reason: String,
    pub severity: Severity,
}

/// First match wins: heavy outliers, then normality, then the rank fallback.
pub fn suggest_method(normality: &NormalityVerdict, outliers: &OutlierReport) -> CorrelationMethodSuggestion {
    if outliers.percentage > HIGH_OUTLIER_PERCENT {
        CorrelationMethodSuggestion {
            method: CorrelationMethod::KendallTau,
            reason: format!("high outlier burden ({}%)", outliers.percentage),
            severity: Severity::High,
        }
    } else if normality.is_normal {
        CorrelationMethodSuggestion {
            method: CorrelationMethod::Pearson,
            reason: "normal distribution".to_string(),
            severity: Severity::Low,
        }
    } else {
        CorrelationMethodSuggestion {
            method: CorrelationMethod::Spearman,
            reason: "non-normal distribution".to_string(),
            severity: Severity::Medium,
        }
    }
}

/// Suggestions for columns present in both upstream mappings, in outlier
/// (dataset) order. Columns missing from either are skipped.
pub fn suggest_correlation_methods(
    normality: &ColumnResults<NormalityVerdict>,
    outliers: &ColumnResults<OutlierReport>,
) -> ColumnResults<CorrelationMethodSuggestion> {
    outliers
        .iter()
        .filter_map(|(name, report)| {
            let verdict = normality.get(name)?;
            Some((name.to_string(), suggest_method(verdict, report)))
        })
        .collect()
}

/// The more conservative of two column suggestions; `None` when either
/// column has no suggestion.
pub fn pairwise_method<'a>(
    suggestions: &'a ColumnResults<CorrelationMethodSuggestion>,
    a: &str,
    b: &str,
) -> Option<&'a CorrelationMethodSuggestion> {
    let sa = suggestions.get(a)?;
    let sb = suggestions.get(b)?;
    Some(if sb.method > sa.method { sb } else { sa })
}

/// The most conservative method across all suggestions.
pub fn overall_method(suggestions: &ColumnResults<CorrelationMethodSuggestion>) -> Option<CorrelationMethod> {
    suggestions.values().map(|s| s.method).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outliers(percentage: f64) -> OutlierReport {
        OutlierReport {
            count: 1,
            percentage,
            lower_bound: 0.0,
            upper_bound: 1.0,
        }
    }

    fn normal() -> NormalityVerdict {
        NormalityVerdict::from_moments(0.0, 0.0)
    }

    fn skewed() -> NormalityVerdict {
        NormalityVerdict::from_moments(2.0, 4.0)
    }

    #[test]
    fn outlier_rule_takes_precedence() {
        let s = suggest_method(&normal(), &outliers(20.0));
        assert_eq!(s.method, CorrelationMethod::KendallTau);
        assert_eq!(s.severity, Severity::High);
        assert_eq!(s.reason, "high outlier burden (20%)");
    }

    #[test]
    fn fifteen_percent_is_not_high() {
        let s = suggest_method(&normal(), &outliers(15.0));
        assert_eq!(s.method, CorrelationMethod::Pearson);
        assert_eq!(s.severity, Severity::Low);
    }

    #[test]
    fn non_normal_falls_back_to_spearman() {
        let s = suggest_method(&skewed(), &outliers(0.0));
        assert_eq!(s.method, CorrelationMethod::Spearman);
        assert_eq!(s.reason, "non-normal distribution");
        assert_eq!(s.severity, Severity::Medium);
    }

    #[test]
    fn columns_missing_upstream_are_skipped() {
        let mut normality = ColumnResults::new();
        normality.insert("a", normal());
        let mut outlier_map = ColumnResults::new();
        outlier_map.insert("a", outliers(0.0));
        outlier_map.insert("b", outliers(0.0));

        let suggestions = suggest_correlation_methods(&normality, &outlier_map);
        assert_eq!(suggestions.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn pairwise_uses_the_more_conservative_method() {
        let mut normality = ColumnResults::new();
        normality.insert("age", normal());
        normality.insert("salary", skewed());
        let mut outlier_map = ColumnResults::new();
        outlier_map.insert("age", outliers(0.0));
        outlier_map.insert("salary", outliers(12.0));

        let suggestions = suggest_correlation_methods(&normality, &outlier_map);
        let pair = pairwise_method(&suggestions, "age", "salary").unwrap();
        assert_eq!(pair.method, CorrelationMethod::Spearman);
        let pair = pairwise_method(&suggestions, "salary", "age").unwrap();
        assert_eq!(pair.method, CorrelationMethod::Spearman);
        assert!(pairwise_method(&suggestions, "age", "missing").is_none());
        assert_eq!(overall_method(&suggestions), Some(CorrelationMethod::Spearman));
    }

    #[test]
    fn conservatism_ordering() {
        assert!(CorrelationMethod::KendallTau > CorrelationMethod::Spearman);
        assert!(CorrelationMethod::Spearman > CorrelationMethod::Pearson);
        assert_eq!("kendall".parse::<CorrelationMethod>(), Ok(CorrelationMethod::KendallTau));
        assert!("cosine".parse::<CorrelationMethod>().is_err());
    }
}
