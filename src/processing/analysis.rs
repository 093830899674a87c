use serde::{Deserialize, Serialize};

use crate::data::dataset::Dataset;
use crate::processing::advisory::{advise, AdvisoryMessage};
use crate::processing::column_results::ColumnResults;
use crate::processing::correlation::{CorrelationMatrix, CorrelationOptions, HighCorrelation};
use crate::processing::describe::{describe_numeric, DatasetSummary, NumericDescription};
use crate::processing::method_advisor::{
    overall_method, suggest_correlation_methods, CorrelationMethod, CorrelationMethodSuggestion,
};
use crate::processing::normality::{classify_normality, NormalitySummary, NormalityVerdict};
use crate::processing::outliers::{detect_outliers, OutlierReport};
use crate::processing::reliability::{classify_reliability, ReliabilityVerdict};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub correlation: CorrelationOptions,
}

/// Everything one analysis pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: DatasetSummary,
    pub description: Vec<NumericDescription>,
    pub reliability: ColumnResults<ReliabilityVerdict>,
    pub normality: ColumnResults<NormalityVerdict>,
    pub normality_summary: NormalitySummary,
    pub outliers: ColumnResults<OutlierReport>,
    pub correlation_methods: ColumnResults<CorrelationMethodSuggestion>,
    pub overall_method: Option<CorrelationMethod>,
    /// Needs at least two numeric columns.
    pub correlation: Option<CorrelationMatrix>,
    pub high_correlations: Vec<HighCorrelation>,
    pub advisories: Vec<AdvisoryMessage>,
}

impl AnalysisReport {
    pub fn has_advisories(&self) -> bool {
        !self.advisories.is_empty()
    }
}

/// Run the full decision pass over a cleaned dataset.
///
/// The three classifiers are independent of each other; the method advisor
/// and the advisory aggregator only read their finished results.
pub fn analyze(dataset: &Dataset, options: &AnalysisOptions) -> AnalysisReport {
    let reliability = classify_reliability(dataset);
    let normality = classify_normality(dataset);
    let outliers = detect_outliers(dataset);

    let correlation_methods = suggest_correlation_methods(&normality, &outliers);
    let overall = overall_method(&correlation_methods);
    let advisories = advise(dataset, &reliability, &normality, &outliers);

    let description = describe_numeric(dataset, &reliability);
    let numeric_count = dataset.numeric_columns().count();
    let method = options
        .correlation
        .method
        .or(overall)
        .unwrap_or(CorrelationMethod::Pearson);
    let correlation = (numeric_count >= 2).then(|| CorrelationMatrix::compute(dataset, method));
    let high_correlations = correlation
        .as_ref()
        .map(|m| m.high_correlations(options.correlation.high_threshold))
        .unwrap_or_default();

    tracing::info!(
        "Analyzed {} rows x {} columns: {} advisories, {} highly correlated pairs",
        dataset.row_count(),
        dataset.column_count(),
        advisories.len(),
        high_correlations.len()
    );

    AnalysisReport {
        summary: DatasetSummary::from_dataset(dataset),
        description,
        normality_summary: NormalitySummary::from_verdicts(&normality),
        reliability,
        normality,
        outliers,
        correlation_methods,
        overall_method: overall,
        correlation,
        high_correlations,
        advisories,
    }
}
