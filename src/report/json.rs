use std::path::Path;

use crate::error::ReportError;
use crate::processing::analysis::AnalysisReport;

/// Pretty JSON. Non-finite numbers (undefined statistics, infinite
/// dispersion) are written as `null`.
pub fn to_json(report: &AnalysisReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Report written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{Column, Dataset};
    use crate::processing::analysis::{analyze, AnalysisOptions};
    use serde_json::Value;

    #[test]
    fn mappings_keep_dataset_order_and_nan_becomes_null() {
        let ds = Dataset::new(vec![
            Column::float("zeta", vec![-5.0, 0.0, 5.0]),
            Column::float("alpha", vec![1.0, 2.0, 4.0]),
        ])
        .unwrap();
        let json = to_json(&analyze(&ds, &AnalysisOptions::default())).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let reliability = value["reliability"].as_object().unwrap();
        assert_eq!(reliability.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(reliability["zeta"]["std_percent"], Value::Null);
        assert_eq!(reliability["zeta"]["recommended"], "Median");
        assert_eq!(value["normality"]["alpha"]["kurtosis"], Value::Null);
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(write_report(&dir.path().join("missing/report.json"), "{}").is_err());
    }
}
