use std::path::PathBuf;

/// Errors raised while reading a data file from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected JSON layout: {0}")]
    JsonLayout(&'static str),

    #[error("No sheets found")]
    NoSheets,

    #[error("No data found after header detection")]
    NoData,
}

/// Errors raised when a set of columns cannot form a valid dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("Column {0} has an empty name")]
    EmptyColumnName(usize),

    #[error("Duplicate column name `{0}`")]
    DuplicateColumn(String),

    #[error("Column `{column}` has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot access config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while serializing or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Cannot write report to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
