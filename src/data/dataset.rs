use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Storage width of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericKind {
    Integer,
    Float,
}

/// Inferred semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric(NumericKind),
    Categorical,
    Temporal,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric(NumericKind::Integer) => "integer",
            ColumnKind::Numeric(NumericKind::Float) => "float",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Temporal => "datetime",
        }
    }
}

/// Column values; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric {
        values: Vec<Option<f64>>,
        kind: NumericKind,
    },
    Categorical(Vec<Option<String>>),
    /// Unix timestamps in seconds.
    Temporal(Vec<Option<f64>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self { name: name.into(), data }
    }

    /// Float column. NaN entries are treated as missing.
    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        let values = values.into_iter().map(|v| (!v.is_nan()).then_some(v)).collect();
        Self::new(name, ColumnData::Numeric { values, kind: NumericKind::Float })
    }

    pub fn integer(name: impl Into<String>, values: Vec<i64>) -> Self {
        let values = values.into_iter().map(|v| Some(v as f64)).collect();
        Self::new(name, ColumnData::Numeric { values, kind: NumericKind::Integer })
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Categorical(values))
    }

    pub fn temporal(name: impl Into<String>, timestamps: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Temporal(timestamps))
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.len(),
            ColumnData::Categorical(values) => values.len(),
            ColumnData::Temporal(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match &self.data {
            ColumnData::Numeric { kind, .. } => ColumnKind::Numeric(*kind),
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Temporal(_) => ColumnKind::Temporal,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric { .. })
    }

    pub fn is_float(&self) -> bool {
        matches!(self.data, ColumnData::Numeric { kind: NumericKind::Float, .. })
    }

    /// Non-missing values of a numeric column, in row order.
    /// Returns `None` for non-numeric columns.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ColumnData::Numeric { values, .. } => Some(values.iter().flatten().copied().collect()),
            _ => None,
        }
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Temporal(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Number of distinct non-missing values.
    pub fn distinct_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric { values, .. } | ColumnData::Temporal(values) => values
                .iter()
                .flatten()
                .map(|v| float_key(*v))
                .collect::<HashSet<_>>()
                .len(),
            ColumnData::Categorical(values) => values
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    /// Display form of the cell at `row`, or `None` when it is missing.
    pub fn display_value(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.get(row).copied().flatten().map(|v| v.to_string()),
            ColumnData::Categorical(values) => values.get(row).cloned().flatten(),
            ColumnData::Temporal(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(crate::data::datetime::format_timestamp),
        }
    }
}

/// Hashable identity of a float, with `-0.0` folded onto `0.0`.
fn float_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Normalize a column name: trimmed, lower-cased, spaces replaced by `_`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// An immutable, column-major table with unique normalized column names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset, normalizing names and checking the column invariants.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(columns.len());

        for (idx, mut column) in columns.into_iter().enumerate() {
            column.name = normalize_column_name(&column.name);
            if column.name.is_empty() {
                return Err(DatasetError::EmptyColumnName(idx));
            }
            if !seen.insert(column.name.clone()) {
                return Err(DatasetError::DuplicateColumn(column.name));
            }
            let found = column.len();
            if found != row_count {
                return Err(DatasetError::LengthMismatch {
                    column: column.name,
                    expected: row_count,
                    found,
                });
            }
            normalized.push(column);
        }

        Ok(Self { columns: normalized, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns in dataset order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        let ds = Dataset::new(vec![Column::float("  Unit Price ", vec![1.0, 2.0])]).unwrap();
        assert_eq!(ds.columns()[0].name, "unit_price");
        assert!(ds.column("unit_price").is_some());
    }

    #[test]
    fn duplicate_names_after_normalization_are_rejected() {
        let err = Dataset::new(vec![
            Column::float("Age", vec![1.0]),
            Column::float("age ", vec![2.0]),
        ])
        .unwrap_err();
        assert_eq!(err, DatasetError::DuplicateColumn("age".into()));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Dataset::new(vec![
            Column::float("a", vec![1.0, 2.0]),
            Column::float("b", vec![1.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::LengthMismatch {
                column: "b".into(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Dataset::new(vec![Column::float("   ", vec![1.0])]).unwrap_err();
        assert_eq!(err, DatasetError::EmptyColumnName(0));
    }

    #[test]
    fn distinct_count_skips_missing_and_folds_signed_zero() {
        let col = Column::float("x", vec![0.0, -0.0, f64::NAN, 1.0, 1.0]);
        assert_eq!(col.distinct_count(), 2);
        assert_eq!(col.missing_count(), 1);
        assert_eq!(col.numeric_values().unwrap(), vec![0.0, -0.0, 1.0, 1.0]);
    }

    #[test]
    fn categorical_columns_have_no_numeric_view() {
        let col = Column::categorical("city", vec![Some("Rome"), None, Some("Rome")]);
        assert_eq!(col.numeric_values(), None);
        assert_eq!(col.distinct_count(), 1);
        assert_eq!(col.kind().label(), "categorical");
    }
}
