use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::dataset::{normalize_column_name, Column, ColumnData, Dataset, NumericKind};
use crate::data::datetime::{detect_date_format, parse_to_timestamp};
use crate::data::loader::{column_to_f64, LoadedData};
use crate::error::DatasetError;

/// Cell spellings read as missing values.
pub const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

/// What to do with rows that contain missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    #[default]
    Keep,
    DropRows,
    FillZero,
}

impl MissingPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            MissingPolicy::Keep => "Keep",
            MissingPolicy::DropRows => "Drop rows",
            MissingPolicy::FillZero => "Fill with 0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub missing: MissingPolicy,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            missing: MissingPolicy::Keep,
        }
    }
}

type Row = Vec<Option<String>>;

fn to_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Clean a loaded table and infer column types.
pub fn clean(loaded: &LoadedData, options: &CleaningOptions) -> Result<Dataset, DatasetError> {
    let mut rows: Vec<Row> = (0..loaded.row_count)
        .map(|r| {
            loaded
                .column_data
                .iter()
                .map(|col| col.get(r).and_then(|s| to_cell(s)))
                .collect()
        })
        .collect();
    let initial_rows = rows.len();

    if options.remove_duplicates {
        let mut seen: HashSet<Row> = HashSet::new();
        rows.retain(|row| seen.insert(row.clone()));
    }

    match options.missing {
        MissingPolicy::Keep => {}
        MissingPolicy::DropRows => rows.retain(|row| row.iter().all(Option::is_some)),
        MissingPolicy::FillZero => {
            for cell in rows.iter_mut().flat_map(|row| row.iter_mut()) {
                cell.get_or_insert_with(|| "0".to_string());
            }
        }
    }

    rows.retain(|row| row.iter().any(Option::is_some));
    if rows.len() < initial_rows {
        tracing::warn!("Dropped {} of {} rows during cleaning", initial_rows - rows.len(), initial_rows);
    }

    let names = unique_names(&loaded.columns);
    let mut columns = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let cells: Vec<Option<&str>> = rows
            .iter()
            .map(|row| row.get(idx).and_then(|c| c.as_deref()))
            .collect();
        if cells.iter().all(Option::is_none) {
            tracing::warn!("Dropping empty column `{name}`");
            continue;
        }
        columns.push(Column::new(name, infer_column(&cells)));
    }

    Dataset::new(columns)
}

/// Normalize names, filling blanks and suffixing collisions.
fn unique_names(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut base = normalize_column_name(name);
            if base.is_empty() {
                base = format!("column_{}", idx + 1);
            }
            let mut candidate = base.clone();
            let mut n = 2;
            while !used.insert(candidate.clone()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Numeric when every present cell is a number, temporal when every present
/// cell parses under one date format, categorical otherwise.
fn infer_column(cells: &[Option<&str>]) -> ColumnData {
    let present: Vec<&str> = cells.iter().flatten().copied().collect();

    let (parsed, frac) = column_to_f64(&present);
    if frac == 1.0 {
        let all_integers = present.iter().all(|s| s.trim().parse::<i64>().is_ok());
        let kind = if all_integers && present.len() == cells.len() {
            NumericKind::Integer
        } else {
            NumericKind::Float
        };
        let mut parsed = parsed.into_iter();
        let values = cells.iter().map(|c| c.and_then(|_| parsed.next())).collect();
        return ColumnData::Numeric { values, kind };
    }

    if let Some(format) = detect_date_format(&present) {
        let timestamps: Vec<Option<f64>> = cells
            .iter()
            .map(|c| c.and_then(|s| parse_to_timestamp(s.trim(), format)))
            .collect();
        let parsed_all = timestamps.iter().zip(cells).all(|(t, c)| t.is_some() == c.is_some());
        if parsed_all {
            return ColumnData::Temporal(timestamps);
        }
    }

    ColumnData::Categorical(cells.iter().map(|c| c.map(str::to_string)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::ColumnKind;

    fn loaded(columns: &[&str], rows: &[&[&str]]) -> LoadedData {
        let rows: Vec<Vec<String>> = rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect();
        LoadedData::from_rows(columns.iter().map(|s| s.to_string()).collect(), &rows)
    }

    #[test]
    fn infers_types_and_normalizes_names() {
        let data = loaded(
            &["Name", " Unit Price", "Qty", "Joined On"],
            &[
                &["ann", "1.5", "3", "2024-01-05"],
                &["bob", "2", "4", "2024-02-11"],
            ],
        );
        let ds = clean(&data, &CleaningOptions::default()).unwrap();
        let kinds: Vec<_> = ds.columns().iter().map(|c| (c.name.as_str(), c.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("name", ColumnKind::Categorical),
                ("unit_price", ColumnKind::Numeric(NumericKind::Float)),
                ("qty", ColumnKind::Numeric(NumericKind::Integer)),
                ("joined_on", ColumnKind::Temporal),
            ]
        );
    }

    #[test]
    fn integers_with_missing_cells_become_float() {
        let data = loaded(&["n", "label"], &[&["1", "a"], &["NA", "b"], &["3", "c"]]);
        let ds = clean(&data, &CleaningOptions::default()).unwrap();
        assert_eq!(ds.row_count(), 3);
        let col = ds.column("n").unwrap();
        assert!(col.is_float());
        assert_eq!(col.numeric_values().unwrap(), vec![1.0, 3.0]);
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn duplicates_and_empty_rows_are_dropped() {
        let data = loaded(&["a", "b"], &[&["1", "x"], &["1", "x"], &["", " "], &["2", "y"]]);
        let ds = clean(&data, &CleaningOptions::default()).unwrap();
        assert_eq!(ds.row_count(), 2);

        let keep_dups = CleaningOptions { remove_duplicates: false, ..Default::default() };
        assert_eq!(clean(&data, &keep_dups).unwrap().row_count(), 3);
    }

    #[test]
    fn missing_policies() {
        let data = loaded(&["a", "b"], &[&["1", ""], &["2", "5"], &["3", "6"]]);

        let dropped = CleaningOptions { missing: MissingPolicy::DropRows, ..Default::default() };
        assert_eq!(clean(&data, &dropped).unwrap().row_count(), 2);

        let filled = CleaningOptions { missing: MissingPolicy::FillZero, ..Default::default() };
        let ds = clean(&data, &filled).unwrap();
        assert_eq!(ds.column("b").unwrap().numeric_values().unwrap(), vec![0.0, 5.0, 6.0]);
    }

    #[test]
    fn blank_and_colliding_names_are_repaired() {
        let data = loaded(&["", "Value", "value"], &[&["a", "1", "2"]]);
        let ds = clean(&data, &CleaningOptions::default()).unwrap();
        let names: Vec<_> = ds.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["column_1", "value", "value_2"]);
    }

    #[test]
    fn all_missing_columns_are_dropped() {
        let data = loaded(&["a", "b"], &[&["1", "null"], &["2", ""]]);
        let ds = clean(&data, &CleaningOptions::default()).unwrap();
        assert_eq!(ds.column_count(), 1);
    }
}
