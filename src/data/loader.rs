use std::path::Path;

use serde_json::Value;

use crate::data::parser;
use crate::error::LoadError;

/// Rows inspected for delimiter sniffing and header detection.
const SNIFF_ROWS: usize = 50;

/// Result of loading a data file: column names and column data as strings
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<String>>, // column-major: column_data[col_idx][row_idx]
    pub row_count: usize,
}

impl LoadedData {
    /// Build from a header row and row-major data, padding short rows.
    pub fn from_rows(columns: Vec<String>, data_rows: &[Vec<String>]) -> Self {
        let mut column_data: Vec<Vec<String>> = vec![Vec::with_capacity(data_rows.len()); columns.len()];
        for row in data_rows {
            for (col_idx, col_data) in column_data.iter_mut().enumerate() {
                col_data.push(row.get(col_idx).cloned().unwrap_or_default());
            }
        }
        Self { columns, column_data, row_count: data_rows.len() }
    }
}

/// Load a delimited, spreadsheet or JSON file and return the column names and raw string data.
pub fn load_file(path: &Path) -> Result<LoadedData, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let loaded = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, None),
        "tsv" => load_delimited(path, Some(b'\t')),
        "xls" | "xlsx" | "xlsm" | "ods" => load_spreadsheet(path),
        "json" => load_json(path),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }?;

    tracing::info!(
        "Loaded {:?}: {} columns, {} rows",
        path,
        loaded.columns.len(),
        loaded.row_count
    );
    Ok(loaded)
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    let content = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Fall back to latin1 (each byte maps to the same code point).
    Ok(String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect()))
}

fn load_delimited(path: &Path, delimiter: Option<u8>) -> Result<LoadedData, LoadError> {
    let text = read_text(path)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let delimiter = delimiter.unwrap_or_else(|| parser::detect_delimiter(text, SNIFF_ROWS));
    tracing::debug!("Using delimiter {:?}", delimiter as char);

    let all_rows = parser::read_records(text, delimiter, None);
    from_table(all_rows)
}

fn load_spreadsheet(path: &Path) -> Result<LoadedData, LoadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook.sheet_names().first().ok_or(LoadError::NoSheets)?.clone();
    let range = workbook.worksheet_range(&sheet_name)?;

    let all_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => match dt.as_datetime() {
                        Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
                        None => dt.to_string(),
                    },
                    Data::DateTimeIso(s) => s.clone(),
                    Data::DurationIso(s) => s.clone(),
                    Data::Error(_) => String::new(),
                })
                .collect()
        })
        .collect();

    from_table(all_rows)
}

fn from_table(all_rows: Vec<Vec<String>>) -> Result<LoadedData, LoadError> {
    let header_row = parser::detect_header_row(&all_rows, SNIFF_ROWS);
    if all_rows.is_empty() || header_row >= all_rows.len() {
        return Err(LoadError::NoData);
    }
    if header_row > 0 {
        tracing::warn!("Skipping {header_row} preamble rows before the header");
    }

    let columns: Vec<String> = all_rows[header_row].iter().map(|s| s.trim().to_string()).collect();
    Ok(LoadedData::from_rows(columns, &all_rows[header_row + 1..]))
}

fn load_json(path: &Path) -> Result<LoadedData, LoadError> {
    let text = read_text(path)?;
    let value: Value = serde_json::from_str(&text)?;
    parse_json_table(&value)
}

/// Accepts either an array of records or an object of columns, where each
/// column is an array or an index-keyed object.
pub fn parse_json_table(value: &Value) -> Result<LoadedData, LoadError> {
    match value {
        Value::Array(records) => {
            let mut columns: Vec<String> = Vec::new();
            for record in records {
                let obj = record.as_object().ok_or(LoadError::JsonLayout("array items must be objects"))?;
                for key in obj.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
            let rows: Vec<Vec<String>> = records
                .iter()
                .filter_map(Value::as_object)
                .map(|obj| columns.iter().map(|c| json_cell(obj.get(c))).collect())
                .collect();
            Ok(LoadedData::from_rows(columns, &rows))
        }
        Value::Object(map) => {
            let mut columns = Vec::with_capacity(map.len());
            let mut column_data = Vec::with_capacity(map.len());
            for (name, col) in map {
                let cells: Vec<String> = match col {
                    Value::Array(items) => items.iter().map(|v| json_cell(Some(v))).collect(),
                    Value::Object(items) => items.values().map(|v| json_cell(Some(v))).collect(),
                    _ => return Err(LoadError::JsonLayout("columns must be arrays or objects")),
                };
                columns.push(name.clone());
                column_data.push(cells);
            }
            let row_count = column_data.iter().map(Vec::len).max().unwrap_or(0);
            for cells in &mut column_data {
                cells.resize(row_count, String::new());
            }
            Ok(LoadedData { columns, column_data, row_count })
        }
        _ => Err(LoadError::JsonLayout("expected an array or an object")),
    }
}

fn json_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Extract numeric f64 values from a string column.
/// Returns (values, fraction_valid) where invalid entries become NaN.
pub fn column_to_f64(data: &[&str]) -> (Vec<f64>, f64) {
    let mut values = Vec::with_capacity(data.len());
    let mut valid = 0usize;
    for s in data {
        match s.trim().parse::<f64>() {
            Ok(v) => {
                values.push(v);
                if v.is_finite() {
                    valid += 1;
                }
            }
            Err(_) => values.push(f64::NAN),
        }
    }
    let frac = if data.is_empty() { 0.0 } else { valid as f64 / data.len() as f64 };
    (values, frac)
}
