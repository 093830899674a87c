use std::collections::HashMap;

use crate::data::datetime::is_date_like;

/// Delimiters tried when sniffing a delimited text file, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Read up to `max_lines` records from delimited text without headers.
pub fn read_records(text: &str, delimiter: u8, max_lines: Option<usize>) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        if max_lines.is_some_and(|max| i >= max) {
            break;
        }
        match result {
            Ok(record) => rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => tracing::warn!("Skipping malformed record {i}: {e}"),
        }
    }
    rows
}

/// Pick the delimiter that splits the first `max_lines` records into the most
/// consistent multi-column layout. Falls back to a comma.
pub fn detect_delimiter(text: &str, max_lines: usize) -> u8 {
    let mut best = (b',', 0usize, 0usize);

    for &delimiter in &CANDIDATE_DELIMITERS {
        let rows = read_records(text, delimiter, Some(max_lines));
        let (width, support) = modal_width(rows.iter().map(Vec::len));
        if width < 2 {
            continue;
        }
        // Most rows agreeing first, then the wider split.
        if support > best.2 || (support == best.2 && width > best.1) {
            best = (delimiter, width, support);
        }
    }

    best.0
}

/// Most common row width and how many rows share it.
fn modal_width(widths: impl Iterator<Item = usize>) -> (usize, usize) {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for w in widths {
        *counts.entry(w).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .unwrap_or((0, 0))
}

/// Detect the header row among the first `max_rows` rows.
///
/// Picks the first row whose width matches the modal width and whose cells
/// are all non-empty text that is neither a number nor a date, so preamble
/// lines of a different width are skipped. Returns 0 when no such row exists.
pub fn detect_header_row(rows: &[Vec<String>], max_rows: usize) -> usize {
    let sample = &rows[..rows.len().min(max_rows)];
    let non_empty_width = |row: &Vec<String>| {
        row.iter().rposition(|c| !c.trim().is_empty()).map_or(0, |p| p + 1)
    };
    let (most_common, _) = modal_width(sample.iter().map(non_empty_width));

    sample
        .iter()
        .position(|row| {
            most_common > 0
                && non_empty_width(row) == most_common
                && row[..most_common].iter().all(|cell| {
                    let trimmed = cell.trim();
                    !trimmed.is_empty() && trimmed.parse::<f64>().is_err() && !is_date_like(trimmed)
                })
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn sniffs_semicolons() {
        let text = "a;b;c\n1;2,5;3\n4;5,5;6\n";
        assert_eq!(detect_delimiter(text, 50), b';');
    }

    #[test]
    fn sniffs_tabs() {
        let text = "a\tb\n1\t2\n3\t4\n";
        assert_eq!(detect_delimiter(text, 50), b'\t');
    }

    #[test]
    fn single_column_falls_back_to_comma() {
        assert_eq!(detect_delimiter("value\n1\n2\n", 50), b',');
    }

    #[test]
    fn header_after_preamble_is_found() {
        let data = rows(&[
            &["Exported by tool", "", ""],
            &["name", "age", "joined"],
            &["ann", "31", "2024-01-05"],
            &["bob", "42", "2024-02-11"],
        ]);
        assert_eq!(detect_header_row(&data, 50), 1);
    }

    #[test]
    fn text_data_rows_do_not_displace_the_header() {
        let data = rows(&[&["city", "country"], &["rome", "italy"], &["lyon", "france"]]);
        assert_eq!(detect_header_row(&data, 50), 0);
    }

    #[test]
    fn numeric_only_table_uses_first_row() {
        let data = rows(&[&["1", "2"], &["3", "4"]]);
        assert_eq!(detect_header_row(&data, 50), 0);
    }
}
