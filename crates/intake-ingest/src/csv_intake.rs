use std::collections::{BTreeMap, BTreeSet};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use intake_model::{ColumnHint, SourceColumn};

use crate::error::{IngestError, Result};
use crate::file::FileRef;

/// Default number of data rows kept for preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 8;

/// Parsed headers and a row preview of a tabular file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularPreview {
    pub columns: Vec<SourceColumn>,
    /// The first rows of data, padded to the header width.
    pub rows: Vec<Vec<String>>,
    /// Total number of non-blank data rows in the file.
    pub row_count: usize,
    pub hints: BTreeMap<String, ColumnHint>,
}

impl TabularPreview {
    /// Build a preview from headers and rows already in memory.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let hints = build_column_hints(&headers, &rows);
        Self {
            columns: SourceColumn::from_headers(headers),
            row_count: rows.len(),
            rows,
            hints,
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Preview values of one column.
    pub fn samples(&self, column: &str) -> Vec<&str> {
        let Some(idx) = self.columns.iter().position(|c| c.name == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).map(String::as_str))
            .collect()
    }
}

/// Turns an uploaded file into headers and preview rows.
pub trait FileIntake {
    fn intake(&self, file: &FileRef) -> Result<TabularPreview>;
}

/// CSV file intake.
#[derive(Debug, Clone)]
pub struct CsvIntake {
    pub preview_rows: usize,
    pub delimiter: u8,
}

impl Default for CsvIntake {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            delimiter: b',',
        }
    }
}

impl CsvIntake {
    #[must_use]
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl FileIntake for CsvIntake {
    fn intake(&self, file: &FileRef) -> Result<TabularPreview> {
        let path = &file.path;
        let csv_error = |source| IngestError::Csv {
            path: path.clone(),
            source,
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(csv_error)?;

        let mut records = reader.records();
        let mut next_row = move || -> Result<Option<csv::StringRecord>> {
            for record in records.by_ref() {
                let record = record.map_err(csv_error)?;
                if !record.iter().all(|value| value.trim().is_empty()) {
                    return Ok(Some(record));
                }
            }
            Ok(None)
        };

        let header_record =
            next_row()?.ok_or_else(|| IngestError::NoHeader { path: path.clone() })?;
        let headers =
            trim_trailing_empty_headers(header_record.iter().map(normalize_header).collect());
        validate_headers(file, &headers)?;

        let width = headers.len();
        let mut stats = HintAccumulator::new(width);
        let mut preview = Vec::with_capacity(self.preview_rows);
        while let Some(record) = next_row()? {
            let row: Vec<String> = (0..width)
                .map(|idx| record.get(idx).map(normalize_cell).unwrap_or_default())
                .collect();
            stats.observe(&row);
            if preview.len() < self.preview_rows {
                preview.push(row);
            }
        }
        let row_count = stats.rows;
        debug!(
            file = %file.display_name,
            columns = width,
            row_count,
            "parsed csv headers"
        );
        Ok(TabularPreview {
            hints: stats.finish(&headers),
            columns: SourceColumn::from_headers(headers),
            rows: preview,
            row_count,
        })
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

// Spreadsheet exports often carry trailing delimiters on the header row.
fn trim_trailing_empty_headers(mut headers: Vec<String>) -> Vec<String> {
    while headers.last().is_some_and(String::is_empty) {
        headers.pop();
    }
    headers
}

fn validate_headers(file: &FileRef, headers: &[String]) -> Result<()> {
    if headers.is_empty() {
        return Err(IngestError::NoHeader {
            path: file.path.clone(),
        });
    }
    let mut seen = BTreeSet::new();
    for (position, name) in headers.iter().enumerate() {
        if name.is_empty() {
            return Err(IngestError::EmptyHeader {
                path: file.path.clone(),
                position,
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateHeader {
                path: file.path.clone(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

/// Parse a cell as a number, tolerating thousands separators, currency and
/// percent signs.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '$' | '%'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Running counts for one column's values.
#[derive(Default)]
struct ColumnStats {
    filled: usize,
    numeric: usize,
    distinct: BTreeSet<String>,
}

impl ColumnStats {
    fn observe(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.filled += 1;
        self.numeric += usize::from(parse_numeric(value).is_some());
        if !self.distinct.contains(value) {
            self.distinct.insert(value.to_string());
        }
    }

    fn into_hint(self, rows: usize) -> ColumnHint {
        let ratio = |part: usize, whole: usize| {
            if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
        };
        ColumnHint {
            is_numeric: self.filled > 0 && self.numeric == self.filled,
            unique_ratio: ratio(self.distinct.len(), self.filled),
            // A column with no rows at all counts as entirely empty.
            null_ratio: if rows == 0 { 1.0 } else { ratio(rows - self.filled, rows) },
        }
    }
}

/// Folds rows into per-column stats one at a time, so hints cover a whole
/// file without holding its rows.
struct HintAccumulator {
    columns: Vec<ColumnStats>,
    rows: usize,
}

impl HintAccumulator {
    fn new(width: usize) -> Self {
        Self {
            columns: (0..width).map(|_| ColumnStats::default()).collect(),
            rows: 0,
        }
    }

    /// Cells past the end of a short row count as blank.
    fn observe(&mut self, row: &[String]) {
        self.rows += 1;
        for (position, stats) in self.columns.iter_mut().enumerate() {
            stats.observe(row.get(position).map_or("", String::as_str));
        }
    }

    fn finish(self, headers: &[String]) -> BTreeMap<String, ColumnHint> {
        let rows = self.rows;
        headers
            .iter()
            .cloned()
            .zip(self.columns.into_iter().map(|stats| stats.into_hint(rows)))
            .collect()
    }
}

/// Per-column shape hints over `rows`. Short rows count as blank cells.
pub fn build_column_hints(
    headers: &[String],
    rows: &[Vec<String>],
) -> BTreeMap<String, ColumnHint> {
    let mut stats = HintAccumulator::new(headers.len());
    for row in rows {
        stats.observe(row);
    }
    stats.finish(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_parsing_tolerates_formatting() {
        assert_eq!(parse_numeric("1,250.00"), Some(1250.0));
        assert_eq!(parse_numeric("$425,000.00"), Some(425000.0));
        assert_eq!(parse_numeric("5.125%"), Some(5.125));
        assert_eq!(parse_numeric("INV-2025-0042"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_headers_are_whitespace_normalized() {
        assert_eq!(normalize_header("\u{feff} Trans   Date "), "Trans Date");
    }

    #[test]
    fn test_trailing_blank_headers_are_dropped() {
        let headers = vec!["A".to_string(), String::new(), String::new()];
        assert_eq!(trim_trailing_empty_headers(headers), vec!["A".to_string()]);
    }
}
