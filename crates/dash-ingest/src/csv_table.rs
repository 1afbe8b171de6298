use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use dash_model::{DashError, Result};

/// Untyped rows as read from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = std::fs::File::open(path).map_err(|e| DashError::unavailable(path, e))?;
    read_csv_from(file).map_err(|e| match e {
        DashError::DataUnavailable { reason, .. } => DashError::unavailable(path, reason),
        other => other,
    })
}

/// Reads a headed CSV stream. The first non-blank row is the header; rows
/// shorter than the header are padded with empty cells.
pub fn read_csv_from<R: Read>(input: R) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DashError::unavailable("<stream>", e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let Some(header) = headers.as_ref() else {
            headers = Some(record.iter().map(normalize_header).collect());
            continue;
        };
        let mut row = Vec::with_capacity(header.len());
        for idx in 0..header.len() {
            row.push(record.get(idx).map(normalize_cell).unwrap_or_default());
        }
        rows.push(row);
    }
    Ok(CsvTable {
        headers: headers.unwrap_or_default(),
        rows,
    })
}
