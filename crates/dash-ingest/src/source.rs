//! Typed dataset loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, info_span, warn};

use dash_model::{
    DashError, Dataset, DatasetKind, DatasetSchema, FieldKind, LoadIssue, Record, Result, Value,
};

use crate::csv_table::{CsvTable, read_csv_from};
use crate::hash::sha256_hex;
use crate::numeric::{NumericCell, normalize_numeric};

/// Loads one dataset into typed records.
pub trait DataSource {
    fn load(&self, path: &Path, schema: &DatasetSchema) -> Result<Arc<Dataset>>;

    fn load_kind(&self, path: &Path, kind: DatasetKind) -> Result<Arc<Dataset>> {
        self.load(path, &kind.schema())
    }
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: String,
    kind: DatasetKind,
    dataset: Arc<Dataset>,
}

/// CSV-backed [`DataSource`] that memoizes by path.
///
/// A cached dataset is reused only while the file contents hash to the same
/// fingerprint, so edits on disk are picked up on the next load.
#[derive(Debug, Default)]
pub struct CsvDataSource {
    cache: Mutex<BTreeMap<PathBuf, CacheEntry>>,
}

impl CsvDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl DataSource for CsvDataSource {
    fn load(&self, path: &Path, schema: &DatasetSchema) -> Result<Arc<Dataset>> {
        let span = info_span!("load", path = %path.display(), kind = %schema.kind);
        let _guard = span.enter();

        let bytes = std::fs::read(path).map_err(|e| DashError::unavailable(path, e))?;
        let fingerprint = sha256_hex(&bytes);
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = cache.get(path)
                && entry.fingerprint == fingerprint
                && entry.kind == schema.kind
            {
                debug!("dataset served from cache");
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let table = read_csv_from(bytes.as_slice()).map_err(|e| match e {
            DashError::DataUnavailable { reason, .. } => DashError::unavailable(path, reason),
            other => other,
        })?;
        let dataset = Arc::new(coerce_table(&table, schema)?.with_source(path));
        if !dataset.issues.is_empty() {
            warn!(
                issue_count = dataset.issues.len(),
                "numeric values could not be normalized and were excluded from scales"
            );
            for issue in &dataset.issues {
                debug!(row = issue.row, field = %issue.field, raw = %issue.raw, "schema mismatch");
            }
        }
        info!(record_count = dataset.len(), "dataset loaded");

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                path.to_path_buf(),
                CacheEntry {
                    fingerprint,
                    kind: schema.kind,
                    dataset: Arc::clone(&dataset),
                },
            );
        Ok(dataset)
    }
}

/// Converts untyped rows into typed records according to `schema`.
///
/// A required field missing from the header, or blank in every row, fails the
/// whole load. A numeric cell that cannot be parsed only degrades that cell
/// to `NaN` and is reported in [`Dataset::issues`].
pub fn coerce_table(table: &CsvTable, schema: &DatasetSchema) -> Result<Dataset> {
    for spec in schema.required_fields() {
        let Some(idx) = table.column_index(&spec.name) else {
            return Err(DashError::SchemaMismatch {
                field: spec.name.clone(),
                detail: "column missing from header".to_string(),
            });
        };
        if !table.rows.is_empty() && table.rows.iter().all(|row| row[idx].is_empty()) {
            return Err(DashError::SchemaMismatch {
                field: spec.name.clone(),
                detail: "no record has a value".to_string(),
            });
        }
    }

    let kinds: Vec<FieldKind> = table
        .headers
        .iter()
        .map(|header| {
            schema
                .field(header)
                .map_or(FieldKind::Categorical, |spec| spec.kind)
        })
        .collect();

    let mut records = Vec::with_capacity(table.rows.len());
    let mut issues = Vec::new();
    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut record = Record::new();
        for ((header, kind), cell) in table.headers.iter().zip(&kinds).zip(row) {
            if header.is_empty() {
                continue;
            }
            let value = match kind {
                FieldKind::Categorical if cell.is_empty() => Value::Missing,
                FieldKind::Categorical => Value::Text(cell.clone()),
                FieldKind::Numeric => match normalize_numeric(cell) {
                    NumericCell::Value(v) => Value::Number(v),
                    NumericCell::Missing => Value::Missing,
                    NumericCell::Invalid => {
                        issues.push(LoadIssue {
                            row: row_idx + 1,
                            field: header.clone(),
                            raw: cell.clone(),
                        });
                        Value::Number(f64::NAN)
                    }
                },
            };
            record.insert(header.clone(), value);
        }
        records.push(record);
    }

    let mut dataset = Dataset::new(schema.clone(), records);
    dataset.issues = issues;
    Ok(dataset)
}
