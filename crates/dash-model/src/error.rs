use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy shared by every dashboard crate.
#[derive(Debug, Error)]
pub enum DashError {
    /// The resource could not be fetched or parsed at all.
    #[error("data unavailable: {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// A required field is absent, or a value could not be coerced.
    #[error("schema mismatch on field '{field}': {detail}")]
    SchemaMismatch { field: String, detail: String },

    /// The filtered view has no plottable values for the field.
    #[error("no data to plot for '{field}'")]
    EmptyDomain { field: String },

    /// A selection references a value outside its current vocabulary.
    #[error("invalid selection for '{slot}': {value}")]
    InvalidSelection { slot: String, value: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn empty_domain(field: impl Into<String>) -> Self {
        Self::EmptyDomain {
            field: field.into(),
        }
    }

    /// `EmptyDomain` is a terminal rendering case, not a failure.
    pub fn is_empty_domain(&self) -> bool {
        matches!(self, Self::EmptyDomain { .. })
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
