//! Postcode store error types.

use std::path::PathBuf;
use std::sync::Arc;

/// Errors reading or writing the library and missing-cache files.
///
/// None of these are recovered locally: a broken store aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid CSV or a row doesn't match `postcode,lat,lon`
    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Row parsed but holds unusable data
    #[error("invalid record in {} at line {line}: {reason}", .path.display())]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// A load failure observed by several callers at once
    #[error(transparent)]
    Shared(Arc<StoreError>),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.into(),
            source,
        }
    }
}
