//! Error types for writing the result file.

use std::path::PathBuf;

/// Errors that can occur while writing the CSV result file.
///
/// A failed export never leaves a partial file at the destination: rows are
/// written to a temporary file that is only renamed into place once complete.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The destination (or its temporary sibling) could not be created,
    /// written or renamed.
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed to serialize a row.
    #[error("CSV error writing {path}: {source}")]
    Csv {
        /// Destination path
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },
}

impl ExportError {
    /// Create an `Io` error for a destination path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Csv` error for a destination path.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ExportError::Csv {
            path: path.into(),
            source,
        }
    }
}
