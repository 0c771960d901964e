//! Export errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while exporting the fact table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been reconciled or uploaded yet.
    #[error("no data available to export")]
    NoData,

    #[error("unsupported export format '{extension}': {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build export table: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
