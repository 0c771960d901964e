//! Error types for spreadsheet ingestion.

use std::path::PathBuf;

use blocktime_model::DatasetKind;
use thiserror::Error;

/// Errors that can occur while loading or decoding an upload.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension is not one of the supported spreadsheet formats.
    #[error("unsupported file format '{extension}': {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Named sheet not present in the workbook.
    #[error("sheet '{sheet}' not found in {path} (available: {})", .available.join(", "))]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    /// Sheet or file has no header row.
    #[error("no data in {path}")]
    EmptyTable { path: PathBuf },

    // === Decoding Errors ===
    /// Required column not found in an uploaded table.
    #[error("required column '{column}' not found in {dataset} data")]
    MissingColumn { dataset: String, column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub fn missing_column(dataset: DatasetKind, column: &str) -> Self {
        Self::MissingColumn {
            dataset: dataset.label().to_string(),
            column: column.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/uploads/roster.xlsx"),
        };
        assert_eq!(err.to_string(), "file not found: /uploads/roster.xlsx");
    }

    #[test]
    fn test_sheet_not_found_lists_available() {
        let err = IngestError::SheetNotFound {
            path: PathBuf::from("time.xlsm"),
            sheet: "Dictionary".into(),
            available: vec!["Summary by Each Month".into(), "Notes".into()],
        };
        assert_eq!(
            err.to_string(),
            "sheet 'Dictionary' not found in time.xlsm (available: Summary by Each Month, Notes)"
        );
    }

    #[test]
    fn test_missing_column_names_dataset() {
        let err = IngestError::missing_column(DatasetKind::Roster, "Division1");
        assert_eq!(
            err.to_string(),
            "required column 'Division1' not found in Surgeon Roster data"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Month".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
