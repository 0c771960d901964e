//! CSV loading.
//!
//! Every column is read as text; typed coercion happens during decoding so
//! that one malformed cell never fails the whole file.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Normalizes a header value: strips a UTF-8 BOM and surrounding whitespace.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Reads a CSV file into a DataFrame of string columns.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    ensure_exists(path)?;

    let csv_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    if df.width() == 0 {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_header(name.as_str()))
        .collect();
    df.set_column_names(names.iter().map(String::as_str))?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Last Name "), "Last Name");
        assert_eq!(normalize_header("  MI"), "MI");
    }

    #[test]
    fn test_read_csv_frame_reads_text() {
        let file = create_temp_csv("Services,Month,Year\nURO,8,2024\nGYN,9,2024\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Month").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_csv_frame_trims_headers() {
        let file = create_temp_csv("\u{feff} Last Name , First Name\nReyes,Ana\n");
        let df = read_csv_frame(file.path()).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["Last Name", "First Name"]);
    }

    #[test]
    fn test_read_csv_frame_missing_file() {
        let result = read_csv_frame(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
