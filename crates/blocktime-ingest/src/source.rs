//! Loading uploads by file type.

use std::path::Path;

use blocktime_model::{DatasetKind, SheetNames};
use polars::prelude::DataFrame;

use crate::csv::read_csv_frame;
use crate::error::{IngestError, Result};
use crate::workbook::read_sheet;

/// Spreadsheet format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Loads a single-table upload. Workbooks use their first sheet unless
/// `sheet` names one; CSV files ignore `sheet`.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Csv => read_csv_frame(path),
        SourceFormat::Workbook => read_sheet(path, sheet),
    }
}

/// Loads the Available Time workbook, returning the availability summary
/// and the specialty dictionary sheets.
pub fn load_available_time(
    path: &Path,
    sheets: &SheetNames,
) -> Result<[(DatasetKind, DataFrame); 2]> {
    if SourceFormat::from_path(path)? != SourceFormat::Workbook {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: "csv (Available Time needs a workbook with named sheets)".to_string(),
        });
    }
    let summary = read_sheet(path, Some(&sheets.summary))?;
    let dictionary = read_sheet(path, Some(&sheets.dictionary))?;
    Ok([
        (DatasetKind::Availability, summary),
        (DatasetKind::Dictionary, dictionary),
    ])
}
