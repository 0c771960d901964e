//! Workbook loading (XLSX, XLSM, XLSB, XLS, ODS) via calamine.
//!
//! The first row of a sheet is the header. A column whose non-empty cells
//! are all numeric becomes a `Float64` column; any other column is text.
//! Date/time cells are rendered with [`ISO_TIMESTAMP_FORMAT`].

use std::path::Path;

use blocktime_common::format_numeric;
use blocktime_model::ISO_TIMESTAMP_FORMAT;
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;

use crate::csv::{ensure_exists, normalize_header};
use crate::error::{IngestError, Result};

static EMPTY_CELL: Data = Data::Empty;

/// Lists the sheets of a workbook, in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(workbook.sheet_names())
}

/// Reads one sheet into a DataFrame. `None` selects the first sheet.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    ensure_exists(path)?;
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let available = workbook.sheet_names();
    let name = match sheet {
        Some(name) => available
            .iter()
            .find(|candidate| candidate.as_str() == name)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: name.to_string(),
                available: available.clone(),
            })?,
        None => available
            .first()
            .cloned()
            .ok_or_else(|| IngestError::EmptyTable {
                path: path.to_path_buf(),
            })?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_error(format!("sheet '{name}': {e}")))?;

    let df = range_to_frame(&range).ok_or_else(|| IngestError::EmptyTable {
        path: path.to_path_buf(),
    })??;

    tracing::debug!(
        path = %path.display(),
        sheet = %name,
        rows = df.height(),
        columns = df.width(),
        "loaded sheet"
    );
    Ok(df)
}

/// Converts a cell range to a DataFrame. Returns `None` when there is no header row.
fn range_to_frame(range: &Range<Data>) -> Option<PolarsResult<DataFrame>> {
    let mut rows = range.rows();
    let header = rows.next()?;
    let body: Vec<&[Data]> = rows.collect();

    let columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match header_text(cell) {
                Some(name) => name,
                None => format!("Unnamed: {idx}"),
            };
            let cells = body.iter().map(|row| row.get(idx).unwrap_or(&EMPTY_CELL));
            build_column(&name, cells)
        })
        .collect();

    Some(DataFrame::new(columns))
}

fn header_text(cell: &Data) -> Option<String> {
    cell_text(cell)
        .map(|text| normalize_header(&text))
        .filter(|text| !text.is_empty())
}

fn build_column<'a>(name: &str, cells: impl Iterator<Item = &'a Data> + Clone) -> Column {
    let numeric = cells.clone().all(|cell| {
        matches!(
            cell,
            Data::Empty | Data::Int(_) | Data::Float(_) | Data::Error(_)
        )
    });

    if numeric {
        let values: Vec<Option<f64>> = cells
            .map(|cell| match cell {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells.map(cell_text).collect();
        Column::new(name.into(), values)
    }
}

/// Text rendering of a cell. Blank strings and errors are treated as missing.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(|value| value.format(ISO_TIMESTAMP_FORMAT).to_string()),
        Data::DateTimeIso(s) => Some(s.replace('T', " ")),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Converts an Excel serial date (1900 date system) to a timestamp.
///
/// Serial 1 is 1900-01-01; the fictitious 1900-02-29 makes the effective
/// epoch 1899-12-30 for every date after February 1900.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_serial_to_datetime() {
        // 45505.3125 is 2024-08-01 07:30
        let value = excel_serial_to_datetime(45505.3125).unwrap();
        assert_eq!(
            value.format(ISO_TIMESTAMP_FORMAT).to_string(),
            "2024-08-01 07:30:00"
        );
        assert_eq!(excel_serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(8.0)), Some("8".to_string()));
        assert_eq!(cell_text(&Data::String("  ".into())), None);
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-08-01T07:28:00".into())),
            Some("2024-08-01 07:28:00".to_string())
        );
    }

    #[test]
    fn test_build_column_numeric_and_text() {
        let numeric = [Data::Int(8), Data::Empty, Data::Float(2.5)];
        let column = build_column("Monday", numeric.iter());
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);

        let mixed = [Data::Int(8), Data::String("closed".into())];
        let column = build_column("Tuesday", mixed.iter());
        assert_eq!(column.dtype(), &DataType::String);
    }
}
