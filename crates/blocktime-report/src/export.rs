//! Fact-table export.
//!
//! The exported file carries the case columns, any extra case columns and
//! the reconciled columns under the same headers the ingest crate reads, so
//! an export can be uploaded again as a replacement dataset.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use blocktime_common::any_to_f64;
use blocktime_model::{DATE_FORMAT, FactRecord, FactTable, columns};
use polars::prelude::{AnyValue, Column, CsvWriter, DataFrame, SerWriter};
use rust_xlsxwriter::{Format, Workbook};
use tracing::{info, info_span};

use crate::error::{ExportError, Result};

/// File name used when no export path is given.
pub const DEFAULT_EXPORT_FILE: &str = "processed_data.xlsx";

/// Worksheet name of the XLSX export.
pub const EXPORT_SHEET: &str = "Processed Data";

/// Export file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(ExportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

fn text_column(
    name: &str,
    table: &FactTable,
    value: impl Fn(&FactRecord) -> Option<String>,
) -> Column {
    let values: Vec<Option<String>> = table.records.iter().map(value).collect();
    Column::new(name.into(), values)
}

fn number_column(
    name: &str,
    table: &FactTable,
    value: impl Fn(&FactRecord) -> Option<f64>,
) -> Column {
    let values: Vec<Option<f64>> = table.records.iter().map(value).collect();
    Column::new(name.into(), values)
}

fn integer_column(
    name: &str,
    table: &FactTable,
    value: impl Fn(&FactRecord) -> Option<i64>,
) -> Column {
    let values: Vec<Option<i64>> = table.records.iter().map(value).collect();
    Column::new(name.into(), values)
}

/// Builds the export frame in [`FactTable::column_names`] order.
pub fn fact_frame(table: &FactTable) -> Result<DataFrame> {
    let mut cols = vec![
        text_column(columns::PRIMARY_SURGEON, table, |r| r.case.primary_surgeon.clone()),
        text_column(columns::SURGICAL_SPECIALTY, table, |r| {
            r.case.surgical_specialty.clone()
        }),
        text_column(columns::PRIMARY_PROCEDURE, table, |r| {
            r.case.primary_procedure.clone()
        }),
        text_column(columns::PATIENT_IN_ROOM, table, |r| r.case.patient_in_room.clone()),
        text_column(columns::CASE_START_DAY, table, |r| r.case.case_start_day.clone()),
        number_column(columns::PATIENT_IN_ROOM_MINUTES, table, |r| {
            r.case.patient_in_room_minutes
        }),
    ];
    for name in &table.extra_columns {
        cols.push(text_column(name, table, |r| r.case.extra.get(name).cloned()));
    }
    cols.extend([
        text_column(columns::SURGEON, table, |r| r.surgeon.clone()),
        text_column(columns::DEPARTMENT, table, |r| r.department.clone()),
        text_column(columns::DIVISION, table, |r| r.division.clone()),
        text_column(columns::DIVISION_SPECIALTY, table, |r| {
            r.division_specialty.clone()
        }),
        text_column(columns::SPECIALTY, table, |r| {
            Some(r.specialty.as_str().to_string())
        }),
        text_column(columns::CASE_START_DATE, table, |r| {
            r.case_start_date
                .map(|date| date.format(DATE_FORMAT).to_string())
        }),
        integer_column(columns::MONTH, table, |r| r.month.map(i64::from)),
        integer_column(columns::YEAR, table, |r| r.year.map(i64::from)),
        number_column(columns::TOTAL_HOURS, table, |r| r.total_hours),
        number_column(columns::TOTAL_PT_HOURS, table, |r| r.total_pt_hours),
    ]);
    Ok(DataFrame::new(cols)?)
}

/// Writes a frame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Writes a frame as a single-sheet workbook with a bold header row.
///
/// Numeric cells are written as numbers and text as strings; nulls are left
/// empty.
pub fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET)?;

    for (col_idx, column) in (0u16..).zip(df.get_columns()) {
        worksheet.write_string_with_format(0, col_idx, column.name().as_str(), &header)?;
        for (row, idx) in (1u32..).zip(0..df.height()) {
            match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => {}
                AnyValue::String(text) => {
                    worksheet.write_string(row, col_idx, text)?;
                }
                AnyValue::StringOwned(text) => {
                    worksheet.write_string(row, col_idx, text.as_str())?;
                }
                other => {
                    if let Some(number) = any_to_f64(other) {
                        worksheet.write_number(row, col_idx, number)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Exports the fact table to `path` as CSV or XLSX.
///
/// An empty table is reported as [`ExportError::NoData`] and nothing is
/// written.
pub fn export_facts(table: &FactTable, path: &Path) -> Result<ExportFormat> {
    let span = info_span!("export", rows = table.len());
    let _guard = span.enter();
    let start = Instant::now();

    if table.is_empty() {
        return Err(ExportError::NoData);
    }
    let format = ExportFormat::from_path(path)?;
    let mut df = fact_frame(table)?;
    match format {
        ExportFormat::Csv => write_csv(&mut df, path)?,
        ExportFormat::Xlsx => write_xlsx(&df, path)?,
    }

    info!(
        format = ?format,
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );
    Ok(format)
}
