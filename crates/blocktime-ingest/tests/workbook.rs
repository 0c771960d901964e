//! Loads workbooks authored with rust_xlsxwriter.

use std::path::Path;

use blocktime_ingest::{
    IngestError, decode_availability, decode_cases, decode_dictionary, load_available_time,
    load_table, sheet_names,
};
use blocktime_model::{SheetNames, Weekday};
use polars::prelude::DataType;
use rust_xlsxwriter::{Format, Workbook};
use tempfile::TempDir;

fn write_available_time(path: &Path) {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary by Each Month").unwrap();
    let headers = [
        "Services", "Month", "Year", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday",
        "Sum",
    ];
    for (col, header) in headers.iter().enumerate() {
        summary.write_string(0, col as u16, *header).unwrap();
    }
    summary.write_string(1, 0, "URO").unwrap();
    let values = [8.0, 2024.0, 16.0, 8.0, 0.0, 8.0, 8.0, 40.0];
    for (offset, value) in values.iter().enumerate() {
        summary.write_number(1, offset as u16 + 1, *value).unwrap();
    }

    let dictionary = workbook.add_worksheet();
    dictionary.set_name("Dictionary").unwrap();
    for (col, header) in ["Name from Raw Data", "Selection", "Abbreviation", "Service"]
        .iter()
        .enumerate()
    {
        dictionary.write_string(0, col as u16, *header).unwrap();
    }
    let row = ["Urology/Uro", "V", "URO", "Urology"];
    for (col, value) in row.iter().enumerate() {
        dictionary.write_string(1, col as u16, *value).unwrap();
    }

    workbook.save(path).unwrap();
}

#[test]
fn test_available_time_sheets_by_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("available_time.xlsx");
    write_available_time(&path);

    assert_eq!(
        sheet_names(&path).unwrap(),
        vec!["Summary by Each Month".to_string(), "Dictionary".to_string()]
    );

    let [(_, summary), (_, dictionary)] =
        load_available_time(&path, &SheetNames::default()).unwrap();
    assert_eq!(summary.column("Monday").unwrap().dtype(), &DataType::Float64);

    let availability = decode_availability(&summary).unwrap();
    let uro = &availability.records[0];
    assert_eq!(uro.service.as_deref(), Some("URO"));
    assert_eq!(uro.month, Some(8));
    assert_eq!(uro.year, Some(2024));
    assert_eq!(uro.hours_for(Weekday::Monday), Some(16.0));
    assert_eq!(uro.sum, Some(40.0));

    let dictionary = decode_dictionary(&dictionary).unwrap();
    assert_eq!(dictionary.records[0].name.as_deref(), Some("Urology/Uro"));
}

#[test]
fn test_missing_sheet_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("available_time.xlsx");
    write_available_time(&path);

    let sheets = SheetNames {
        dictionary: "Lookup".to_string(),
        ..SheetNames::default()
    };
    let err = load_available_time(&path, &sheets).unwrap_err();
    assert!(matches!(err, IngestError::SheetNotFound { ref sheet, .. } if sheet == "Lookup"));
}

#[test]
fn test_case_timestamps_from_date_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cases.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = [
        "Primary Surgeon",
        "Surgical Specialty",
        "Primary Procedure",
        "Patient In Room Date/Time",
        "Case Start Day",
        "Total Patient In Room Minutes",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    sheet.write_string(1, 0, "Reyes, Ana").unwrap();
    sheet.write_string(1, 1, "Urology").unwrap();
    sheet.write_string(1, 2, "Cystoscopy").unwrap();
    sheet
        .write_number_with_format(1, 3, 45505.3125, &date_format)
        .unwrap();
    sheet.write_string(1, 4, "Thursday").unwrap();
    sheet.write_number(1, 5, 95.0).unwrap();
    workbook.save(&path).unwrap();

    let df = load_table(&path, None).unwrap();
    let cases = decode_cases(&df).unwrap();
    let case = &cases.records[0];
    assert_eq!(case.patient_in_room.as_deref(), Some("2024-08-01 07:30:00"));
    assert_eq!(case.patient_in_room_minutes, Some(95.0));
}

#[test]
fn test_missing_file() {
    let err = load_table(Path::new("/no/such/roster.xlsx"), None).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
