//! Loading uploads from disk into a session.

use std::fs;
use std::path::{Path, PathBuf};

use blocktime_cli::inputs::{UploadPaths, load_facts, load_uploads, sheet_for};
use blocktime_model::{DatasetKind, ReconcileError, ReconcileOptions, SheetNames};
use blocktime_reconcile::{Session, WorkingDataset};
use blocktime_report::export_facts;
use rust_xlsxwriter::Workbook;

const CASES: &str = "\
Primary Surgeon,Surgical Specialty,Primary Procedure,Patient In Room Date/Time,Case Start Day,Total Patient In Room Minutes
\"Reyes, Ana L\",General,Robotic colectomy,08/05/24 07:28,Monday,100
\"Lind, Maja\",Urology,Cystoscopy,08/07/24 09:15,Wednesday,45
";

const ROSTER: &str = "\
Last Name,First Name,MI,Department1,Division1
Reyes,Ana,L,SURGERY,Colorectal
Lind,Maja,,UROLOGY,
";

const AVAILABILITY: &str = "\
Services,Month,Year,Monday,Tuesday,Wednesday,Thursday,Friday,Sum
ROT-CRS,8,2024,10,,,,,10
URO,8,2024,,,4,,,4
URO,8,2024,,,4,,,4
";

const DICTIONARY: &str = "\
Name from Raw Data,Selection,Abbreviation,Service
Urology/Uro,V,URO,Urology
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn write_available_time(path: &Path) {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary by Each Month").unwrap();
        let headers = [
            "Services",
            "Month",
            "Year",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Sum",
        ];
        for (col, header) in (0u16..).zip(headers) {
            sheet.write_string(0, col, header).unwrap();
        }
        let rows = [("ROT-CRS", 3u16, 10.0), ("URO", 5, 4.0), ("URO", 5, 4.0)];
        for (row, (service, weekday_col, hours)) in (1u32..).zip(rows) {
            sheet.write_string(row, 0, service).unwrap();
            sheet.write_number(row, 1, 8.0).unwrap();
            sheet.write_number(row, 2, 2024.0).unwrap();
            sheet.write_number(row, weekday_col, hours).unwrap();
            sheet.write_number(row, 8, hours).unwrap();
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Dictionary").unwrap();
        let rows = [
            ["Name from Raw Data", "Selection", "Abbreviation", "Service"],
            ["Urology/Uro", "V", "URO", "Urology"],
        ];
        for (row, values) in (0u32..).zip(rows) {
            for (col, value) in (0u16..).zip(values) {
                sheet.write_string(row, col, value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

fn assert_reconciled(session: &mut Session) {
    let working = session.reconcile(&ReconcileOptions::default()).unwrap();
    let WorkingDataset::Reconciled(run) = working.as_ref() else {
        panic!("expected a reconciliation run");
    };
    let specialties: Vec<&str> = run
        .facts
        .records
        .iter()
        .map(|r| r.specialty.as_str())
        .collect();
    assert_eq!(specialties, vec!["ROT-CRS", "URO"]);
    let hours: Vec<Option<f64>> = run.facts.records.iter().map(|r| r.total_hours).collect();
    assert_eq!(hours, vec![Some(10.0), Some(8.0)]);
}

#[test]
fn available_time_workbook_supplies_both_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let available_time = dir.path().join("available_time.xlsx");
    write_available_time(&available_time);
    let paths = UploadPaths {
        cases: Some(write(dir.path(), "cases.csv", CASES)),
        roster: Some(write(dir.path(), "roster.csv", ROSTER)),
        available_time: Some(available_time),
        ..Default::default()
    };

    let mut session = Session::new();
    let loaded = load_uploads(&mut session, &paths, &SheetNames::default()).unwrap();
    assert_eq!(loaded, 4);
    assert!(session.raw().missing().is_empty());
    assert_reconciled(&mut session);
}

#[test]
fn separate_csv_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let paths = UploadPaths {
        cases: Some(write(dir.path(), "cases.csv", CASES)),
        roster: Some(write(dir.path(), "roster.csv", ROSTER)),
        availability: Some(write(dir.path(), "summary.csv", AVAILABILITY)),
        dictionary: Some(write(dir.path(), "dictionary.csv", DICTIONARY)),
        ..Default::default()
    };

    let mut session = Session::new();
    load_uploads(&mut session, &paths, &SheetNames::default()).unwrap();
    assert_reconciled(&mut session);
}

#[test]
fn missing_uploads_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = UploadPaths {
        cases: Some(write(dir.path(), "cases.csv", CASES)),
        roster: Some(write(dir.path(), "roster.csv", ROSTER)),
        ..Default::default()
    };

    let mut session = Session::new();
    load_uploads(&mut session, &paths, &SheetNames::default()).unwrap();
    let error = session.reconcile(&ReconcileOptions::default()).unwrap_err();
    assert_eq!(
        error,
        ReconcileError::MissingInputs {
            missing: vec![DatasetKind::Availability, DatasetKind::Dictionary]
        }
    );
    assert_eq!(error.to_string(), "missing data: dm, dic");
    assert!(session.working().is_none());
}

#[test]
fn available_time_must_be_a_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let paths = UploadPaths {
        available_time: Some(write(dir.path(), "available_time.csv", AVAILABILITY)),
        ..Default::default()
    };

    let mut session = Session::new();
    let error = load_uploads(&mut session, &paths, &SheetNames::default()).unwrap_err();
    assert!(error.to_string().starts_with("load Available Time"));
}

#[test]
fn exported_facts_replace_the_working_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let paths = UploadPaths {
        cases: Some(write(dir.path(), "cases.csv", CASES)),
        roster: Some(write(dir.path(), "roster.csv", ROSTER)),
        availability: Some(write(dir.path(), "summary.csv", AVAILABILITY)),
        dictionary: Some(write(dir.path(), "dictionary.csv", DICTIONARY)),
        ..Default::default()
    };
    let mut session = Session::new();
    load_uploads(&mut session, &paths, &SheetNames::default()).unwrap();
    let working = session.reconcile(&ReconcileOptions::default()).unwrap();
    let export = dir.path().join("processed_data.xlsx");
    export_facts(working.facts(), &export).unwrap();

    let (facts, issues) = load_facts(&export).unwrap();
    assert!(issues.is_empty());
    assert_eq!(facts.len(), working.facts().len());
    assert_eq!(facts.column_names(), working.facts().column_names());

    let replaced = session.replace_working(facts);
    assert!(matches!(replaced.as_ref(), WorkingDataset::Replaced(_)));
    let (availability, _) = session.availability().unwrap();
    assert_eq!(availability.monthly.len(), 2);
}

#[test]
fn sheet_selection_per_dataset() {
    let sheets = SheetNames::default();
    assert_eq!(sheet_for(DatasetKind::Cases, &sheets), None);
    assert_eq!(
        sheet_for(DatasetKind::Availability, &sheets),
        Some("Summary by Each Month")
    );
    assert_eq!(sheet_for(DatasetKind::Dictionary, &sheets), Some("Dictionary"));
}
