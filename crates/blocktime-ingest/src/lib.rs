//! Spreadsheet ingestion for block-time reconciliation.
//!
//! This crate loads the uploaded spreadsheets into Polars DataFrames and
//! decodes them into the typed records of `blocktime-model`.
//!
//! # Features
//!
//! - **CSV Loading**: every column read as text, headers trimmed
//! - **Workbook Loading**: XLSX/XLSM/XLS/ODS sheets selected by name via calamine
//! - **Decoding**: per-dataset record decoding with cell-level issue reporting
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use blocktime_ingest::{decode_roster, load_table};
//!
//! let df = load_table(Path::new("uploads/roster.xlsx"), None)?;
//! let roster = decode_roster(&df)?;
//! ```

mod csv;
mod decode;
mod error;
mod source;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use csv::read_csv_frame;
pub use source::{SourceFormat, load_available_time, load_table};
pub use workbook::{excel_serial_to_datetime, read_sheet, sheet_names};

// === Decoding ===
pub use decode::{
    Decoded, decode_availability, decode_cases, decode_dictionary, decode_facts, decode_roster,
};
