//! Data model for operating-room block-time utilization.
//!
//! This crate holds the typed records that flow between ingestion,
//! reconciliation and reporting:
//!
//! - [`records`]: case, roster, dictionary, availability and fact rows
//! - [`specialty`]: the normalized specialty code and the known codes
//! - [`weekday`]: the five scheduling weekdays in calendar order
//! - [`dataset`]: the four uploaded datasets and their column names
//! - [`options`]: reconciliation and workbook options loaded from config
//! - [`error`]: run-level errors and per-row issues

pub mod dataset;
pub mod error;
pub mod options;
pub mod records;
pub mod specialty;
pub mod weekday;

pub use dataset::{DatasetKind, columns};
pub use error::{ReconcileError, ReconcileResult, RowIssue, RowIssueKind};
pub use options::{BlocktimeConfig, ReconcileOptions, SheetNames};
pub use records::{
    AvailabilityRecord, AvailabilitySlot, CaseRecord, DictionaryRecord, FactRecord, FactTable,
    MonthlyAvailability, SurgeonRecord,
};
pub use specialty::{ROBOT_PREFIX, Specialty, codes};
pub use weekday::{UnknownWeekday, Weekday};

/// Timestamp layout used when a workbook cell already holds a date/time.
pub const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date layout used for the derived `Case Start Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
