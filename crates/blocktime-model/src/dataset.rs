//! Uploaded datasets and their column names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Column headers as they appear in the uploaded spreadsheets and in the
/// exported fact table.
pub mod columns {
    // Elective cases
    pub const PRIMARY_SURGEON: &str = "Primary Surgeon";
    pub const SURGICAL_SPECIALTY: &str = "Surgical Specialty";
    pub const PRIMARY_PROCEDURE: &str = "Primary Procedure";
    pub const PATIENT_IN_ROOM: &str = "Patient In Room Date/Time";
    pub const CASE_START_DAY: &str = "Case Start Day";
    pub const PATIENT_IN_ROOM_MINUTES: &str = "Total Patient In Room Minutes";

    // Surgeon roster
    pub const LAST_NAME: &str = "Last Name";
    pub const FIRST_NAME: &str = "First Name";
    pub const MIDDLE_INITIAL: &str = "MI";
    pub const DEPARTMENT: &str = "Department1";
    pub const DIVISION: &str = "Division1";

    // Specialty dictionary
    pub const RAW_NAME: &str = "Name from Raw Data";
    pub const SELECTION: &str = "Selection";
    pub const ABBREVIATION: &str = "Abbreviation";
    pub const SERVICE: &str = "Service";

    // Availability summary
    pub const SERVICES: &str = "Services";
    pub const MONTH: &str = "Month";
    pub const YEAR: &str = "Year";
    pub const SUM: &str = "Sum";

    // Derived fact columns
    pub const SURGEON: &str = "Surgeon";
    pub const DIVISION_SPECIALTY: &str = "DivAbb";
    pub const SPECIALTY: &str = "Specialty";
    pub const CASE_START_DATE: &str = "Case Start Date";
    pub const TOTAL_HOURS: &str = "Total Hours";
    pub const TOTAL_PT_HOURS: &str = "TotalPtHours";

    /// Case columns read into typed fields, in export order.
    pub const CASE_FIELDS: [&str; 6] = [
        PRIMARY_SURGEON,
        SURGICAL_SPECIALTY,
        PRIMARY_PROCEDURE,
        PATIENT_IN_ROOM,
        CASE_START_DAY,
        PATIENT_IN_ROOM_MINUTES,
    ];

    /// Columns appended by reconciliation, in export order.
    pub const FACT_FIELDS: [&str; 10] = [
        SURGEON,
        DEPARTMENT,
        DIVISION,
        DIVISION_SPECIALTY,
        SPECIALTY,
        CASE_START_DATE,
        MONTH,
        YEAR,
        TOTAL_HOURS,
        TOTAL_PT_HOURS,
    ];
}

/// One of the four raw datasets a reconciliation run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Elective cases.
    Cases,
    /// Surgeon roster.
    Roster,
    /// Available time, summary sheet.
    Availability,
    /// Available time, dictionary sheet.
    Dictionary,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Cases,
        DatasetKind::Roster,
        DatasetKind::Availability,
        DatasetKind::Dictionary,
    ];

    /// Short key used in messages about missing uploads.
    pub fn key(self) -> &'static str {
        match self {
            DatasetKind::Cases => "nu",
            DatasetKind::Roster => "sg",
            DatasetKind::Availability => "dm",
            DatasetKind::Dictionary => "dic",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Cases => "Elective Cases",
            DatasetKind::Roster => "Surgeon Roster",
            DatasetKind::Availability => "Available Time (Summary)",
            DatasetKind::Dictionary => "Available Time (Dictionary)",
        }
    }

    /// Columns that must be present for the dataset to decode.
    pub fn required_columns(self) -> &'static [&'static str] {
        use columns::{
            ABBREVIATION, CASE_START_DAY, DEPARTMENT, DIVISION, FIRST_NAME, LAST_NAME, MONTH,
            PATIENT_IN_ROOM, PATIENT_IN_ROOM_MINUTES, PRIMARY_PROCEDURE, PRIMARY_SURGEON, RAW_NAME,
            SELECTION, SERVICE, SERVICES, SURGICAL_SPECIALTY, YEAR,
        };
        match self {
            DatasetKind::Cases => &[
                PRIMARY_SURGEON,
                SURGICAL_SPECIALTY,
                PRIMARY_PROCEDURE,
                PATIENT_IN_ROOM,
                CASE_START_DAY,
                PATIENT_IN_ROOM_MINUTES,
            ],
            DatasetKind::Roster => &[LAST_NAME, FIRST_NAME, DEPARTMENT, DIVISION],
            DatasetKind::Availability => &[
                SERVICES,
                MONTH,
                YEAR,
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
            ],
            DatasetKind::Dictionary => &[RAW_NAME, SELECTION, ABBREVIATION, SERVICE],
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    /// Accepts either the short key (`nu`) or the long name (`cases`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nu" | "cases" => Ok(DatasetKind::Cases),
            "sg" | "roster" => Ok(DatasetKind::Roster),
            "dm" | "availability" => Ok(DatasetKind::Availability),
            "dic" | "dictionary" => Ok(DatasetKind::Dictionary),
            _ => Err(format!("Unknown dataset: {s}")),
        }
    }
}
