//! Typed rows for the uploaded datasets and the reconciled fact table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::specialty::Specialty;
use crate::weekday::Weekday;

/// One elective surgical case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseRecord {
    pub primary_surgeon: Option<String>,
    /// Free-text specialty as entered by the scheduler.
    pub surgical_specialty: Option<String>,
    pub primary_procedure: Option<String>,
    /// Raw patient-in-room timestamp text.
    pub patient_in_room: Option<String>,
    pub case_start_day: Option<String>,
    pub patient_in_room_minutes: Option<f64>,
    /// Any other columns of the upload, kept as text so exports carry them.
    pub extra: BTreeMap<String, String>,
}

impl CaseRecord {
    /// Patient-in-room time in hours.
    pub fn patient_hours(&self) -> Option<f64> {
        self.patient_in_room_minutes.map(|minutes| minutes / 60.0)
    }

    /// Scheduling weekday of the case, if `Case Start Day` names one.
    pub fn weekday(&self) -> Option<Weekday> {
        self.case_start_day.as_deref().and_then(Weekday::parse)
    }

    /// Whether the procedure text contains `needle`, ignoring case.
    pub fn procedure_mentions(&self, needle: &str) -> bool {
        self.primary_procedure
            .as_deref()
            .is_some_and(|procedure| procedure.to_lowercase().contains(needle))
    }
}

/// One surgeon from the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurgeonRecord {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_initial: Option<String>,
    pub department: Option<String>,
    pub division: Option<String>,
}

impl SurgeonRecord {
    /// Name as it appears in `Primary Surgeon`: `"Last, First MI"`, or
    /// `"Last, First"` without a middle initial.
    ///
    /// Returns `None` when either the last or first name is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktime_model::SurgeonRecord;
    ///
    /// let surgeon = SurgeonRecord {
    ///     last_name: Some("Reyes".into()),
    ///     first_name: Some("Ana".into()),
    ///     middle_initial: Some("L".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(surgeon.full_name().as_deref(), Some("Reyes, Ana L"));
    /// ```
    pub fn full_name(&self) -> Option<String> {
        let last = self.last_name.as_deref()?;
        let first = self.first_name.as_deref()?;
        Some(match self.middle_initial.as_deref() {
            Some(mi) => format!("{last}, {first} {mi}"),
            None => format!("{last}, {first}"),
        })
    }
}

/// One row of the specialty dictionary sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryRecord {
    /// Raw name, possibly two synonyms joined by `/`.
    pub name: Option<String>,
    /// Selection flag; only `V` rows participate.
    pub selection: Option<String>,
    pub abbreviation: Option<String>,
    pub service: Option<String>,
}

/// One row of the availability summary sheet (wide form).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityRecord {
    pub service: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// Hours per weekday, indexed by [`Weekday::index`].
    pub hours: [Option<f64>; 5],
    pub sum: Option<f64>,
}

impl AvailabilityRecord {
    pub fn hours_for(&self, weekday: Weekday) -> Option<f64> {
        self.hours[weekday.index()]
    }
}

/// Availability for one (service, month, year) after duplicates are summed.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAvailability {
    pub service: String,
    pub month: u32,
    pub year: i32,
    pub hours: [Option<f64>; 5],
    pub sum: Option<f64>,
}

impl MonthlyAvailability {
    pub fn hours_for(&self, weekday: Weekday) -> Option<f64> {
        self.hours[weekday.index()]
    }

    /// Total available hours for the month: the `Sum` column when present,
    /// otherwise the sum of the weekday columns.
    pub fn available_hours(&self) -> Option<f64> {
        self.sum.or_else(|| {
            self.hours
                .iter()
                .flatten()
                .copied()
                .reduce(|acc, hours| acc + hours)
        })
    }
}

/// Available hours for one (service, month, year, weekday) in long form.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilitySlot {
    pub service: String,
    pub month: u32,
    pub year: i32,
    pub weekday: Weekday,
    pub hours: f64,
}

/// One reconciled case.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRecord {
    pub case: CaseRecord,
    /// Roster name the case matched, if any.
    pub surgeon: Option<String>,
    pub department: Option<String>,
    pub division: Option<String>,
    /// Specialty derived from the roster department and division.
    pub division_specialty: Option<String>,
    pub specialty: Specialty,
    pub case_start_date: Option<NaiveDate>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// Available hours for the case's specialty, month, year and weekday.
    pub total_hours: Option<f64>,
    pub total_pt_hours: Option<f64>,
}

impl FactRecord {
    /// A fact row carrying only the case fields.
    pub fn from_case(case: CaseRecord) -> Self {
        Self {
            case,
            surgeon: None,
            department: None,
            division: None,
            division_specialty: None,
            specialty: Specialty::undefined(),
            case_start_date: None,
            month: None,
            year: None,
            total_hours: None,
            total_pt_hours: None,
        }
    }

    /// (year, month) when both are known.
    pub fn period(&self) -> Option<(i32, u32)> {
        Some((self.year?, self.month?))
    }
}

/// The reconciled per-case table every report is derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactTable {
    /// Non-standard case columns, in upload order.
    pub extra_columns: Vec<String>,
    pub records: Vec<FactRecord>,
}

impl FactTable {
    pub fn new(extra_columns: Vec<String>, records: Vec<FactRecord>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter_map(|record| record.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct specialties present, ascending.
    pub fn specialties(&self) -> Vec<Specialty> {
        self.records
            .iter()
            .map(|record| record.specialty.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Column names in export order.
    pub fn column_names(&self) -> Vec<String> {
        crate::columns::CASE_FIELDS
            .iter()
            .map(|name| (*name).to_string())
            .chain(self.extra_columns.iter().cloned())
            .chain(
                crate::columns::FACT_FIELDS
                    .iter()
                    .map(|name| (*name).to_string()),
            )
            .collect()
    }
}
