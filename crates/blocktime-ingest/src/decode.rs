//! Frame → typed record decoding.
//!
//! Decoding fails only when a required column is absent. A malformed cell
//! leaves its field empty and is reported as a [`RowIssue`].

use blocktime_common::{NumericCell, any_to_i64, any_to_text, numeric_cell};
use blocktime_model::{
    AvailabilityRecord, CaseRecord, DATE_FORMAT, DatasetKind, DictionaryRecord, FactRecord,
    FactTable, RowIssue, RowIssueKind, Specialty, SurgeonRecord, Weekday, columns,
};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Records decoded from one table, with any cell-level problems found.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    /// Columns carried through untyped (cases and facts only).
    pub extra_columns: Vec<String>,
    pub issues: Vec<RowIssue>,
}

impl Decoded<FactRecord> {
    pub fn into_table(self) -> (FactTable, Vec<RowIssue>) {
        (FactTable::new(self.extra_columns, self.records), self.issues)
    }
}

struct Decoder<'a> {
    df: &'a DataFrame,
    dataset: DatasetKind,
    issues: Vec<RowIssue>,
}

impl<'a> Decoder<'a> {
    fn new(df: &'a DataFrame, dataset: DatasetKind) -> Self {
        Self {
            df,
            dataset,
            issues: Vec::new(),
        }
    }

    fn required(&self, name: &str) -> Result<&'a Column> {
        self.df
            .column(name)
            .map_err(|_| IngestError::missing_column(self.dataset, name))
    }

    fn optional(&self, name: &str) -> Option<&'a Column> {
        self.df.column(name).ok()
    }

    fn extra_columns(&self, known: &[&str]) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .filter(|name| !known.contains(&name.as_str()))
            .map(|name| name.to_string())
            .collect()
    }

    fn text(column: &Column, idx: usize) -> Option<String> {
        any_to_text(column.get(idx).unwrap_or(AnyValue::Null))
    }

    fn report(&mut self, idx: usize, column: &Column, value: String, kind: RowIssueKind) {
        self.issues.push(RowIssue::new(
            self.dataset,
            idx + 1,
            column.name().as_str(),
            value,
            kind,
        ));
    }

    fn number(&mut self, column: &Column, idx: usize) -> Option<f64> {
        match numeric_cell(column.get(idx).unwrap_or(AnyValue::Null)) {
            NumericCell::Missing => None,
            NumericCell::Value(v) => Some(v),
            NumericCell::Invalid(raw) => {
                self.report(idx, column, raw, RowIssueKind::NotNumeric);
                None
            }
        }
    }

    /// Like [`Decoder::number`], but negative values are also rejected.
    fn hours(&mut self, column: &Column, idx: usize) -> Option<f64> {
        let value = self.number(column, idx)?;
        if value < 0.0 {
            self.report(idx, column, value.to_string(), RowIssueKind::NegativeHours);
            return None;
        }
        Some(value)
    }

    fn integer(&mut self, column: &Column, idx: usize) -> Option<i64> {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        let raw = Self::text(column, idx)?;
        let parsed = any_to_i64(value);
        if parsed.is_none() {
            self.report(idx, column, raw, RowIssueKind::NotNumeric);
        }
        parsed
    }

    fn month(&mut self, column: &Column, idx: usize) -> Option<u32> {
        let value = self.integer(column, idx)?;
        match u32::try_from(value) {
            Ok(month) if (1..=12).contains(&month) => Some(month),
            _ => {
                self.report(idx, column, value.to_string(), RowIssueKind::NotNumeric);
                None
            }
        }
    }

    fn year(&mut self, column: &Column, idx: usize) -> Option<i32> {
        let value = self.integer(column, idx)?;
        match i32::try_from(value) {
            Ok(year) => Some(year),
            Err(_) => {
                self.report(idx, column, value.to_string(), RowIssueKind::NotNumeric);
                None
            }
        }
    }

    fn finish<T>(self, records: Vec<T>, extra_columns: Vec<String>) -> Decoded<T> {
        tracing::debug!(
            dataset = %self.dataset,
            records = records.len(),
            issues = self.issues.len(),
            "decoded"
        );
        Decoded {
            records,
            extra_columns,
            issues: self.issues,
        }
    }
}

struct CaseColumns<'a> {
    surgeon: &'a Column,
    specialty: &'a Column,
    procedure: &'a Column,
    in_room: &'a Column,
    start_day: &'a Column,
    minutes: &'a Column,
    extra: Vec<(String, &'a Column)>,
}

impl<'a> CaseColumns<'a> {
    fn resolve(decoder: &Decoder<'a>, extra_columns: &[String]) -> Result<Self> {
        let mut extra = Vec::with_capacity(extra_columns.len());
        for name in extra_columns {
            extra.push((name.clone(), decoder.required(name)?));
        }
        Ok(Self {
            surgeon: decoder.required(columns::PRIMARY_SURGEON)?,
            specialty: decoder.required(columns::SURGICAL_SPECIALTY)?,
            procedure: decoder.required(columns::PRIMARY_PROCEDURE)?,
            in_room: decoder.required(columns::PATIENT_IN_ROOM)?,
            start_day: decoder.required(columns::CASE_START_DAY)?,
            minutes: decoder.required(columns::PATIENT_IN_ROOM_MINUTES)?,
            extra,
        })
    }

    fn read(&self, decoder: &mut Decoder<'_>, idx: usize) -> CaseRecord {
        CaseRecord {
            primary_surgeon: Decoder::text(self.surgeon, idx),
            surgical_specialty: Decoder::text(self.specialty, idx),
            primary_procedure: Decoder::text(self.procedure, idx),
            patient_in_room: Decoder::text(self.in_room, idx),
            case_start_day: Decoder::text(self.start_day, idx),
            patient_in_room_minutes: decoder.number(self.minutes, idx),
            extra: self
                .extra
                .iter()
                .filter_map(|(name, column)| {
                    Decoder::text(column, idx).map(|value| (name.clone(), value))
                })
                .collect(),
        }
    }
}

/// Case and derived column names; anything else in a case table is an extra.
fn reserved_columns() -> Vec<&'static str> {
    columns::CASE_FIELDS
        .iter()
        .chain(columns::FACT_FIELDS.iter())
        .copied()
        .collect()
}

/// Decodes the elective cases table.
///
/// Uploaded columns named like a derived field are dropped; reconciliation
/// recomputes them.
pub fn decode_cases(df: &DataFrame) -> Result<Decoded<CaseRecord>> {
    let mut decoder = Decoder::new(df, DatasetKind::Cases);
    let extra_columns = decoder.extra_columns(&reserved_columns());
    let cols = CaseColumns::resolve(&decoder, &extra_columns)?;

    let records: Vec<CaseRecord> = (0..df.height())
        .map(|idx| cols.read(&mut decoder, idx))
        .collect();
    Ok(decoder.finish(records, extra_columns))
}

/// Decodes the surgeon roster. `MI` is optional.
pub fn decode_roster(df: &DataFrame) -> Result<Decoded<SurgeonRecord>> {
    let decoder = Decoder::new(df, DatasetKind::Roster);
    let last = decoder.required(columns::LAST_NAME)?;
    let first = decoder.required(columns::FIRST_NAME)?;
    let middle = decoder.optional(columns::MIDDLE_INITIAL);
    let department = decoder.required(columns::DEPARTMENT)?;
    let division = decoder.required(columns::DIVISION)?;

    let records: Vec<SurgeonRecord> = (0..df.height())
        .map(|idx| SurgeonRecord {
            last_name: Decoder::text(last, idx),
            first_name: Decoder::text(first, idx),
            middle_initial: middle.and_then(|column| Decoder::text(column, idx)),
            department: Decoder::text(department, idx),
            division: Decoder::text(division, idx),
        })
        .collect();
    Ok(decoder.finish(records, Vec::new()))
}

/// Decodes the specialty dictionary sheet.
pub fn decode_dictionary(df: &DataFrame) -> Result<Decoded<DictionaryRecord>> {
    let decoder = Decoder::new(df, DatasetKind::Dictionary);
    let name = decoder.required(columns::RAW_NAME)?;
    let selection = decoder.required(columns::SELECTION)?;
    let abbreviation = decoder.required(columns::ABBREVIATION)?;
    let service = decoder.required(columns::SERVICE)?;

    let records: Vec<DictionaryRecord> = (0..df.height())
        .map(|idx| DictionaryRecord {
            name: Decoder::text(name, idx),
            selection: Decoder::text(selection, idx),
            abbreviation: Decoder::text(abbreviation, idx),
            service: Decoder::text(service, idx),
        })
        .collect();
    Ok(decoder.finish(records, Vec::new()))
}

/// Decodes the availability summary sheet. `Sum` is optional.
pub fn decode_availability(df: &DataFrame) -> Result<Decoded<AvailabilityRecord>> {
    let mut decoder = Decoder::new(df, DatasetKind::Availability);
    let service = decoder.required(columns::SERVICES)?;
    let month = decoder.required(columns::MONTH)?;
    let year = decoder.required(columns::YEAR)?;
    let sum = decoder.optional(columns::SUM);
    let mut weekdays = Vec::with_capacity(Weekday::ALL.len());
    for day in Weekday::ALL {
        weekdays.push(decoder.required(day.as_str())?);
    }

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut hours = [None; 5];
        for (slot, column) in hours.iter_mut().zip(&weekdays) {
            *slot = decoder.hours(column, idx);
        }
        records.push(AvailabilityRecord {
            service: Decoder::text(service, idx),
            month: decoder.month(month, idx),
            year: decoder.year(year, idx),
            hours,
            sum: sum.and_then(|column| decoder.hours(column, idx)),
        });
    }
    Ok(decoder.finish(records, Vec::new()))
}

/// Decodes a previously exported fact table.
///
/// The case columns plus `Specialty`, `Month` and `Year` are required; the
/// other derived columns are read when present.
pub fn decode_facts(df: &DataFrame) -> Result<Decoded<FactRecord>> {
    let mut decoder = Decoder::new(df, DatasetKind::Cases);
    let extra_columns = decoder.extra_columns(&reserved_columns());
    let cols = CaseColumns::resolve(&decoder, &extra_columns)?;

    let specialty = decoder.required(columns::SPECIALTY)?;
    let month = decoder.required(columns::MONTH)?;
    let year = decoder.required(columns::YEAR)?;
    let surgeon = decoder.optional(columns::SURGEON);
    let department = decoder.optional(columns::DEPARTMENT);
    let division = decoder.optional(columns::DIVISION);
    let division_specialty = decoder.optional(columns::DIVISION_SPECIALTY);
    let start_date = decoder.optional(columns::CASE_START_DATE);
    let total_hours = decoder.optional(columns::TOTAL_HOURS);
    let total_pt_hours = decoder.optional(columns::TOTAL_PT_HOURS);

    let text_at = |column: Option<&Column>, idx: usize| {
        column.and_then(|column| Decoder::text(column, idx))
    };

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let case = cols.read(&mut decoder, idx);
        records.push(FactRecord {
            case,
            surgeon: text_at(surgeon, idx),
            department: text_at(department, idx),
            division: text_at(division, idx),
            division_specialty: text_at(division_specialty, idx),
            specialty: Specialty::new(&Decoder::text(specialty, idx).unwrap_or_default()),
            case_start_date: text_at(start_date, idx).and_then(|text| parse_date(&text)),
            month: decoder.month(month, idx),
            year: decoder.year(year, idx),
            total_hours: total_hours.and_then(|column| decoder.number(column, idx)),
            total_pt_hours: total_pt_hours.and_then(|column| decoder.number(column, idx)),
        });
    }
    Ok(decoder.finish(records, extra_columns))
}

/// Parses `2024-08-01`, ignoring any time part.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let date = text.trim().get(..10)?;
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        let cols: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| Column::new(name.into(), values))
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn test_decode_roster_optional_middle_initial() {
        let df = frame(vec![
            ("Last Name", vec![Some("Reyes")]),
            ("First Name", vec![Some("Ana")]),
            ("Department1", vec![Some("SURGERY")]),
            ("Division1", vec![None]),
        ]);
        let decoded = decode_roster(&df).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].middle_initial, None);
        assert_eq!(decoded.records[0].division, None);
    }

    #[test]
    fn test_decode_roster_missing_column() {
        let df = frame(vec![("Last Name", vec![Some("Reyes")])]);
        let err = decode_roster(&df).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn { ref column, .. } if column == "First Name"
        ));
    }

    #[test]
    fn test_decode_availability_flags_bad_cells() {
        let df = frame(vec![
            ("Services", vec![Some("URO"), Some("GYN")]),
            ("Month", vec![Some("8"), Some("Aug")]),
            ("Year", vec![Some("2024"), Some("2024")]),
            ("Monday", vec![Some("8"), Some("-4")]),
            ("Tuesday", vec![Some("closed"), None]),
            ("Wednesday", vec![None, None]),
            ("Thursday", vec![None, None]),
            ("Friday", vec![Some("4.5"), None]),
        ]);
        let decoded = decode_availability(&df).unwrap();

        let uro = &decoded.records[0];
        assert_eq!(uro.month, Some(8));
        assert_eq!(uro.hours_for(Weekday::Monday), Some(8.0));
        assert_eq!(uro.hours_for(Weekday::Tuesday), None);
        assert_eq!(uro.hours_for(Weekday::Friday), Some(4.5));
        assert_eq!(uro.sum, None);

        let gyn = &decoded.records[1];
        assert_eq!(gyn.month, None);
        assert_eq!(gyn.hours_for(Weekday::Monday), None);

        let kinds: Vec<_> = decoded.issues.iter().map(|i| (i.row, i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, RowIssueKind::NotNumeric),
                (2, RowIssueKind::NegativeHours),
                (2, RowIssueKind::NotNumeric),
            ]
        );
    }

    #[test]
    fn test_decode_cases_keeps_extra_columns() {
        let df = frame(vec![
            ("Room", vec![Some("OR 4")]),
            ("Primary Surgeon", vec![Some("Reyes, Ana")]),
            ("Surgical Specialty", vec![Some("Urology")]),
            ("Primary Procedure", vec![Some("Cystoscopy")]),
            ("Patient In Room Date/Time", vec![Some("08/01/24 07:28")]),
            ("Case Start Day", vec![Some("Thursday")]),
            ("Total Patient In Room Minutes", vec![Some("95")]),
        ]);
        let decoded = decode_cases(&df).unwrap();
        assert_eq!(decoded.extra_columns, vec!["Room".to_string()]);
        let case = &decoded.records[0];
        assert_eq!(case.extra.get("Room").map(String::as_str), Some("OR 4"));
        assert_eq!(case.patient_in_room_minutes, Some(95.0));
        assert!(decoded.issues.is_empty());
    }

    #[test]
    fn test_decode_cases_drops_derived_column_names() {
        let df = frame(vec![
            ("Room", vec![Some("OR 4")]),
            ("Month", vec![Some("July")]),
            ("Specialty", vec![Some("URO")]),
            ("Primary Surgeon", vec![Some("Reyes, Ana")]),
            ("Surgical Specialty", vec![Some("Urology")]),
            ("Primary Procedure", vec![Some("Cystoscopy")]),
            ("Patient In Room Date/Time", vec![Some("08/01/24 07:28")]),
            ("Case Start Day", vec![Some("Thursday")]),
            ("Total Patient In Room Minutes", vec![Some("95")]),
            ("Department1", vec![Some("SURGERY")]),
        ]);
        let decoded = decode_cases(&df).unwrap();
        assert_eq!(decoded.extra_columns, vec!["Room".to_string()]);
        assert_eq!(decoded.records[0].extra.len(), 1);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-08-01 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 8, 1)
        );
        assert_eq!(parse_date("2024-08-01"), NaiveDate::from_ymd_opt(2024, 8, 1));
        assert_eq!(parse_date("08/01/24"), None);
    }
}
