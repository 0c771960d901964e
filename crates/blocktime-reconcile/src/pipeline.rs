//! The reconciliation pipeline.
//!
//! Joins cases to the surgeon roster and the specialty dictionary, resolves
//! each case's specialty, applies the override rules, then matches the case
//! against normalized availability. Every run recomputes from the full raw
//! tables; nothing carries over between runs.

use std::collections::HashMap;
use std::time::Instant;

use blocktime_common::round_to;
use blocktime_ingest::{
    Decoded, IngestError, decode_availability, decode_cases, decode_dictionary, decode_roster,
};
use blocktime_model::{
    AvailabilityRecord, CaseRecord, DatasetKind, DictionaryRecord, FactRecord, FactTable,
    ReconcileError, ReconcileOptions, ReconcileResult, RowIssue, RowIssueKind, Specialty,
    SurgeonRecord, columns,
};
use chrono::Datelike;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::availability::{NormalizedAvailability, normalize_availability};
use crate::classifier::{classify_division, is_classified_department};
use crate::dictionary::{DictionaryLookup, resolve_dictionary};
use crate::overrides::{OverrideRule, apply_overrides};
use crate::session::RawTables;
use crate::timestamp::TimestampParser;

/// Decimal places kept for `TotalPtHours`.
const PATIENT_HOURS_PRECISION: i32 = 6;

/// Decoded inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileInputs {
    pub cases: Vec<CaseRecord>,
    /// Non-standard case columns, in upload order.
    pub case_columns: Vec<String>,
    pub roster: Vec<SurgeonRecord>,
    pub dictionary: Vec<DictionaryRecord>,
    pub availability: Vec<AvailabilityRecord>,
}

/// Counts describing how a run matched its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub cases: usize,
    pub roster_matches: usize,
    pub division_matches: usize,
    pub dictionary_primary_matches: usize,
    pub dictionary_secondary_matches: usize,
    pub undefined: usize,
    pub robot_overrides: usize,
    pub burn_overrides: usize,
    pub unparsed_timestamps: usize,
    pub availability_matches: usize,
    pub ambiguous_dictionary_names: usize,
    pub duplicate_roster_names: usize,
}

/// Output of a successful run: the fact table and the normalized side tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub facts: FactTable,
    pub availability: NormalizedAvailability,
    pub stats: ReconcileStats,
    pub issues: Vec<RowIssue>,
}

/// A roster surgeon in a classified department.
#[derive(Debug, Clone)]
struct RosterEntry {
    surgeon: String,
    department: String,
    division: Option<String>,
    division_specialty: &'static str,
}

/// Builds the full-name → surgeon lookup. The first row for a name wins.
fn index_roster(roster: &[SurgeonRecord]) -> (HashMap<String, RosterEntry>, usize) {
    let mut index = HashMap::new();
    let mut duplicates = 0;

    for surgeon in roster {
        let Some(department) = surgeon.department.as_deref() else {
            continue;
        };
        if !is_classified_department(department) {
            continue;
        }
        let Some(name) = surgeon.full_name() else {
            continue;
        };
        if index.contains_key(&name) {
            duplicates += 1;
            continue;
        }
        let entry = RosterEntry {
            surgeon: name.clone(),
            department: department.to_string(),
            division: surgeon.division.clone(),
            division_specialty: classify_division(department, surgeon.division.as_deref()),
        };
        index.insert(name, entry);
    }
    (index, duplicates)
}

/// Where the base specialty came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialtySource {
    Division,
    DictionaryPrimary,
    DictionarySecondary,
    Unresolved,
}

/// Precedence: roster division, then first synonym, then second synonym.
fn base_specialty(
    case: &CaseRecord,
    roster: Option<&RosterEntry>,
    dictionary: &DictionaryLookup,
) -> (Specialty, SpecialtySource) {
    if let Some(entry) = roster.filter(|entry| entry.division.is_some()) {
        return (
            Specialty::new(entry.division_specialty),
            SpecialtySource::Division,
        );
    }
    let raw = case.surgical_specialty.as_deref();
    if let Some(code) = raw
        .and_then(|name| dictionary.primary(name))
        .and_then(|entry| entry.candidate())
    {
        return (code, SpecialtySource::DictionaryPrimary);
    }
    if let Some(code) = raw
        .and_then(|name| dictionary.secondary(name))
        .and_then(|entry| entry.candidate())
    {
        return (code, SpecialtySource::DictionarySecondary);
    }
    (Specialty::undefined(), SpecialtySource::Unresolved)
}

/// Reconciles already-decoded inputs. Never fails; malformed cells are
/// reported as issues and leave their derived fields empty.
pub fn reconcile_records(inputs: &ReconcileInputs, options: &ReconcileOptions) -> Reconciliation {
    let (roster, duplicate_roster_names) = index_roster(&inputs.roster);
    let dictionary = resolve_dictionary(&inputs.dictionary);
    let availability = normalize_availability(&inputs.availability);
    let slots = availability.index();
    let parser = TimestampParser::new(options.timestamp_format.as_str());

    let mut stats = ReconcileStats {
        cases: inputs.cases.len(),
        ambiguous_dictionary_names: dictionary.ambiguous_names().len(),
        duplicate_roster_names,
        ..ReconcileStats::default()
    };
    let mut issues = Vec::new();
    let mut records = Vec::with_capacity(inputs.cases.len());

    for (idx, case) in inputs.cases.iter().enumerate() {
        let entry = case
            .primary_surgeon
            .as_deref()
            .and_then(|name| roster.get(name));

        let (base, source) = base_specialty(case, entry, &dictionary);
        match source {
            SpecialtySource::Division => stats.division_matches += 1,
            SpecialtySource::DictionaryPrimary => stats.dictionary_primary_matches += 1,
            SpecialtySource::DictionarySecondary => stats.dictionary_secondary_matches += 1,
            SpecialtySource::Unresolved => {}
        }

        let outcome = apply_overrides(case, base, options);
        match outcome.rule {
            Some(OverrideRule::RobotAssisted) => stats.robot_overrides += 1,
            Some(OverrideRule::BurnReclassification) => stats.burn_overrides += 1,
            None => {}
        }
        let specialty = outcome.specialty;
        if specialty.is_undefined() {
            stats.undefined += 1;
        }

        let timestamp = case
            .patient_in_room
            .as_deref()
            .and_then(|raw| parser.parse(raw));
        if timestamp.is_none() {
            stats.unparsed_timestamps += 1;
            if let Some(raw) = case.patient_in_room.as_deref() {
                issues.push(RowIssue::new(
                    DatasetKind::Cases,
                    idx + 1,
                    columns::PATIENT_IN_ROOM,
                    raw,
                    RowIssueKind::UnparseableTimestamp,
                ));
            }
        }
        let case_start_date = timestamp.map(|ts| ts.date());
        let month = case_start_date.map(|date| date.month());
        let year = case_start_date.map(|date| date.year());

        let total_hours = match (month, year, case.weekday()) {
            (Some(month), Some(year), Some(weekday)) => {
                slots.hours(specialty.as_str(), month, year, weekday)
            }
            _ => None,
        };
        if total_hours.is_some() {
            stats.availability_matches += 1;
        }
        if entry.is_some() {
            stats.roster_matches += 1;
        }

        records.push(FactRecord {
            case: case.clone(),
            surgeon: entry.map(|e| e.surgeon.clone()),
            department: entry.map(|e| e.department.clone()),
            division: entry.and_then(|e| e.division.clone()),
            division_specialty: entry.map(|e| e.division_specialty.to_string()),
            specialty,
            case_start_date,
            month,
            year,
            total_hours,
            total_pt_hours: case
                .patient_hours()
                .map(|hours| round_to(hours, PATIENT_HOURS_PRECISION)),
        });
    }

    Reconciliation {
        facts: FactTable::new(inputs.case_columns.clone(), records),
        availability,
        stats,
        issues,
    }
}

fn decode_stage<T>(
    kind: DatasetKind,
    tables: &RawTables,
    decode: impl FnOnce(&DataFrame) -> Result<Decoded<T>, IngestError>,
    issues: &mut Vec<RowIssue>,
) -> ReconcileResult<Decoded<T>> {
    let span = tracing::info_span!("decode", dataset = kind.label());
    let _guard = span.enter();
    let frame = table(tables, kind)?;
    let mut decoded = decode(frame)
        .map_err(|e| ReconcileError::processing(format!("decode {}", kind.label()), e))?;
    tracing::debug!(
        rows = frame.height(),
        issues = decoded.issues.len(),
        "decoded dataset"
    );
    issues.append(&mut decoded.issues);
    Ok(decoded)
}

fn table(tables: &RawTables, kind: DatasetKind) -> ReconcileResult<&DataFrame> {
    tables
        .get(kind)
        .ok_or_else(|| ReconcileError::MissingInputs {
            missing: vec![kind],
        })
}

/// Runs the pipeline on the raw uploaded tables.
///
/// Fails with [`ReconcileError::MissingInputs`] when any of the four
/// datasets is absent, and with [`ReconcileError::Processing`] when a table
/// cannot be decoded. No partial result is returned.
pub fn reconcile(tables: &RawTables, options: &ReconcileOptions) -> ReconcileResult<Reconciliation> {
    let span = tracing::info_span!("reconcile");
    let _guard = span.enter();
    let start = Instant::now();

    let missing = tables.missing();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "reconciliation requested with missing datasets");
        return Err(ReconcileError::MissingInputs { missing });
    }

    let mut issues = Vec::new();
    let cases = decode_stage(DatasetKind::Cases, tables, decode_cases, &mut issues)?;
    let roster = decode_stage(DatasetKind::Roster, tables, decode_roster, &mut issues)?;
    let availability = decode_stage(DatasetKind::Availability, tables, decode_availability, &mut issues)?;
    let dictionary = decode_stage(DatasetKind::Dictionary, tables, decode_dictionary, &mut issues)?;

    let inputs = ReconcileInputs {
        cases: cases.records,
        case_columns: cases.extra_columns,
        roster: roster.records,
        dictionary: dictionary.records,
        availability: availability.records,
    };
    let mut result = reconcile_records(&inputs, options);
    issues.append(&mut result.issues);
    result.issues = issues;

    tracing::info!(
        cases = result.stats.cases,
        roster_matches = result.stats.roster_matches,
        undefined = result.stats.undefined,
        availability_matches = result.stats.availability_matches,
        issues = result.issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "reconciliation complete"
    );
    Ok(result)
}
