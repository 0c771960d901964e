//! Case-level statistics: per-surgeon counts and patient-minute distributions.

use std::collections::BTreeMap;

use blocktime_model::{FactTable, Specialty};
use serde::Serialize;

use crate::filter::ReportFilter;
use crate::utilization::mean_defined;

/// Case count and mean patient-in-room minutes for one surgeon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurgeonStats {
    pub surgeon: String,
    /// Cases with a `Case Start Day`.
    pub total_cases: usize,
    pub mean_patient_minutes: Option<f64>,
}

#[derive(Default)]
struct SurgeonGroup {
    cases: usize,
    minutes: Vec<Option<f64>>,
}

/// Groups filtered facts by `Primary Surgeon`, ordered by name.
///
/// The mean covers every case of the surgeon; the count skips cases without
/// a start day.
pub fn surgeon_stats(facts: &FactTable, filter: &ReportFilter) -> Vec<SurgeonStats> {
    let mut groups: BTreeMap<&str, SurgeonGroup> = BTreeMap::new();
    for record in facts.records.iter().filter(|r| filter.matches_fact(r)) {
        let Some(surgeon) = record.case.primary_surgeon.as_deref() else {
            continue;
        };
        let group = groups.entry(surgeon).or_default();
        if record.case.case_start_day.is_some() {
            group.cases += 1;
        }
        group.minutes.push(record.case.patient_in_room_minutes);
    }
    groups
        .into_iter()
        .map(|(surgeon, group)| SurgeonStats {
            surgeon: surgeon.to_string(),
            total_cases: group.cases,
            mean_patient_minutes: mean_defined(group.minutes),
        })
        .collect()
}

/// Spread of patient-in-room minutes for one specialty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinutesDistribution {
    pub specialty: Specialty,
    /// Cases with a recorded duration.
    pub cases: usize,
    pub mean_minutes: Option<f64>,
    pub median_minutes: Option<f64>,
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Per-specialty count, mean and median of patient-in-room minutes.
pub fn minutes_distribution(facts: &FactTable, filter: &ReportFilter) -> Vec<MinutesDistribution> {
    let mut groups: BTreeMap<&Specialty, Vec<f64>> = BTreeMap::new();
    for record in facts.records.iter().filter(|r| filter.matches_fact(r)) {
        let entry = groups.entry(&record.specialty).or_default();
        if let Some(minutes) = record.case.patient_in_room_minutes {
            entry.push(minutes);
        }
    }
    groups
        .into_iter()
        .map(|(specialty, mut minutes)| MinutesDistribution {
            specialty: specialty.clone(),
            cases: minutes.len(),
            mean_minutes: mean_defined(minutes.iter().copied().map(Some)),
            median_minutes: median(&mut minutes),
        })
        .collect()
}
