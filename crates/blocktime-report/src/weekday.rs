//! Patient hours against available hours per weekday.
//!
//! Each side is aggregated on its own before the two are joined, so a
//! weekday with availability but no cases (or cases but no availability)
//! still appears, with zero on the missing side.

use std::collections::BTreeMap;

use blocktime_model::{FactTable, Weekday};
use blocktime_reconcile::NormalizedAvailability;
use serde::Serialize;

use crate::filter::ReportFilter;
use crate::utilization::utilization_rate;

/// One (specialty, month, year, weekday) cell of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayComparison {
    pub specialty: String,
    pub month: u32,
    pub year: i32,
    pub weekday: Weekday,
    pub patient_hours: f64,
    pub available_hours: f64,
    pub utilization_rate: Option<f64>,
}

/// Totals for one weekday across the filtered comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayTotal {
    pub weekday: Weekday,
    pub patient_hours: f64,
    pub available_hours: f64,
    pub utilization_rate: Option<f64>,
}

type CellKey = (String, i32, u32, Weekday);

/// Full join of case hours and available hours per weekday.
///
/// Cases whose `Case Start Day` is not a scheduling weekday, or whose date
/// did not parse, are left out. Ordered by (specialty, year, month, weekday).
pub fn weekday_comparison(
    facts: &FactTable,
    availability: &NormalizedAvailability,
    filter: &ReportFilter,
) -> Vec<WeekdayComparison> {
    let mut cells: BTreeMap<CellKey, (f64, f64)> = BTreeMap::new();

    for record in facts.records.iter().filter(|r| filter.matches_fact(r)) {
        let (Some((year, month)), Some(weekday)) = (record.period(), record.case.weekday()) else {
            continue;
        };
        let key = (record.specialty.to_string(), year, month, weekday);
        cells.entry(key).or_default().0 += record.case.patient_hours().unwrap_or(0.0);
    }

    for slot in availability.slots.iter().filter(|slot| {
        filter.matches_specialty(&slot.service) && filter.matches_period(slot.year, slot.month)
    }) {
        let key = (slot.service.clone(), slot.year, slot.month, slot.weekday);
        cells.entry(key).or_default().1 += slot.hours;
    }

    cells
        .into_iter()
        .map(
            |((specialty, year, month, weekday), (patient_hours, available_hours))| {
                WeekdayComparison {
                    specialty,
                    month,
                    year,
                    weekday,
                    patient_hours,
                    available_hours,
                    utilization_rate: utilization_rate(patient_hours, Some(available_hours)),
                }
            },
        )
        .collect()
}

/// Rolls the comparison up to exactly five rows, Monday through Friday.
pub fn weekday_totals(cells: &[WeekdayComparison]) -> Vec<WeekdayTotal> {
    Weekday::ALL
        .into_iter()
        .map(|weekday| {
            let (patient_hours, available_hours) = cells
                .iter()
                .filter(|cell| cell.weekday == weekday)
                .fold((0.0, 0.0), |(p, a), cell| {
                    (p + cell.patient_hours, a + cell.available_hours)
                });
            WeekdayTotal {
                weekday,
                patient_hours,
                available_hours,
                utilization_rate: utilization_rate(patient_hours, Some(available_hours)),
            }
        })
        .collect()
}
