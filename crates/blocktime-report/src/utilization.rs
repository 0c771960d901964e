//! Monthly and per-specialty utilization.
//!
//! Rates are always hours-summed-then-divided; a rate over a group is never
//! the mean of its members' rates, except in [`rank_specialties`], which
//! ranks specialties by their mean monthly rate.

use std::collections::BTreeMap;

use blocktime_model::{FactTable, Specialty};
use blocktime_reconcile::NormalizedAvailability;
use serde::Serialize;

use crate::filter::ReportFilter;

/// `patient / available * 100`, or `None` when nothing was available.
///
/// # Examples
///
/// ```
/// use blocktime_report::utilization_rate;
///
/// assert_eq!(utilization_rate(30.0, Some(40.0)), Some(75.0));
/// assert_eq!(utilization_rate(30.0, Some(0.0)), None);
/// assert_eq!(utilization_rate(30.0, None), None);
/// ```
pub fn utilization_rate(patient_hours: f64, available_hours: Option<f64>) -> Option<f64> {
    match available_hours {
        Some(available) if available > 0.0 => Some(patient_hours / available * 100.0),
        _ => None,
    }
}

/// Mean of the defined values, or `None` when there are none.
pub fn mean_defined(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn add(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

/// Patient and available hours for one specialty in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyMonthUtilization {
    pub specialty: Specialty,
    pub month: u32,
    pub year: i32,
    pub patient_hours: f64,
    pub available_hours: Option<f64>,
    pub utilization_rate: Option<f64>,
}

/// Groups facts by (specialty, month, year) and matches monthly availability.
///
/// Patient hours are the summed case minutes over 60. Available hours come
/// from the availability `Sum`, or the weekday total when `Sum` is absent.
/// The period filter is applied after rates are computed. Rows are ordered
/// by (specialty, year, month).
pub fn specialty_month_utilization(
    facts: &FactTable,
    availability: &NormalizedAvailability,
    filter: &ReportFilter,
) -> Vec<SpecialtyMonthUtilization> {
    let mut minutes: BTreeMap<(Specialty, i32, u32), f64> = BTreeMap::new();
    for record in &facts.records {
        let Some((year, month)) = record.period() else {
            continue;
        };
        *minutes
            .entry((record.specialty.clone(), year, month))
            .or_default() += record.case.patient_in_room_minutes.unwrap_or(0.0);
    }

    minutes
        .into_iter()
        .map(|((specialty, year, month), minutes)| {
            let patient_hours = minutes / 60.0;
            let available_hours = availability
                .month(specialty.as_str(), month, year)
                .and_then(|row| row.available_hours());
            SpecialtyMonthUtilization {
                utilization_rate: utilization_rate(patient_hours, available_hours),
                specialty,
                month,
                year,
                patient_hours,
                available_hours,
            }
        })
        .filter(|row| filter.matches_period(row.year, row.month))
        .collect()
}

/// Utilization for one month across all specialties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyUtilization {
    pub month: u32,
    pub year: i32,
    pub patient_hours: f64,
    pub available_hours: Option<f64>,
    pub utilization_rate: Option<f64>,
}

/// Sums specialty rows per month, then divides. Ordered chronologically.
pub fn monthly_utilization(rows: &[SpecialtyMonthUtilization]) -> Vec<MonthlyUtilization> {
    let mut months: BTreeMap<(i32, u32), (f64, Option<f64>)> = BTreeMap::new();
    for row in rows {
        let entry = months.entry((row.year, row.month)).or_insert((0.0, None));
        entry.0 += row.patient_hours;
        entry.1 = add(entry.1, row.available_hours);
    }
    months
        .into_iter()
        .map(|((year, month), (patient_hours, available_hours))| MonthlyUtilization {
            month,
            year,
            patient_hours,
            available_hours,
            utilization_rate: utilization_rate(patient_hours, available_hours),
        })
        .collect()
}

/// Summed patient hours over summed available hours across all rows.
pub fn total_utilization(rows: &[SpecialtyMonthUtilization]) -> Option<f64> {
    let patient: f64 = rows.iter().map(|row| row.patient_hours).sum();
    let available = rows
        .iter()
        .fold(None, |total, row| add(total, row.available_hours));
    utilization_rate(patient, available)
}

/// Mean of the defined monthly rates.
pub fn mean_monthly_rate(monthly: &[MonthlyUtilization]) -> Option<f64> {
    mean_defined(monthly.iter().map(|row| row.utilization_rate))
}

/// A specialty's mean monthly utilization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyRank {
    pub specialty: Specialty,
    pub mean_rate: Option<f64>,
}

/// Ranks specialties by mean monthly rate, highest first.
///
/// Undefined means sort last. Ties keep specialty order (the sort is stable).
pub fn rank_specialties(rows: &[SpecialtyMonthUtilization]) -> Vec<SpecialtyRank> {
    let mut groups: BTreeMap<&Specialty, Vec<Option<f64>>> = BTreeMap::new();
    for row in rows {
        groups.entry(&row.specialty).or_default().push(row.utilization_rate);
    }
    let mut ranking: Vec<SpecialtyRank> = groups
        .into_iter()
        .map(|(specialty, rates)| SpecialtyRank {
            specialty: specialty.clone(),
            mean_rate: mean_defined(rates),
        })
        .collect();
    ranking.sort_by(|a, b| match (a.mean_rate, b.mean_rate) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ranking
}

/// The `n` highest-ranked specialties with a defined rate.
pub fn top_specialties(ranking: &[SpecialtyRank], n: usize) -> Vec<SpecialtyRank> {
    ranking
        .iter()
        .filter(|rank| rank.mean_rate.is_some())
        .take(n)
        .cloned()
        .collect()
}

/// The `n` lowest-ranked specialties with a defined rate, lowest first.
pub fn bottom_specialties(ranking: &[SpecialtyRank], n: usize) -> Vec<SpecialtyRank> {
    let mut defined: Vec<SpecialtyRank> = ranking
        .iter()
        .filter(|rank| rank.mean_rate.is_some())
        .cloned()
        .collect();
    defined.sort_by(|a, b| {
        let (x, y) = (a.mean_rate.unwrap_or_default(), b.mean_rate.unwrap_or_default());
        x.total_cmp(&y)
    });
    defined.truncate(n);
    defined
}
