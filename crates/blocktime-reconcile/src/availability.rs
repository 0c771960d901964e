//! Availability normalization.
//!
//! Duplicate (service, month, year) rows are summed, then the wide weekday
//! columns are reshaped into one slot per weekday.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use blocktime_model::{AvailabilityRecord, AvailabilitySlot, MonthlyAvailability, Weekday};

type MonthKey = (String, i32, u32);

fn add(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

/// Sums duplicate rows per (service, month, year).
///
/// Rows missing any key are dropped. A weekday stays `None` only when every
/// contributing row left it empty. Such a weekday produces no slot, so cases
/// on that day get no `Total Hours` rather than a zero-hour block; a
/// null-skipping group sum would report `0.0` there instead. Output is sorted
/// by (service, year, month).
pub fn aggregate_availability(records: &[AvailabilityRecord]) -> Vec<MonthlyAvailability> {
    let mut months: BTreeMap<MonthKey, MonthlyAvailability> = BTreeMap::new();

    for record in records {
        let (Some(service), Some(month), Some(year)) =
            (record.service.as_ref(), record.month, record.year)
        else {
            continue;
        };
        let entry = months
            .entry((service.clone(), year, month))
            .or_insert_with(|| MonthlyAvailability {
                service: service.clone(),
                month,
                year,
                hours: [None; 5],
                sum: None,
            });
        for (total, value) in entry.hours.iter_mut().zip(record.hours) {
            *total = add(*total, value);
        }
        entry.sum = add(entry.sum, record.sum);
    }

    months.into_values().collect()
}

/// Reshapes monthly rows to one slot per weekday, skipping empty weekdays.
///
/// Output is sorted by (service, year, month, weekday) with weekdays in
/// calendar order.
pub fn to_slots(monthly: &[MonthlyAvailability]) -> Vec<AvailabilitySlot> {
    let mut slots: Vec<AvailabilitySlot> = monthly
        .iter()
        .flat_map(|month| {
            Weekday::ALL.into_iter().filter_map(move |weekday| {
                month.hours_for(weekday).map(|hours| AvailabilitySlot {
                    service: month.service.clone(),
                    month: month.month,
                    year: month.year,
                    weekday,
                    hours,
                })
            })
        })
        .collect();
    slots.sort_by(|a, b| {
        (&a.service, a.year, a.month, a.weekday).cmp(&(&b.service, b.year, b.month, b.weekday))
    });
    slots
}

/// Availability in both shapes, produced once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedAvailability {
    pub monthly: Vec<MonthlyAvailability>,
    pub slots: Vec<AvailabilitySlot>,
}

impl NormalizedAvailability {
    /// Builds a lookup of slot hours keyed by (service, month, year, weekday).
    pub fn index(&self) -> AvailabilityIndex {
        AvailabilityIndex {
            hours: self
                .slots
                .iter()
                .map(|slot| {
                    (
                        (slot.service.clone(), slot.month, slot.year, slot.weekday),
                        slot.hours,
                    )
                })
                .collect(),
        }
    }

    /// Monthly row for a service, if scheduled.
    pub fn month(&self, service: &str, month: u32, year: i32) -> Option<&MonthlyAvailability> {
        self.monthly
            .iter()
            .find(|row| row.service == service && row.month == month && row.year == year)
    }
}

/// Runs both normalization steps.
pub fn normalize_availability(records: &[AvailabilityRecord]) -> NormalizedAvailability {
    let span = tracing::info_span!("normalize_availability", rows = records.len());
    let _guard = span.enter();
    let start = Instant::now();

    let monthly = aggregate_availability(records);
    let slots = to_slots(&monthly);

    tracing::debug!(
        months = monthly.len(),
        slots = slots.len(),
        duration_ms = start.elapsed().as_millis(),
        "normalized availability"
    );
    NormalizedAvailability { monthly, slots }
}

/// Slot hours keyed by (service, month, year, weekday).
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    hours: HashMap<(String, u32, i32, Weekday), f64>,
}

impl AvailabilityIndex {
    pub fn hours(&self, service: &str, month: u32, year: i32, weekday: Weekday) -> Option<f64> {
        self.hours
            .get(&(service.to_string(), month, year, weekday))
            .copied()
    }
}
