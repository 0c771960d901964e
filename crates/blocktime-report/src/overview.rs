//! Report assemblies over the working dataset.
//!
//! [`build_overview`] backs the department-wide view and
//! [`build_specialty_report`] the per-specialty view. Both are pure functions
//! of the fact table, the normalized availability and a [`ReportFilter`].

use blocktime_model::{FactTable, Specialty};
use blocktime_reconcile::NormalizedAvailability;
use serde::Serialize;
use tracing::debug;

use crate::cases::{MinutesDistribution, SurgeonStats, minutes_distribution, surgeon_stats};
use crate::filter::ReportFilter;
use crate::utilization::{
    MonthlyUtilization, SpecialtyMonthUtilization, SpecialtyRank, bottom_specialties,
    mean_monthly_rate, monthly_utilization, rank_specialties, specialty_month_utilization,
    top_specialties, total_utilization,
};
use crate::weekday::{WeekdayComparison, WeekdayTotal, weekday_comparison, weekday_totals};

/// Number of specialties in the top and bottom slices of the ranking.
pub const RANKING_SLICE: usize = 5;

/// Department-wide utilization summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub specialty_months: Vec<SpecialtyMonthUtilization>,
    pub monthly: Vec<MonthlyUtilization>,
    pub mean_monthly_rate: Option<f64>,
    pub total_rate: Option<f64>,
    pub ranking: Vec<SpecialtyRank>,
    pub top: Vec<SpecialtyRank>,
    pub bottom: Vec<SpecialtyRank>,
}

/// Builds the overview. Only the year and month filters are consulted.
pub fn build_overview(
    facts: &FactTable,
    availability: &NormalizedAvailability,
    filter: &ReportFilter,
) -> Overview {
    let specialty_months = specialty_month_utilization(facts, availability, filter);
    let monthly = monthly_utilization(&specialty_months);
    let ranking = rank_specialties(&specialty_months);

    debug!(
        rows = specialty_months.len(),
        months = monthly.len(),
        specialties = ranking.len(),
        "built overview"
    );

    Overview {
        mean_monthly_rate: mean_monthly_rate(&monthly),
        total_rate: total_utilization(&specialty_months),
        top: top_specialties(&ranking, RANKING_SLICE),
        bottom: bottom_specialties(&ranking, RANKING_SLICE),
        specialty_months,
        monthly,
        ranking,
    }
}

/// Weekday, surgeon and case-length views for the filtered specialty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyReport {
    pub filter: ReportFilter,
    pub weekdays: Vec<WeekdayComparison>,
    pub weekday_totals: Vec<WeekdayTotal>,
    pub surgeons: Vec<SurgeonStats>,
    pub distribution: Vec<MinutesDistribution>,
}

pub fn build_specialty_report(
    facts: &FactTable,
    availability: &NormalizedAvailability,
    filter: &ReportFilter,
) -> SpecialtyReport {
    let weekdays = weekday_comparison(facts, availability, filter);
    let weekday_totals = weekday_totals(&weekdays);

    debug!(cells = weekdays.len(), "built specialty report");

    SpecialtyReport {
        filter: filter.clone(),
        weekday_totals,
        weekdays,
        surgeons: surgeon_stats(facts, filter),
        distribution: minutes_distribution(facts, filter),
    }
}

/// Values offered by the report filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub specialties: Vec<Specialty>,
}

/// Sorted distinct years and specialties in the working dataset.
pub fn filter_options(facts: &FactTable) -> FilterOptions {
    FilterOptions {
        years: facts.years(),
        specialties: facts.specialties(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocktime_model::{AvailabilityRecord, CaseRecord, FactRecord};
    use blocktime_reconcile::normalize_availability;

    fn fact(specialty: &str, month: u32, minutes: f64) -> FactRecord {
        let mut record = FactRecord::from_case(CaseRecord {
            primary_surgeon: Some("Lee, Dana".to_string()),
            case_start_day: Some("Tuesday".to_string()),
            patient_in_room_minutes: Some(minutes),
            ..Default::default()
        });
        record.specialty = Specialty::new(specialty);
        record.month = Some(month);
        record.year = Some(2024);
        record
    }

    fn summary(service: &str, month: u32, sum: f64) -> AvailabilityRecord {
        AvailabilityRecord {
            service: Some(service.to_string()),
            month: Some(month),
            year: Some(2024),
            hours: [None, Some(sum), None, None, None],
            sum: Some(sum),
        }
    }

    #[test]
    fn test_overview_sums_before_dividing() {
        let facts = FactTable::new(
            Vec::new(),
            vec![fact("URO", 1, 600.0), fact("URO", 2, 600.0)],
        );
        let availability =
            normalize_availability(&[summary("URO", 1, 20.0), summary("URO", 2, 100.0)]);
        let overview = build_overview(&facts, &availability, &ReportFilter::new());

        let total = overview.total_rate.unwrap();
        assert!((total - 20.0 / 120.0 * 100.0).abs() < 1e-9);
        assert_eq!(overview.monthly.len(), 2);
        let mean = overview.mean_monthly_rate.unwrap();
        assert!((mean - 30.0).abs() < 1e-9);
        assert_eq!(overview.top.len(), 1);
        assert_eq!(overview.bottom.len(), 1);
    }

    #[test]
    fn test_month_filter_applies_to_every_table() {
        let facts = FactTable::new(
            Vec::new(),
            vec![fact("URO", 1, 600.0), fact("URO", 2, 600.0)],
        );
        let availability =
            normalize_availability(&[summary("URO", 1, 20.0), summary("URO", 2, 100.0)]);
        let filter = ReportFilter::new().with_year(2024).with_months([2]);
        let overview = build_overview(&facts, &availability, &filter);

        assert_eq!(overview.specialty_months.len(), 1);
        assert_eq!(overview.monthly[0].month, 2);
        assert!((overview.total_rate.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_specialty_report_filters_by_specialty() {
        let facts = FactTable::new(
            Vec::new(),
            vec![fact("URO", 1, 120.0), fact("GYN", 1, 60.0)],
        );
        let availability =
            normalize_availability(&[summary("URO", 1, 4.0), summary("GYN", 1, 8.0)]);
        let filter = ReportFilter::new().with_specialty(Specialty::new("URO"));
        let report = build_specialty_report(&facts, &availability, &filter);

        assert_eq!(report.weekdays.len(), 1);
        assert_eq!(report.weekdays[0].patient_hours, 2.0);
        assert_eq!(report.weekday_totals[1].utilization_rate, Some(50.0));
        assert_eq!(report.surgeons[0].total_cases, 1);
        assert_eq!(report.distribution.len(), 1);
    }

    #[test]
    fn test_filter_options() {
        let mut undated = fact("CRS", 1, 30.0);
        undated.year = None;
        let facts = FactTable::new(
            Vec::new(),
            vec![fact("URO", 1, 60.0), undated, fact("CRS", 3, 30.0)],
        );
        let options = filter_options(&facts);
        assert_eq!(options.years, vec![2024]);
        assert_eq!(
            options.specialties,
            vec![Specialty::new("CRS"), Specialty::new("URO")]
        );
    }
}
