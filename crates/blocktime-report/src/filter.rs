//! Report filters.

use std::collections::BTreeSet;

use blocktime_model::{FactRecord, Specialty};
use serde::{Deserialize, Serialize};

/// Narrows reports to a year, a set of months and/or one specialty.
///
/// Empty fields select everything. Year and month filters apply to every
/// table after rates are computed; the specialty filter applies to the
/// specialty-level views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub year: Option<i32>,
    pub months: BTreeSet<u32>,
    pub specialty: Option<Specialty>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_months(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.months = months.into_iter().collect();
        self
    }

    pub fn with_specialty(mut self, specialty: Specialty) -> Self {
        self.specialty = Some(specialty);
        self
    }

    /// Whether a (year, month) passes the year and month filters.
    pub fn matches_period(&self, year: i32, month: u32) -> bool {
        self.year.is_none_or(|selected| selected == year)
            && (self.months.is_empty() || self.months.contains(&month))
    }

    pub fn matches_specialty(&self, specialty: &str) -> bool {
        self.specialty
            .as_ref()
            .is_none_or(|selected| selected.as_str() == specialty)
    }

    /// Period and specialty filters applied to a fact row. Rows without a
    /// parsed date only pass when no period filter is set.
    pub fn matches_fact(&self, record: &FactRecord) -> bool {
        let period = match record.period() {
            Some((year, month)) => self.matches_period(year, month),
            None => self.year.is_none() && self.months.is_empty(),
        };
        period && self.matches_specialty(record.specialty.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ReportFilter::new();
        assert!(filter.matches_period(2023, 1));
        assert!(filter.matches_specialty("URO"));
    }

    #[test]
    fn test_year_and_months() {
        let filter = ReportFilter::new().with_year(2024).with_months([7, 8]);
        assert!(filter.matches_period(2024, 8));
        assert!(!filter.matches_period(2024, 9));
        assert!(!filter.matches_period(2023, 8));
    }

    #[test]
    fn test_undated_fact_excluded_by_period_filter() {
        let record = FactRecord::from_case(Default::default());
        assert!(ReportFilter::new().matches_fact(&record));
        assert!(!ReportFilter::new().with_year(2024).matches_fact(&record));
        assert!(
            !ReportFilter::new()
                .with_specialty(Specialty::new("URO"))
                .matches_fact(&record)
        );
    }
}
