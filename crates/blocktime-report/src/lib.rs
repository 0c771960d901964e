//! Utilization metrics and fact-table export.
//!
//! Every table here is a read-only summary derived from the working fact
//! table and the normalized availability. Nothing is cached between calls.
//!
//! # Module Organization
//!
//! - [`utilization`]: specialty/month rates, monthly series, ranking
//! - [`weekday`]: patient vs available hours per weekday
//! - [`cases`]: surgeon statistics and patient-minute distributions
//! - [`overview`]: the assembled overview and specialty reports
//! - [`export`]: CSV and XLSX export of the fact table

pub mod cases;
pub mod error;
pub mod export;
pub mod filter;
pub mod overview;
pub mod utilization;
pub mod weekday;

// === Error Types ===
pub use error::{ExportError, Result};

// === Filters ===
pub use filter::ReportFilter;

// === Metrics ===
pub use cases::{MinutesDistribution, SurgeonStats, minutes_distribution, surgeon_stats};
pub use utilization::{
    MonthlyUtilization, SpecialtyMonthUtilization, SpecialtyRank, bottom_specialties,
    mean_defined, mean_monthly_rate, monthly_utilization, rank_specialties,
    specialty_month_utilization, top_specialties, total_utilization, utilization_rate,
};
pub use weekday::{WeekdayComparison, WeekdayTotal, weekday_comparison, weekday_totals};

// === Reports ===
pub use overview::{
    FilterOptions, Overview, RANKING_SLICE, SpecialtyReport, build_overview,
    build_specialty_report, filter_options,
};

// === Export ===
pub use export::{
    DEFAULT_EXPORT_FILE, EXPORT_SHEET, ExportFormat, export_facts, fact_frame, write_csv,
    write_xlsx,
};
