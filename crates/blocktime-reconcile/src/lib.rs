//! Block-time reconciliation.
//!
//! Turns the four raw uploads (elective cases, surgeon roster, availability
//! summary, specialty dictionary) into a per-case fact table with a resolved
//! specialty code and matched available hours.
//!
//! # Module Organization
//!
//! - [`classifier`]: roster department/division decision table
//! - [`dictionary`]: unambiguous name → specialty lookups
//! - [`availability`]: duplicate summing and wide → long reshaping
//! - [`overrides`]: ordered procedure-keyword override rules
//! - [`pipeline`]: the end-to-end run
//! - [`session`]: raw-table and working-dataset slots

pub mod availability;
pub mod classifier;
pub mod dictionary;
pub mod overrides;
pub mod pipeline;
pub mod session;
pub mod timestamp;

pub use availability::{
    AvailabilityIndex, NormalizedAvailability, aggregate_availability, normalize_availability,
    to_slots,
};
pub use classifier::{CLASSIFIED_DEPARTMENTS, classify_division, is_classified_department};
pub use dictionary::{DictionaryEntry, DictionaryLookup, resolve_dictionary};
pub use overrides::{OVERRIDE_RULES, OverrideOutcome, OverrideRule, apply_overrides};
pub use pipeline::{ReconcileInputs, ReconcileStats, Reconciliation, reconcile, reconcile_records};
pub use session::{CommitOutcome, RawTables, RunTicket, Session, WorkingDataset};
pub use timestamp::TimestampParser;
