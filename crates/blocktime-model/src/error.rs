//! Run-level errors and per-row issues.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::dataset::DatasetKind;

/// Errors that abort a reconciliation run.
///
/// When a run fails, the previous working dataset is left in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// One or more raw datasets have not been uploaded.
    #[error("missing data: {}", join_keys(.missing))]
    MissingInputs { missing: Vec<DatasetKind> },

    /// Any other failure while building the fact table.
    #[error("processing failed during {stage}: {message}")]
    Processing { stage: String, message: String },
}

impl ReconcileError {
    pub fn processing(stage: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Processing {
            stage: stage.into(),
            message: message.to_string(),
        }
    }
}

fn join_keys(kinds: &[DatasetKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

/// Why a single cell could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowIssueKind {
    NotNumeric,
    NegativeHours,
    UnparseableTimestamp,
}

impl RowIssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowIssueKind::NotNumeric => "not numeric",
            RowIssueKind::NegativeHours => "negative hours",
            RowIssueKind::UnparseableTimestamp => "unparseable timestamp",
        }
    }
}

/// A malformed cell. The row is kept and the derived value is left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    pub dataset: DatasetKind,
    /// 1-based data row (header excluded).
    pub row: usize,
    pub column: String,
    pub value: String,
    pub kind: RowIssueKind,
}

impl RowIssue {
    pub fn new(
        dataset: DatasetKind,
        row: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        kind: RowIssueKind,
    ) -> Self {
        Self {
            dataset,
            row,
            column: column.into(),
            value: value.into(),
            kind,
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {}: {} in '{}' ({:?})",
            self.dataset,
            self.row,
            self.kind.as_str(),
            self.column,
            self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_inputs_message() {
        let err = ReconcileError::MissingInputs {
            missing: vec![DatasetKind::Roster, DatasetKind::Dictionary],
        };
        assert_eq!(err.to_string(), "missing data: sg, dic");
    }

    #[test]
    fn test_processing_message() {
        let err = ReconcileError::processing("availability", "no rows");
        assert_eq!(
            err.to_string(),
            "processing failed during availability: no rows"
        );
    }

    #[test]
    fn test_row_issue_display() {
        let issue = RowIssue::new(
            DatasetKind::Cases,
            4,
            "Patient In Room Date/Time",
            "13/45/24",
            RowIssueKind::UnparseableTimestamp,
        );
        assert_eq!(
            issue.to_string(),
            "nu row 4: unparseable timestamp in 'Patient In Room Date/Time' (\"13/45/24\")"
        );
    }
}
