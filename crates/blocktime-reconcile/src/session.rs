//! Session state: the current raw uploads and the current working dataset.
//!
//! Both slots are replaced wholesale and never mutated in place. A failed
//! run leaves the previous working dataset untouched, and a run that has
//! been superseded by a newer one is discarded when it completes.

use std::collections::BTreeMap;
use std::sync::Arc;

use blocktime_ingest::decode_availability;
use blocktime_model::{
    DatasetKind, FactTable, ReconcileError, ReconcileOptions, ReconcileResult, RowIssue,
};
use polars::prelude::DataFrame;

use crate::availability::{NormalizedAvailability, normalize_availability};
use crate::pipeline::{Reconciliation, reconcile};

/// The raw uploaded tables, one slot per dataset.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    tables: BTreeMap<DatasetKind, DataFrame>,
}

impl RawTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a table, returning the one it replaces.
    pub fn insert(&mut self, kind: DatasetKind, df: DataFrame) -> Option<DataFrame> {
        self.tables.insert(kind, df)
    }

    pub fn with(mut self, kind: DatasetKind, df: DataFrame) -> Self {
        self.insert(kind, df);
        self
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&DataFrame> {
        self.tables.get(&kind)
    }

    /// Datasets not yet uploaded, in upload order.
    pub fn missing(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|kind| !self.tables.contains_key(kind))
            .collect()
    }
}

/// The fact table reports are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkingDataset {
    /// Output of a reconciliation run.
    Reconciled(Reconciliation),
    /// A previously exported fact table uploaded in place of a run.
    Replaced(FactTable),
}

impl WorkingDataset {
    pub fn facts(&self) -> &FactTable {
        match self {
            WorkingDataset::Reconciled(run) => &run.facts,
            WorkingDataset::Replaced(facts) => facts,
        }
    }

    /// Normalized availability from the run, if this dataset came from one.
    pub fn availability(&self) -> Option<&NormalizedAvailability> {
        match self {
            WorkingDataset::Reconciled(run) => Some(&run.availability),
            WorkingDataset::Replaced(_) => None,
        }
    }
}

/// Identifies one reconciliation run within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

/// What happened to a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The run became the working dataset.
    Published,
    /// A newer run or replacement started after this one; its result was dropped.
    Superseded,
}

/// One user's session.
#[derive(Debug, Default)]
pub struct Session {
    raw: RawTables,
    working: Option<Arc<WorkingDataset>>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an upload in its slot.
    pub fn upload(&mut self, kind: DatasetKind, df: DataFrame) {
        self.raw.insert(kind, df);
    }

    pub fn raw(&self) -> &RawTables {
        &self.raw
    }

    pub fn working(&self) -> Option<Arc<WorkingDataset>> {
        self.working.clone()
    }

    /// Starts a run; any run started earlier becomes stale.
    pub fn begin_run(&mut self) -> RunTicket {
        self.generation += 1;
        RunTicket {
            generation: self.generation,
        }
    }

    /// Publishes a run result if its ticket is still current.
    ///
    /// Errors are returned unchanged and leave the working dataset as it was.
    pub fn commit(
        &mut self,
        ticket: RunTicket,
        result: ReconcileResult<Reconciliation>,
    ) -> ReconcileResult<CommitOutcome> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding superseded run"
            );
            return Ok(CommitOutcome::Superseded);
        }
        let run = result?;
        self.working = Some(Arc::new(WorkingDataset::Reconciled(run)));
        Ok(CommitOutcome::Published)
    }

    /// Runs reconciliation on the current raw tables and publishes the result.
    pub fn reconcile(&mut self, options: &ReconcileOptions) -> ReconcileResult<Arc<WorkingDataset>> {
        let ticket = self.begin_run();
        let result = reconcile(&self.raw, options);
        self.commit(ticket, result)?;
        self.working.clone().ok_or_else(|| {
            ReconcileError::processing("publish", "no working dataset after a successful run")
        })
    }

    /// Replaces the working dataset with an uploaded fact table, bypassing
    /// the pipeline. In-flight runs become stale.
    pub fn replace_working(&mut self, facts: FactTable) -> Arc<WorkingDataset> {
        self.generation += 1;
        let working = Arc::new(WorkingDataset::Replaced(facts));
        self.working = Some(Arc::clone(&working));
        working
    }

    /// Normalized availability for reporting: the current run's copy, or the
    /// raw availability upload when the working dataset was replaced.
    pub fn availability(&self) -> ReconcileResult<(NormalizedAvailability, Vec<RowIssue>)> {
        if let Some(normalized) = self.working.as_ref().and_then(|w| w.availability()) {
            return Ok((normalized.clone(), Vec::new()));
        }
        let Some(df) = self.raw.get(DatasetKind::Availability) else {
            return Err(ReconcileError::MissingInputs {
                missing: vec![DatasetKind::Availability],
            });
        };
        let decoded = decode_availability(df).map_err(|e| {
            ReconcileError::processing(format!("decode {}", DatasetKind::Availability.label()), e)
        })?;
        Ok((normalize_availability(&decoded.records), decoded.issues))
    }
}
