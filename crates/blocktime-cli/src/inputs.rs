//! Loading uploads into a session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blocktime_ingest::{SourceFormat, decode_facts, load_available_time, load_table};
use blocktime_model::{DatasetKind, FactTable, RowIssue, SheetNames};
use blocktime_reconcile::Session;
use polars::prelude::DataFrame;
use tracing::{info, info_span};

/// Paths of the raw uploads. Any of them may be absent; a run reports the
/// missing ones.
#[derive(Debug, Clone, Default)]
pub struct UploadPaths {
    pub cases: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    /// Workbook holding both the summary and the dictionary sheet.
    pub available_time: Option<PathBuf>,
    /// Summary table on its own (CSV, or a workbook's summary sheet).
    pub availability: Option<PathBuf>,
    /// Dictionary table on its own (CSV, or a workbook's dictionary sheet).
    pub dictionary: Option<PathBuf>,
}

/// Sheet to read for a dataset: cases and roster use the first sheet, the
/// Available Time datasets use their configured sheet names.
pub fn sheet_for(kind: DatasetKind, sheets: &SheetNames) -> Option<&str> {
    match kind {
        DatasetKind::Cases | DatasetKind::Roster => None,
        DatasetKind::Availability => Some(sheets.summary.as_str()),
        DatasetKind::Dictionary => Some(sheets.dictionary.as_str()),
    }
}

/// Loads one dataset from a CSV file or workbook.
pub fn load_dataset(kind: DatasetKind, path: &Path, sheets: &SheetNames) -> Result<DataFrame> {
    let sheet = match SourceFormat::from_path(path)? {
        SourceFormat::Csv => None,
        SourceFormat::Workbook => sheet_for(kind, sheets),
    };
    let df = load_table(path, sheet)
        .with_context(|| format!("load {} from {}", kind.label(), path.display()))?;
    info!(
        dataset = %kind,
        rows = df.height(),
        columns = df.width(),
        "loaded upload"
    );
    Ok(df)
}

/// Loads every given upload into the session. Returns how many datasets
/// were stored.
pub fn load_uploads(session: &mut Session, paths: &UploadPaths, sheets: &SheetNames) -> Result<usize> {
    let span = info_span!("upload");
    let _guard = span.enter();
    let mut loaded = 0;

    let single = [
        (DatasetKind::Cases, &paths.cases),
        (DatasetKind::Roster, &paths.roster),
        (DatasetKind::Availability, &paths.availability),
        (DatasetKind::Dictionary, &paths.dictionary),
    ];
    for (kind, path) in single {
        if let Some(path) = path {
            session.upload(kind, load_dataset(kind, path, sheets)?);
            loaded += 1;
        }
    }

    if let Some(path) = &paths.available_time {
        let tables = load_available_time(path, sheets)
            .with_context(|| format!("load Available Time from {}", path.display()))?;
        for (kind, df) in tables {
            info!(dataset = %kind, rows = df.height(), "loaded upload");
            session.upload(kind, df);
            loaded += 1;
        }
    }

    Ok(loaded)
}

/// Loads a previously exported fact table for use as a replacement dataset.
pub fn load_facts(path: &Path) -> Result<(FactTable, Vec<RowIssue>)> {
    let df = load_table(path, None)
        .with_context(|| format!("load fact table from {}", path.display()))?;
    let decoded = decode_facts(&df)
        .with_context(|| format!("decode fact table from {}", path.display()))?;
    let (table, issues) = decoded.into_table();
    info!(rows = table.len(), issues = issues.len(), "loaded fact table");
    Ok((table, issues))
}
