use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use blocktime_cli::inputs::{load_dataset, load_facts, load_uploads};
use blocktime_cli::logging::redact_value;
use blocktime_ingest::{SourceFormat, load_table, sheet_names};
use blocktime_model::{BlocktimeConfig, Specialty};
use blocktime_reconcile::{Session, WorkingDataset};
use blocktime_report::{
    DEFAULT_EXPORT_FILE, ExportError, FilterOptions, Overview, ReportFilter, SpecialtyReport,
    build_overview, build_specialty_report, export_facts, filter_options,
};
use serde::Serialize;
use tracing::{info, info_span, trace, warn};

use crate::cli::{ProcessArgs, ReportArgs, ViewArgs};
use crate::summary::{
    print_frame_preview, print_issues, print_overview, print_specialty_report, print_stats,
};

pub fn run_process(args: &ProcessArgs, config: &BlocktimeConfig) -> Result<()> {
    let span = info_span!("process");
    let _guard = span.enter();
    let start = Instant::now();

    let mut session = Session::new();
    load_uploads(&mut session, &args.uploads.paths(), &config.sheets)?;
    let working = session
        .reconcile(&config.reconcile)
        .context("reconciliation failed")?;
    let WorkingDataset::Reconciled(run) = working.as_ref() else {
        bail!("reconciliation did not produce a run");
    };

    for record in run.facts.records.iter().filter(|r| r.specialty.is_undefined()) {
        if let Some(surgeon) = record.case.primary_surgeon.as_deref() {
            trace!(surgeon = redact_value(surgeon), "no specialty resolved");
        }
    }
    if !run.issues.is_empty() {
        warn!(issues = run.issues.len(), "malformed cells were left empty");
    }

    print_stats(&run.stats, &run.facts);
    print_issues(&run.issues, args.max_issues);

    if args.dry_run {
        println!("Dry run: nothing exported.");
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
        match export_facts(&run.facts, &path) {
            Ok(_) => println!("Exported {} rows to {}", run.facts.len(), path.display()),
            Err(ExportError::NoData) => println!("No data to export."),
            Err(error) => {
                return Err(error).with_context(|| format!("export to {}", path.display()));
            }
        }
    }

    info!(duration_ms = start.elapsed().as_millis(), "process complete");
    Ok(())
}

#[derive(Serialize)]
struct ReportOutput {
    filter_options: FilterOptions,
    overview: Overview,
    specialty: SpecialtyReport,
}

fn report_filter(args: &ReportArgs) -> ReportFilter {
    let mut filter = ReportFilter::new().with_months(args.months.iter().copied());
    if let Some(year) = args.year {
        filter = filter.with_year(year);
    }
    if let Some(code) = &args.specialty {
        filter = filter.with_specialty(Specialty::new(code));
    }
    filter
}

pub fn run_report(args: &ReportArgs, config: &BlocktimeConfig) -> Result<()> {
    let span = info_span!("report");
    let _guard = span.enter();

    let mut session = Session::new();
    load_uploads(&mut session, &args.uploads.paths(), &config.sheets)?;
    let working = match &args.facts {
        Some(path) => {
            let (facts, issues) = load_facts(path)?;
            if !issues.is_empty() {
                warn!(issues = issues.len(), "malformed cells in fact table");
            }
            session.replace_working(facts)
        }
        None => session
            .reconcile(&config.reconcile)
            .context("reconciliation failed")?,
    };
    let (availability, issues) = session
        .availability()
        .context("availability is needed for utilization reports")?;
    if !issues.is_empty() {
        warn!(issues = issues.len(), "malformed cells in availability");
    }

    let facts = working.facts();
    let filter = report_filter(args);
    let overview = build_overview(facts, &availability, &filter);
    let specialty = build_specialty_report(facts, &availability, &filter);
    for surgeon in &specialty.surgeons {
        trace!(
            surgeon = redact_value(&surgeon.surgeon),
            cases = surgeon.total_cases,
            "surgeon stats"
        );
    }

    if args.json {
        let output = ReportOutput {
            filter_options: filter_options(facts),
            overview,
            specialty,
        };
        let json = serde_json::to_string_pretty(&output).context("serialize report")?;
        println!("{json}");
    } else {
        print_overview(&overview);
        print_specialty_report(&specialty);
    }
    Ok(())
}

pub fn run_view(args: &ViewArgs, config: &BlocktimeConfig) -> Result<()> {
    let format = SourceFormat::from_path(&args.path)?;
    if format == SourceFormat::Workbook {
        let sheets = sheet_names(&args.path)
            .with_context(|| format!("list sheets of {}", args.path.display()))?;
        println!("Sheets: {}", sheets.join(", "));
    }
    let df = match (&args.sheet, format) {
        (Some(sheet), SourceFormat::Workbook) => load_table(&args.path, Some(sheet.as_str()))
            .with_context(|| format!("load sheet '{sheet}' from {}", args.path.display()))?,
        _ => load_dataset(args.dataset, &args.path, &config.sheets)?,
    };
    print_frame_preview(args.dataset, &df, args.rows);
    Ok(())
}
