//! CLI argument definitions.

use std::path::PathBuf;

use blocktime_cli::inputs::UploadPaths;
use blocktime_model::DatasetKind;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "blocktime",
    version,
    about = "Surgery block-time utilization - reconcile OR cases against available block time",
    long_about = "Reconcile elective surgical cases against the surgeon roster, the\n\
                  specialty dictionary and the monthly available block time.\n\n\
                  Produces a per-case fact table (XLSX or CSV) and utilization reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow surgeon names in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// JSON configuration file (timestamp format, robot specialties, sheet names).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile the raw uploads and export the fact table.
    Process(ProcessArgs),

    /// Print utilization reports for a run or an exported fact table.
    Report(ReportArgs),

    /// Show the size and first rows of one raw dataset.
    View(ViewArgs),
}

/// Raw upload locations shared by `process` and `report`.
#[derive(Parser)]
pub struct UploadArgs {
    /// Elective cases (CSV or workbook).
    #[arg(long = "cases", value_name = "PATH")]
    pub cases: Option<PathBuf>,

    /// Surgeon roster (CSV or workbook).
    #[arg(long = "roster", value_name = "PATH")]
    pub roster: Option<PathBuf>,

    /// Available Time workbook with the summary and dictionary sheets.
    #[arg(
        long = "available-time",
        value_name = "PATH",
        conflicts_with_all = ["availability", "dictionary"]
    )]
    pub available_time: Option<PathBuf>,

    /// Availability summary on its own.
    #[arg(long = "availability", value_name = "PATH")]
    pub availability: Option<PathBuf>,

    /// Specialty dictionary on its own.
    #[arg(long = "dictionary", value_name = "PATH")]
    pub dictionary: Option<PathBuf>,
}

impl UploadArgs {
    pub fn paths(&self) -> UploadPaths {
        UploadPaths {
            cases: self.cases.clone(),
            roster: self.roster.clone(),
            available_time: self.available_time.clone(),
            availability: self.availability.clone(),
            dictionary: self.dictionary.clone(),
        }
    }
}

#[derive(Parser)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub uploads: UploadArgs,

    /// Export path; the extension picks the format (.xlsx or .csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Reconcile and report without writing the export.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Maximum number of malformed rows to list.
    #[arg(long = "max-issues", value_name = "N", default_value_t = 20)]
    pub max_issues: usize,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub uploads: UploadArgs,

    /// Previously exported fact table to report on instead of running the
    /// pipeline. Availability still comes from the uploads.
    #[arg(long = "facts", value_name = "PATH", conflicts_with_all = ["cases", "roster"])]
    pub facts: Option<PathBuf>,

    /// Only report this year.
    #[arg(long = "year")]
    pub year: Option<i32>,

    /// Only report these months (repeatable, 1-12).
    #[arg(long = "month", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub months: Vec<u32>,

    /// Specialty for the weekday, surgeon and case-length views.
    #[arg(long = "specialty", value_name = "CODE")]
    pub specialty: Option<String>,

    /// Print the reports as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ViewArgs {
    /// Dataset to show: nu (cases), sg (roster), dm (availability) or dic (dictionary).
    #[arg(value_name = "DATASET", value_parser = parse_dataset)]
    pub dataset: DatasetKind,

    /// File holding the dataset.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Sheet to read from a workbook (defaults to the configured sheet).
    #[arg(long = "sheet")]
    pub sheet: Option<String>,

    /// Number of rows to show.
    #[arg(long = "rows", default_value_t = 10)]
    pub rows: usize,
}

fn parse_dataset(value: &str) -> Result<DatasetKind, String> {
    value.parse()
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
