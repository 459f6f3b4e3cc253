//! CLI entry point for FillMate.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use fillmate::runlog::DEFAULT_RUN_LOG;
use fillmate::{
    FillConfig, FillEngine, FillMateError, FillReport, FillRun, FillStrategy, HistorySummary,
    NullProfiler, NullSummary, OutputFormat, RunLog, RunRecord,
};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::error;

/// Environment variable naming the run log file.
const RUN_LOG_ENV: &str = "FILLMATE_RUN_LOG";

/// CLI-compatible fill strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFillStrategy {
    /// Carry the last value forward
    Ffill,
    /// Carry the next value backward
    Bfill,
    /// Column mean (numeric columns)
    Mean,
    /// Column median (numeric columns)
    Median,
    /// Most frequent value
    Mode,
    /// Linear interpolation (numeric columns)
    Interpolate,
}

impl From<CliFillStrategy> for FillStrategy {
    fn from(cli: CliFillStrategy) -> Self {
        match cli {
            CliFillStrategy::Ffill => FillStrategy::ForwardFill,
            CliFillStrategy::Bfill => FillStrategy::BackwardFill,
            CliFillStrategy::Mean => FillStrategy::Mean,
            CliFillStrategy::Median => FillStrategy::Median,
            CliFillStrategy::Mode => FillStrategy::Mode,
            CliFillStrategy::Interpolate => FillStrategy::Interpolation,
        }
    }
}

/// CLI-compatible output format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    /// Comma-separated text
    Csv,
    /// Excel workbook
    Xlsx,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli: CliOutputFormat) -> Self {
        match cli {
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Xlsx => OutputFormat::Xlsx,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "FillMate Team",
    version,
    about = "Smart Excel/CSV null value cleaner",
    long_about = "Detect missing values in a spreadsheet and fill them with a statistical method.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  FILLMATE_RUN_LOG    Run log file (default: fillmate_runs.csv)\n\n\
                  EXAMPLES:\n  \
                  # Show missing values per column\n  \
                  fillmate summary -i data.xlsx\n\n  \
                  # Fill with the column median and write an Excel file\n  \
                  fillmate fill -i data.csv -m median --format xlsx -o out/\n\n  \
                  # Show past runs and export them\n  \
                  fillmate history --export history.csv"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show errors and results)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable text
    ///
    /// Disables all logging; only the JSON document is printed.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the count of missing values per column
    Summary {
        /// Path to the CSV or Excel file
        #[arg(short, long)]
        input: PathBuf,

        /// Sheet to read from a workbook (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Fill missing values and write the cleaned file
    Fill(FillArgs),

    /// Show the run history
    History {
        /// Run log file
        #[arg(long)]
        log: Option<PathBuf>,

        /// Write the full history as CSV to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FillArgs {
    /// Path to the CSV or Excel file
    #[arg(short, long)]
    input: PathBuf,

    /// Method used to fill missing values
    #[arg(short, long, value_enum)]
    method: CliFillStrategy,

    /// Output directory for the cleaned file
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Output file name (without extension)
    #[arg(long, default_value = fillmate::config::DEFAULT_OUTPUT_NAME)]
    output_name: String,

    /// Output file format
    #[arg(long, value_enum, default_value = "csv")]
    format: CliOutputFormat,

    /// Sheet to read from a workbook (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Number of cleaned rows to preview
    #[arg(long, default_value_t = fillmate::config::DEFAULT_PREVIEW_ROWS)]
    preview: usize,

    /// Run log file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Do not append this run to the run log
    #[arg(long)]
    no_log: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file (RUST_LOG included)
    dotenv().ok();

    init_logging(&cli.log_level, cli.quiet, cli.json);

    match &cli.command {
        Command::Summary { input, sheet } => run_summary(&cli, input, sheet.as_deref()),
        Command::Fill(args) => run_fill(&cli, args),
        Command::History { log, export } => run_history(&cli, log.as_deref(), export.as_deref()),
    }
}

/// Run log path: explicit flag, then environment, then the default.
fn resolve_run_log(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| env::var_os(RUN_LOG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RUN_LOG))
}

/// Report unreadable input as "Error reading file".
fn cli_error(e: FillMateError) -> anyhow::Error {
    error!("{}", e);
    if e.is_input_error() {
        anyhow!("Error reading file: {}", e)
    } else {
        anyhow!(e)
    }
}

fn run_summary(cli: &Cli, input: &Path, sheet: Option<&str>) -> Result<()> {
    let mut builder = FillConfig::builder();
    if let Some(sheet) = sheet {
        builder = builder.sheet(sheet);
    }
    let config = builder.build()?;

    let df = fillmate::tabular::load(input, &config.load).map_err(cli_error)?;
    let summary = NullProfiler::summarize(&df);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_null_summary(&summary);
    }
    Ok(())
}

#[derive(Serialize)]
struct FillOutput<'a> {
    input_file: String,
    output_file: String,
    null_summary: &'a NullSummary,
    report: &'a FillReport,
    run_record: Option<RunRecord>,
}

fn run_fill(cli: &Cli, args: &FillArgs) -> Result<()> {
    let mut builder = FillConfig::builder()
        .strategy(args.method.into())
        .output_format(args.format.into())
        .output_dir(&args.output)
        .output_name(&args.output_name)
        .preview_rows(args.preview);
    if let Some(ref sheet) = args.sheet {
        builder = builder.sheet(sheet);
    }
    if !args.no_log {
        builder = builder.run_log(resolve_run_log(args.log.as_deref()));
    }
    let config = builder.build()?;

    let FillRun {
        null_summary,
        outcome,
        output_path,
        run_record,
    } = FillEngine::new()
        .run_file(&args.input, &config)
        .map_err(cli_error)?;

    if cli.json {
        let output = FillOutput {
            input_file: args.input.display().to_string(),
            output_file: output_path.display().to_string(),
            null_summary: &null_summary,
            report: &outcome.report,
            run_record,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_null_summary(&null_summary);
    println!();
    println!(
        "Missing values filled using {} method!",
        outcome.report.strategy
    );
    println!(
        "  {} filled, {} remaining",
        outcome.report.cells_filled, outcome.report.nulls_after
    );
    for step in &outcome.report.processing_steps {
        println!("  - {}", step);
    }
    println!();
    println!("CLEANED DATA PREVIEW (first {} rows)", config.preview_rows);
    println!("{}", "-".repeat(40));
    println!("{}", outcome.data.head(Some(config.preview_rows)));
    println!();
    println!("Cleaned file: {}", output_path.display());
    if let (Some(path), Some(_)) = (&config.run_log, &run_record) {
        println!("Run logged to: {}", path.display());
    }

    Ok(())
}

#[derive(Serialize)]
struct HistoryOutput {
    log_file: String,
    records: Vec<RunRecord>,
    summary: HistorySummary,
}

fn run_history(cli: &Cli, log: Option<&Path>, export: Option<&Path>) -> Result<()> {
    let log_path = resolve_run_log(log);
    let run_log = RunLog::open(&log_path);
    let records = run_log.load()?;
    let summary = HistorySummary::from_records(&records);

    if let Some(dest) = export {
        run_log.export(dest)?;
    }

    if cli.json {
        let output = HistoryOutput {
            log_file: log_path.display().to_string(),
            records,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_history(&log_path, &records, &summary);
    if let Some(dest) = export {
        println!("History exported to: {}", dest.display());
    }
    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn print_null_summary(summary: &NullSummary) {
    println!();
    println!("NULL VALUE SUMMARY ({} rows x {} columns)", summary.rows, summary.columns);
    println!("{}", "-".repeat(60));
    println!(
        "{:<24} {:<10} {:<12} {:<12}",
        "Column", "Type", "Null Count", "Null %"
    );
    for col in &summary.column_summaries {
        println!(
            "{:<24} {:<10} {:<12} {:<12.2}",
            truncate_str(&col.name, 23),
            truncate_str(&col.dtype, 9),
            col.null_count,
            col.null_percentage
        );
    }
    println!();

    if summary.has_nulls() {
        println!(
            "Columns containing nulls: {}",
            summary.columns_with_nulls.join(", ")
        );
    } else {
        println!("No missing values found!");
    }
}

fn print_history(log_path: &Path, records: &[RunRecord], summary: &HistorySummary) {
    println!();
    println!("RUN HISTORY ({})", log_path.display());
    println!("{}", "-".repeat(70));

    if records.is_empty() {
        println!("  No runs logged yet");
        return;
    }

    println!(
        "{:<20} {:<28} {:<10} {:<10}",
        "Timestamp", "File", "Nulls", "Filled"
    );
    for record in records {
        println!(
            "{:<20} {:<28} {:<10} {:<10}",
            record.timestamp,
            truncate_str(&record.file_name, 27),
            record.total_nulls,
            record.total_filled
        );
    }
    println!();

    println!("Summary:");
    println!("  Runs: {}", summary.total_runs);
    println!(
        "  Nulls detected: {}, filled: {} ({:.1}%)",
        summary.total_nulls,
        summary.total_filled,
        summary.fill_ratio * 100.0
    );
    println!("  Files:");
    for file in &summary.files {
        println!(
            "    {:<28} {} run(s), {} nulls, {} filled",
            truncate_str(&file.file_name, 27),
            file.runs,
            file.total_nulls,
            file.total_filled
        );
    }
}
