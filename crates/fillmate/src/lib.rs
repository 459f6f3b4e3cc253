//! FillMate: spreadsheet null-value cleaner.
//!
//! Load a CSV or Excel file, see how many cells are missing in each column,
//! fill them with one of the classic strategies, and write the cleaned file.
//! Each run can be appended to a local run log.
//!
//! # Overview
//!
//! - **Profiling**: per-column null counts and percentages ([`NullProfiler`])
//! - **Filling**: forward/backward fill, mean, median, mode, linear
//!   interpolation ([`FillEngine`])
//! - **I/O**: CSV and workbook input, CSV and xlsx output ([`tabular`])
//! - **Run log**: append-only history of runs with summaries ([`RunLog`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fillmate::{FillEngine, FillStrategy, LoadOptions, NullProfiler, OutputFormat, RunLog};
//! use std::path::Path;
//!
//! let df = fillmate::tabular::load(Path::new("sales.xlsx"), &LoadOptions::default())?;
//!
//! let summary = NullProfiler::summarize(&df);
//! println!("{} missing cells in {:?}", summary.total_nulls, summary.columns_with_nulls);
//!
//! let outcome = FillEngine::new().process(df, FillStrategy::Interpolation);
//! fillmate::tabular::write(&outcome.data, Path::new("clean.csv"), OutputFormat::Csv)?;
//!
//! let mut log = RunLog::open("fillmate_runs.csv");
//! log.append(outcome.report.nulls_before, outcome.report.nulls_after, "sales.xlsx")?;
//! ```

pub mod config;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod runlog;
pub mod tabular;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, FillConfig, FillConfigBuilder, FillStrategy, LoadOptions, OutputFormat,
};
pub use error::{FillMateError, Result as FillMateResult, ResultExt};
pub use imputers::{SequentialImputer, StatisticalImputer};
pub use pipeline::{FillEngine, FillRun};
pub use profiler::NullProfiler;
pub use runlog::{
    CsvRunStore, FileHistory, HistorySummary, MemoryRunStore, RunLog, RunRecord, RunStore,
};
pub use tabular::TabularFormat;
pub use types::{ColumnNullSummary, FillOutcome, FillReport, NullSummary};
