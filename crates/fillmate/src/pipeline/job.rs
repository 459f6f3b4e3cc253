//! One complete run over a file: load, profile, fill, write, log.

use crate::config::FillConfig;
use crate::error::Result;
use crate::pipeline::FillEngine;
use crate::profiler::NullProfiler;
use crate::runlog::{RunLog, RunRecord};
use crate::tabular;
use crate::types::{FillOutcome, NullSummary};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a file run produced.
#[derive(Debug, Clone)]
pub struct FillRun {
    /// Missing values in the input, before filling.
    pub null_summary: NullSummary,
    pub outcome: FillOutcome,
    pub output_path: PathBuf,
    /// `None` when run logging is disabled.
    pub run_record: Option<RunRecord>,
}

impl FillEngine {
    /// Fill `input` as configured, write the cleaned file, and log the run.
    ///
    /// Input that cannot be read fails before anything is written: no
    /// output file and no run record.
    pub fn run_file(&self, input: &Path, config: &FillConfig) -> Result<FillRun> {
        info!("Loading dataset from: {}", input.display());
        let df = tabular::load(input, &config.load)?;
        let null_summary = NullProfiler::summarize(&df);

        let outcome = self.process(df, config.strategy);

        let output_path = config.output_path();
        tabular::write(&outcome.data, &output_path, config.output_format)?;

        let run_record = match &config.run_log {
            Some(path) => Some(RunLog::open(path).append(
                outcome.report.nulls_before,
                outcome.report.nulls_after,
                &display_file_name(input),
            )?),
            None => None,
        };

        Ok(FillRun {
            null_summary,
            outcome,
            output_path,
            run_record,
        })
    }
}

/// File name shown in the run log (no directories).
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FillStrategy, OutputFormat};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_display_file_name() {
        assert_eq!(display_file_name(Path::new("data/in/sales.xlsx")), "sales.xlsx");
        assert_eq!(display_file_name(Path::new("plain.csv")), "plain.csv");
    }

    #[test]
    fn test_run_file_writes_output_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("survey.csv");
        fs::write(&input, "q1,q2\n1,a\n,b\n3,\n").unwrap();

        let config = FillConfig::builder()
            .strategy(FillStrategy::ForwardFill)
            .output_format(OutputFormat::Xlsx)
            .output_dir(dir.path().join("out"))
            .run_log(dir.path().join("runs.csv"))
            .build()
            .unwrap();

        let run = FillEngine::new().run_file(&input, &config).unwrap();

        assert_eq!(run.null_summary.total_nulls, 2);
        assert_eq!(run.outcome.report.nulls_after, 0);
        assert!(run.output_path.exists());

        let record = run.run_record.unwrap();
        assert_eq!(record.file_name, "survey.csv");
        assert_eq!(record.total_nulls, 2);
        assert_eq!(record.total_filled, 2);
        assert_eq!(RunLog::open(dir.path().join("runs.csv")).load().unwrap().len(), 1);
    }

    #[test]
    fn test_run_file_without_run_log() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.csv");
        fs::write(&input, "x,y\n1,a\n,b\n").unwrap();

        let config = FillConfig::builder().output_dir(dir.path()).build().unwrap();
        let run = FillEngine::new().run_file(&input, &config).unwrap();

        assert!(run.run_record.is_none());
        assert!(run.output_path.exists());
    }

    #[test]
    fn test_unreadable_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.xlsx");
        fs::write(&input, "this is not a zip archive").unwrap();
        let log_path = dir.path().join("runs.csv");

        let config = FillConfig::builder()
            .output_dir(dir.path().join("out"))
            .run_log(&log_path)
            .build()
            .unwrap();

        let err = FillEngine::new().run_file(&input, &config).unwrap_err();

        assert!(err.is_input_error());
        assert!(!config.output_path().exists());
        assert!(!dir.path().join("out").exists());
        assert!(!log_path.exists());
    }
}
