//! Run log: one record per fill run.
//!
//! Records are appended to an injected [`RunStore`]; there is no global log.
//! The CSV layout is
//!
//! ```text
//! timestamp,file_name,total_nulls,total_filled
//! 2026-10-17 09:30:00,sales.xlsx,12,9
//! ```
//!
//! where `total_nulls` is the count before filling and `total_filled` the
//! number of cells the run filled.

mod history;
mod store;

pub use history::{FileHistory, HistorySummary};
pub use store::{CsvRunStore, MemoryRunStore, RunStore};

use crate::error::{Result, ResultExt};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Column names of the run log CSV.
pub const RUN_LOG_HEADER: [&str; 4] = ["timestamp", "file_name", "total_nulls", "total_filled"];

/// Timestamp layout used in the log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default run log file name.
pub const DEFAULT_RUN_LOG: &str = "fillmate_runs.csv";

/// One logged fill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: String,
    pub file_name: String,
    pub total_nulls: usize,
    pub total_filled: usize,
}

impl RunRecord {
    pub fn new(
        timestamp: impl Into<String>,
        file_name: impl Into<String>,
        nulls_before: usize,
        nulls_after: usize,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            file_name: file_name.into(),
            total_nulls: nulls_before,
            total_filled: nulls_before.saturating_sub(nulls_after),
        }
    }

    /// Missing cells detected before the fill.
    pub fn nulls_before(&self) -> usize {
        self.total_nulls
    }

    /// Missing cells left after the fill.
    pub fn nulls_after(&self) -> usize {
        self.total_nulls.saturating_sub(self.total_filled)
    }

    /// Parsed timestamp, if it is in [`TIMESTAMP_FORMAT`].
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// Appends and reads run records through a [`RunStore`].
#[derive(Debug, Clone)]
pub struct RunLog<S: RunStore> {
    store: S,
}

impl<S: RunStore> RunLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a run stamped with the current local time.
    pub fn append(
        &mut self,
        nulls_before: usize,
        nulls_after: usize,
        file_name: &str,
    ) -> Result<RunRecord> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let record = RunRecord::new(timestamp, file_name, nulls_before, nulls_after);
        self.append_record(&record)?;
        Ok(record)
    }

    /// Record a prepared run.
    pub fn append_record(&mut self, record: &RunRecord) -> Result<()> {
        self.store.append(record)?;
        info!(
            "Logged run for '{}': {} nulls, {} filled",
            record.file_name, record.total_nulls, record.total_filled
        );
        Ok(())
    }

    /// Every record in append order.
    pub fn load(&self) -> Result<Vec<RunRecord>> {
        self.store.load()
    }

    /// Aggregate the full history.
    pub fn summary(&self) -> Result<HistorySummary> {
        Ok(HistorySummary::from_records(&self.load()?))
    }

    /// Write the full history as CSV (with header) to `dest`.
    ///
    /// Returns the number of records written.
    pub fn export(&self, dest: &Path) -> Result<usize> {
        let records = self.load()?;

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }
        let file = File::create(dest).context(format!("Creating {}", dest.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(RUN_LOG_HEADER)?;
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("Exported {} run(s) to {}", records.len(), dest.display());
        Ok(records.len())
    }
}

impl RunLog<CsvRunStore> {
    /// Run log backed by the CSV file at `path`.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(CsvRunStore::new(path))
    }
}
