//! Backing stores for run records.

use crate::error::{FillMateError, Result, ResultExt};
use crate::runlog::{RUN_LOG_HEADER, RunRecord};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only storage for [`RunRecord`]s.
///
/// Implementations keep records in append order and never rewrite or
/// delete them. There is no locking; one writer at a time is assumed.
pub trait RunStore {
    /// Add one record after all existing ones.
    fn append(&mut self, record: &RunRecord) -> Result<()>;

    /// Every record, in the order appended. Empty if nothing was stored yet.
    fn load(&self) -> Result<Vec<RunRecord>>;
}

/// Run records kept in a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvRunStore {
    path: PathBuf,
}

static_assertions::assert_impl_all!(CsvRunStore: Send, Sync);

impl CsvRunStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunStore for CsvRunStore {
    fn append(&mut self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context(format!("Opening run log {}", self.path.display()))?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            debug!("Creating run log at {}", self.path.display());
            writer.write_record(RUN_LOG_HEADER)?;
        }
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    fn load(&self) -> Result<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize()
            .enumerate()
            .map(|(idx, row)| {
                row.map_err(|e| FillMateError::CorruptRunLog {
                    path: self.path.clone(),
                    record: idx + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

/// Run records held in memory; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryRunStore {
    records: Vec<RunRecord>,
}

static_assertions::assert_impl_all!(MemoryRunStore: Send, Sync);

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn append(&mut self, record: &RunRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<Vec<RunRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(file: &str, before: usize, after: usize) -> RunRecord {
        RunRecord::new("2026-10-17 09:30:00", file, before, after)
    }

    #[test]
    fn test_csv_store_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvRunStore::new(dir.path().join("runs.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_csv_store_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/runs.csv");
        let mut store = CsvRunStore::new(&path);

        store.append(&record("a.csv", 4, 1)).unwrap();
        store.append(&record("b.xlsx", 2, 0)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "timestamp,file_name,total_nulls,total_filled",
                "2026-10-17 09:30:00,a.csv,4,3",
                "2026-10-17 09:30:00,b.xlsx,2,2",
            ]
        );
    }

    #[test]
    fn test_csv_store_round_trip_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvRunStore::new(dir.path().join("runs.csv"));

        let first = record("first.csv", 10, 0);
        let second = record("second, with comma.csv", 3, 3);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.load().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_csv_store_appends_to_existing_file_without_rewriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");
        fs::write(
            &path,
            "timestamp,file_name,total_nulls,total_filled\n2025-01-01 00:00:00,old.csv,7,7\n",
        )
        .unwrap();

        let mut store = CsvRunStore::new(&path);
        store.append(&record("new.csv", 1, 0)).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_name, "old.csv");
        assert_eq!(records[1].file_name, "new.csv");
    }

    #[test]
    fn test_csv_store_reports_corrupt_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");
        fs::write(
            &path,
            "timestamp,file_name,total_nulls,total_filled\n2025-01-01 00:00:00,a.csv,lots,1\n",
        )
        .unwrap();

        let err = CsvRunStore::new(&path).load().unwrap_err();
        assert_eq!(err.error_code(), "CORRUPT_RUN_LOG");
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryRunStore::new();
        assert!(store.load().unwrap().is_empty());

        store.append(&record("a.csv", 1, 0)).unwrap();
        assert_eq!(store.load().unwrap(), vec![record("a.csv", 1, 0)]);
    }
}
