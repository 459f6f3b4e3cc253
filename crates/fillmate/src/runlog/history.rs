//! Aggregates over the run history.

use crate::runlog::RunRecord;
use serde::{Deserialize, Serialize};

/// Totals for one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHistory {
    pub file_name: String,
    pub runs: usize,
    pub total_nulls: usize,
    pub total_filled: usize,
}

/// Summary of every logged run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_runs: usize,
    pub total_nulls: usize,
    pub total_filled: usize,
    /// `total_filled / total_nulls`, or 0 when no nulls were ever seen.
    pub fill_ratio: f64,
    pub first_run: Option<String>,
    pub last_run: Option<String>,
    /// Per-file totals in the order files first appear in the log.
    pub files: Vec<FileHistory>,
}

impl HistorySummary {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let mut files: Vec<FileHistory> = Vec::new();
        for record in records {
            match files.iter_mut().find(|f| f.file_name == record.file_name) {
                Some(file) => {
                    file.runs += 1;
                    file.total_nulls += record.total_nulls;
                    file.total_filled += record.total_filled;
                }
                None => files.push(FileHistory {
                    file_name: record.file_name.clone(),
                    runs: 1,
                    total_nulls: record.total_nulls,
                    total_filled: record.total_filled,
                }),
            }
        }

        let total_nulls: usize = records.iter().map(|r| r.total_nulls).sum();
        let total_filled: usize = records.iter().map(|r| r.total_filled).sum();
        let fill_ratio = if total_nulls > 0 {
            total_filled as f64 / total_nulls as f64
        } else {
            0.0
        };

        Self {
            total_runs: records.len(),
            total_nulls,
            total_filled,
            fill_ratio,
            first_run: records.first().map(|r| r.timestamp.clone()),
            last_run: records.last().map(|r| r.timestamp.clone()),
            files,
        }
    }
}
