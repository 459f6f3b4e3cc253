use crate::config::FillStrategy;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Missing-value counts for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNullSummary {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    /// Percentage of rows that are missing, rounded to two decimals.
    pub null_percentage: f64,
}

/// Missing-value overview of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullSummary {
    pub rows: usize,
    pub columns: usize,
    pub total_nulls: usize,
    pub column_summaries: Vec<ColumnNullSummary>,
    /// Names of columns with at least one missing cell, in column order.
    pub columns_with_nulls: Vec<String>,
}

impl NullSummary {
    pub fn has_nulls(&self) -> bool {
        self.total_nulls > 0
    }
}

/// What a fill run did, without the data itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    pub strategy: FillStrategy,
    pub rows: usize,
    pub columns: usize,
    pub nulls_before: usize,
    pub nulls_after: usize,
    pub cells_filled: usize,
    /// Columns in which at least one cell was filled.
    pub columns_filled: Vec<String>,
    pub processing_steps: Vec<String>,
    pub duration_ms: u64,
}

/// Result of [`FillEngine::process`](crate::FillEngine::process).
#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub data: DataFrame,
    pub report: FillReport,
}
