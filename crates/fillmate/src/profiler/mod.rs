//! Missing-value profiling.
//!
//! Counts null cells per column and for the dataset as a whole. This is the
//! summary shown before a fill strategy is chosen.

use crate::types::{ColumnNullSummary, NullSummary};
use crate::utils::round2;
use polars::prelude::*;

/// Data profiler for missing values.
pub struct NullProfiler;

impl NullProfiler {
    /// Summarize the missing cells of every column.
    ///
    /// Percentages are relative to the row count and rounded to two
    /// decimals; an empty dataset reports 0%.
    pub fn summarize(df: &DataFrame) -> NullSummary {
        let rows = df.height();

        let column_summaries: Vec<ColumnNullSummary> = df
            .get_columns()
            .iter()
            .map(|col| Self::profile_column(col, rows))
            .collect();

        let columns_with_nulls = column_summaries
            .iter()
            .filter(|c| c.null_count > 0)
            .map(|c| c.name.clone())
            .collect();

        NullSummary {
            rows,
            columns: df.width(),
            total_nulls: column_summaries.iter().map(|c| c.null_count).sum(),
            column_summaries,
            columns_with_nulls,
        }
    }

    fn profile_column(col: &Column, rows: usize) -> ColumnNullSummary {
        let null_count = col.null_count();
        let null_percentage = if rows > 0 {
            round2(null_count as f64 / rows as f64 * 100.0)
        } else {
            0.0
        };

        ColumnNullSummary {
            name: col.name().to_string(),
            dtype: col.dtype().to_string(),
            null_count,
            null_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarize_counts_and_percentages() {
        let df = df![
            "id" => [1, 2, 3],
            "score" => [Some(1.5), None, None],
            "name" => [Some("a"), None, Some("c")],
        ]
        .unwrap();

        let summary = NullProfiler::summarize(&df);

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 3);
        assert_eq!(summary.total_nulls, 3);
        assert_eq!(
            summary.columns_with_nulls,
            vec!["score".to_string(), "name".to_string()]
        );

        let score = &summary.column_summaries[1];
        assert_eq!(score.null_count, 2);
        assert_eq!(score.null_percentage, 66.67);

        let name = &summary.column_summaries[2];
        assert_eq!(name.null_percentage, 33.33);
        assert!(summary.has_nulls());
    }

    #[test]
    fn test_summarize_no_nulls() {
        let df = df!["a" => [1, 2]].unwrap();
        let summary = NullProfiler::summarize(&df);

        assert_eq!(summary.total_nulls, 0);
        assert!(summary.columns_with_nulls.is_empty());
        assert!(!summary.has_nulls());
    }

    #[test]
    fn test_summarize_empty_dataset() {
        let df = DataFrame::empty();
        let summary = NullProfiler::summarize(&df);

        assert_eq!(summary.rows, 0);
        assert_eq!(summary.columns, 0);
        assert!(summary.column_summaries.is_empty());
    }

    #[test]
    fn test_summarize_zero_rows_reports_zero_percent() {
        let df = df!["a" => Vec::<i64>::new()].unwrap();
        let summary = NullProfiler::summarize(&df);

        assert_eq!(summary.column_summaries[0].null_percentage, 0.0);
    }
}
