//! Fill engine.
//!
//! Applies one [`FillStrategy`] to every column that has missing cells.

use crate::config::FillStrategy;
use crate::imputers::{SequentialImputer, StatisticalImputer};
use crate::types::{FillOutcome, FillReport};
use crate::utils::{is_numeric_dtype, total_null_count};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Fills missing values in a DataFrame.
///
/// The engine holds no state; every call is a pure function of its input.
#[derive(Debug, Default, Clone, Copy)]
pub struct FillEngine;

static_assertions::assert_impl_all!(FillEngine: Send, Sync);

impl FillEngine {
    pub fn new() -> Self {
        Self
    }

    /// Return a copy of `df` with missing cells filled by `strategy`.
    ///
    /// Shape, column order and column names are preserved. Columns the
    /// strategy does not apply to are returned unchanged.
    pub fn fill(&self, df: &DataFrame, strategy: FillStrategy) -> DataFrame {
        let mut filled = df.clone();
        let mut steps = Vec::new();
        self.fill_in_place(&mut filled, strategy, &mut steps);
        filled
    }

    /// Fill `df` and report what was done.
    pub fn process(&self, mut df: DataFrame, strategy: FillStrategy) -> FillOutcome {
        let start = Instant::now();
        let nulls_before = total_null_count(&df);

        info!("Filling missing values using {} method", strategy);

        let mut processing_steps = Vec::new();
        let columns_filled = self.fill_in_place(&mut df, strategy, &mut processing_steps);

        let nulls_after = total_null_count(&df);
        let report = FillReport {
            strategy,
            rows: df.height(),
            columns: df.width(),
            nulls_before,
            nulls_after,
            cells_filled: nulls_before.saturating_sub(nulls_after),
            columns_filled,
            processing_steps,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Filled {} of {} missing values ({} remaining)",
            report.cells_filled, nulls_before, nulls_after
        );

        FillOutcome { data: df, report }
    }

    /// Fill every column with nulls; returns the columns that changed.
    fn fill_in_place(
        &self,
        df: &mut DataFrame,
        strategy: FillStrategy,
        processing_steps: &mut Vec<String>,
    ) -> Vec<String> {
        let columns_with_missing: Vec<(String, usize)> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        if columns_with_missing.is_empty() {
            debug!("No missing values to fill");
            return Vec::new();
        }

        let mut columns_filled = Vec::new();
        for (col_name, missing_count) in columns_with_missing {
            if strategy.numeric_only()
                && !df
                    .column(&col_name)
                    .is_ok_and(|col| is_numeric_dtype(col.dtype()))
            {
                debug!("Column '{}' is not numeric, skipped by {}", col_name, strategy);
                continue;
            }

            let result = match strategy {
                FillStrategy::ForwardFill => {
                    SequentialImputer::apply_forward_fill(df, &col_name, processing_steps)
                }
                FillStrategy::BackwardFill => {
                    SequentialImputer::apply_backward_fill(df, &col_name, processing_steps)
                }
                FillStrategy::Mean => {
                    StatisticalImputer::apply_numeric_mean(df, &col_name, processing_steps)
                }
                FillStrategy::Median => {
                    StatisticalImputer::apply_numeric_median(df, &col_name, processing_steps)
                }
                FillStrategy::Mode => {
                    StatisticalImputer::apply_mode_imputation(df, &col_name, processing_steps)
                }
                FillStrategy::Interpolation => {
                    SequentialImputer::apply_linear_interpolation(df, &col_name, processing_steps)
                }
            };

            if let Err(e) = result {
                // the column is left as it was
                warn!("Could not fill '{}' with {}: {}", col_name, strategy, e);
                continue;
            }

            let remaining = df.column(&col_name).map(|c| c.null_count()).unwrap_or(missing_count);
            if remaining < missing_count {
                debug!(
                    "Column '{}': {} -> {} missing",
                    col_name, missing_count, remaining
                );
                columns_filled.push(col_name);
            } else {
                debug!("Column '{}' left unchanged by {}", col_name, strategy);
            }
        }

        columns_filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_df() -> DataFrame {
        df![
            "id" => [1i64, 2, 3, 4],
            "score" => [Some(1.0), None, Some(3.0), None],
            "city" => [None, Some("Oslo"), None, Some("Oslo")],
        ]
        .unwrap()
    }

    #[test]
    fn test_fill_preserves_shape_for_every_strategy() {
        let df = sample_df();
        let engine = FillEngine::new();

        for strategy in FillStrategy::ALL {
            let filled = engine.fill(&df, strategy);
            assert_eq!(filled.shape(), df.shape(), "{strategy}");
            assert_eq!(filled.get_column_names(), df.get_column_names(), "{strategy}");
        }
    }

    #[test]
    fn test_fill_does_not_mutate_input() {
        let df = sample_df();
        let _ = FillEngine::new().fill(&df, FillStrategy::Mode);
        assert_eq!(df.column("score").unwrap().null_count(), 2);
    }

    #[test]
    fn test_mean_leaves_strings_missing() {
        let filled = FillEngine::new().fill(&sample_df(), FillStrategy::Mean);

        assert_eq!(filled.column("score").unwrap().null_count(), 0);
        assert_eq!(filled.column("city").unwrap().null_count(), 2);
    }

    #[test]
    fn test_process_report() {
        let outcome = FillEngine::new().process(sample_df(), FillStrategy::ForwardFill);
        let report = &outcome.report;

        assert_eq!(report.nulls_before, 4);
        // city[0] is a leading null
        assert_eq!(report.nulls_after, 1);
        assert_eq!(report.cells_filled, 3);
        assert_eq!(
            report.columns_filled,
            vec!["score".to_string(), "city".to_string()]
        );
        assert_eq!(report.rows, 4);
        assert_eq!(report.processing_steps.len(), 2);
    }

    #[test]
    fn test_numeric_strategies_skip_text_columns() {
        for strategy in [FillStrategy::Median, FillStrategy::Interpolation] {
            let outcome = FillEngine::new().process(sample_df(), strategy);

            assert_eq!(outcome.report.columns_filled, vec!["score".to_string()]);
            assert_eq!(outcome.report.processing_steps.len(), 1, "{strategy}");
            assert_eq!(outcome.data.column("city").unwrap().null_count(), 2);
        }
    }

    #[test]
    fn test_process_without_nulls() {
        let df = df!["a" => [1, 2, 3]].unwrap();
        let outcome = FillEngine::new().process(df, FillStrategy::Median);

        assert_eq!(outcome.report.nulls_before, 0);
        assert_eq!(outcome.report.cells_filled, 0);
        assert!(outcome.report.columns_filled.is_empty());
        assert!(outcome.report.processing_steps.is_empty());
    }

    #[test]
    fn test_process_empty_dataframe() {
        let outcome = FillEngine::new().process(DataFrame::empty(), FillStrategy::Interpolation);
        assert_eq!(outcome.data.shape(), (0, 0));
        assert_eq!(outcome.report.nulls_after, 0);
    }
}
