//! Statistical imputation methods.
//!
//! Provides mean, median and mode imputation.

use crate::error::Result;
use crate::imputers::column_series;
use crate::utils::{fill_numeric_nulls, is_numeric_dtype};
use polars::prelude::*;
use std::collections::HashMap;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Apply median imputation for numeric columns.
    ///
    /// Non-numeric and all-missing columns are left untouched.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(series) = column_series(df, col_name)
            && is_numeric_dtype(series.dtype())
            && let Some(median_val) = series.median()
        {
            Self::fill_with_value(df, &series, median_val, processing_steps, "median")?;
        }
        Ok(())
    }

    /// Apply mean imputation for numeric columns.
    ///
    /// Non-numeric and all-missing columns are left untouched.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(series) = column_series(df, col_name)
            && is_numeric_dtype(series.dtype())
            && let Some(mean_val) = series.mean()
        {
            Self::fill_with_value(df, &series, mean_val, processing_steps, "mean")?;
        }
        Ok(())
    }

    /// Apply mode imputation to a column of any dtype.
    ///
    /// The fill value keeps the column's dtype. On a tie the value seen
    /// first (in row order) wins.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let Some(series) = column_series(df, col_name) else {
            return Ok(());
        };
        let Some(mode_idx) = mode_index(&series)? else {
            return Ok(());
        };

        let indices: Vec<IdxSize> = series
            .is_null()
            .into_iter()
            .enumerate()
            .map(|(i, is_null)| {
                if is_null.unwrap_or(false) {
                    mode_idx as IdxSize
                } else {
                    i as IdxSize
                }
            })
            .collect();
        let filled = series.take(&IdxCa::from_vec(PlSmallStr::EMPTY, indices))?;
        let mode_val = series.get(mode_idx)?.to_string();
        df.replace(col_name, filled)?;

        processing_steps.push(format!("Filled '{}' with mode: {}", col_name, mode_val));

        Ok(())
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(
        df: &mut DataFrame,
        series: &Series,
        fill_value: f64,
        processing_steps: &mut Vec<String>,
        method: &str,
    ) -> Result<()> {
        let col_name = series.name().to_string();
        let result = fill_numeric_nulls(series, fill_value)?;
        df.replace(&col_name, result)?;

        processing_steps.push(format!(
            "Filled '{}' with {}: {:.2}",
            col_name, method, fill_value
        ));

        Ok(())
    }
}

/// Row index of the first occurrence of the most frequent non-null value.
///
/// Values are compared through their string form, so this works for any
/// dtype that can be cast to `String`.
fn mode_index(series: &Series) -> Result<Option<usize>> {
    let keys = series.cast(&DataType::String)?;
    let keys = keys.str()?;

    // value -> (count, first row)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, key) in keys.into_iter().enumerate() {
        if let Some(key) = key {
            counts.entry(key).or_insert((0, idx)).0 += 1;
        }
    }

    Ok(counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, first_idx)| first_idx))
}
