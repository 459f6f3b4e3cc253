//! Order-dependent imputation: forward fill, backward fill and linear
//! interpolation.
//!
//! All three read a column top to bottom, so row order is significant.

use crate::error::Result;
use crate::imputers::column_series;
use crate::utils::{is_numeric_dtype, numeric_values};
use polars::prelude::*;

/// Imputers that derive a missing cell from its neighbors in the same column.
pub struct SequentialImputer;

impl SequentialImputer {
    /// Forward fill: each null takes the nearest preceding value.
    ///
    /// Leading nulls stay null. Works for every dtype.
    pub fn apply_forward_fill(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        Self::apply_directional(
            df,
            col_name,
            FillNullStrategy::Forward(None),
            "Forward filled",
            processing_steps,
        )
    }

    /// Backward fill: each null takes the nearest following value.
    ///
    /// Trailing nulls stay null. Works for every dtype.
    pub fn apply_backward_fill(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        Self::apply_directional(
            df,
            col_name,
            FillNullStrategy::Backward(None),
            "Backward filled",
            processing_steps,
        )
    }

    /// Linear interpolation for numeric columns.
    ///
    /// Rows are treated as evenly spaced. Nulls before the first value or
    /// after the last value take that nearest value. The result is `Float64`.
    pub fn apply_linear_interpolation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let Some(series) = column_series(df, col_name) else {
            return Ok(());
        };
        if !is_numeric_dtype(series.dtype()) || series.null_count() == series.len() {
            return Ok(());
        }

        let before = series.null_count();
        let values = interpolate_linear(&numeric_values(&series)?);
        df.replace(col_name, Series::new(series.name().clone(), values))?;

        processing_steps.push(format!(
            "Interpolated {} missing value(s) in '{}'",
            before, col_name
        ));

        Ok(())
    }

    fn apply_directional(
        df: &mut DataFrame,
        col_name: &str,
        strategy: FillNullStrategy,
        verb: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let Some(series) = column_series(df, col_name) else {
            return Ok(());
        };

        let before = series.null_count();
        let filled = series.fill_null(strategy)?;
        let filled_count = before - filled.null_count();
        df.replace(col_name, filled)?;

        if filled_count > 0 {
            processing_steps.push(format!(
                "{} {} missing value(s) in '{}'",
                verb, filled_count, col_name
            ));
        }

        Ok(())
    }
}

/// Linearly interpolate the gaps of a sequence.
///
/// Gaps with a known value on only one side take that value; a sequence
/// with no known values is returned unchanged.
pub(crate) fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    if known.is_empty() {
        return values.to_vec();
    }

    // index into `known` of the first known point at or after the cursor
    let mut next = 0;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if v.is_some() {
                return *v;
            }
            while next < known.len() && known[next].0 < i {
                next += 1;
            }
            let prev = next.checked_sub(1).map(|p| known[p]);
            match (prev, known.get(next)) {
                (Some((x0, y0)), Some(&(x1, y1))) => {
                    Some(y0 + (y1 - y0) * (i - x0) as f64 / (x1 - x0) as f64)
                }
                (Some((_, y0)), None) => Some(y0),
                (None, Some(&(_, y1))) => Some(y1),
                (None, None) => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    // ========================================================================
    // forward / backward fill
    // ========================================================================

    #[test]
    fn test_forward_fill_keeps_leading_nulls() {
        let mut df = df![
            "values" => [None, Some(1.0), None, None, Some(4.0), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_forward_fill(&mut df, "values", &mut steps).unwrap();

        assert_eq!(
            f64_column(&df, "values"),
            vec![None, Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]
        );
        assert_eq!(steps, vec!["Forward filled 3 missing value(s) in 'values'".to_string()]);
    }

    #[test]
    fn test_forward_fill_strings() {
        let mut df = df![
            "city" => [Some("Oslo"), None, Some("Rome"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_forward_fill(&mut df, "city", &mut steps).unwrap();

        let city: Vec<Option<&str>> = df.column("city").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(city, vec![Some("Oslo"), Some("Oslo"), Some("Rome"), Some("Rome")]);
    }

    #[test]
    fn test_backward_fill_keeps_trailing_nulls() {
        let mut df = df![
            "values" => [None, Some(2.0), None, Some(5.0), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_backward_fill(&mut df, "values", &mut steps).unwrap();

        assert_eq!(
            f64_column(&df, "values"),
            vec![Some(2.0), Some(2.0), Some(5.0), Some(5.0), None]
        );
    }

    #[test]
    fn test_backward_fill_all_null_column_logs_nothing() {
        let mut df = df![
            "values" => [Option::<i64>::None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_backward_fill(&mut df, "values", &mut steps).unwrap();

        assert_eq!(df.column("values").unwrap().null_count(), 2);
        assert!(steps.is_empty());
    }

    // ========================================================================
    // linear interpolation
    // ========================================================================

    #[test]
    fn test_interpolation_midpoint() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_linear_interpolation(&mut df, "values", &mut steps).unwrap();

        assert_eq!(f64_column(&df, "values"), vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert!(steps[0].contains("Interpolated 1"));
    }

    #[test]
    fn test_interpolation_integer_column_becomes_float() {
        let mut df = df![
            "values" => [Some(0i64), None, None, Some(6)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_linear_interpolation(&mut df, "values", &mut steps).unwrap();

        assert_eq!(
            f64_column(&df, "values"),
            vec![Some(0.0), Some(2.0), Some(4.0), Some(6.0)]
        );
    }

    #[test]
    fn test_interpolation_skips_strings() {
        let mut df = df![
            "name" => [Some("a"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        SequentialImputer::apply_linear_interpolation(&mut df, "name", &mut steps).unwrap();

        assert_eq!(df.column("name").unwrap().null_count(), 1);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_interpolate_linear_edges_use_nearest() {
        let out = interpolate_linear(&[None, None, Some(4.0), None, Some(8.0), None]);
        assert_eq!(
            out,
            vec![Some(4.0), Some(4.0), Some(4.0), Some(6.0), Some(8.0), Some(8.0)]
        );
    }

    #[test]
    fn test_interpolate_linear_uneven_gap() {
        let out = interpolate_linear(&[Some(10.0), None, None, None, Some(2.0)]);
        assert_eq!(
            out,
            vec![Some(10.0), Some(8.0), Some(6.0), Some(4.0), Some(2.0)]
        );
    }

    #[test]
    fn test_interpolate_linear_all_missing() {
        assert_eq!(interpolate_linear(&[None, None]), vec![None, None]);
        assert!(interpolate_linear(&[]).is_empty());
    }
}
