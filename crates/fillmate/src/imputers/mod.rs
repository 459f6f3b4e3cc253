//! Imputation module for handling missing values.
//!
//! This module provides the fill strategies:
//! - Sequential imputation (forward fill, backward fill, linear interpolation)
//! - Statistical imputation (mean, median, mode)

mod sequential;
mod statistical;

pub use sequential::SequentialImputer;
pub use statistical::StatisticalImputer;

use polars::prelude::*;

/// Owned handle to a column's data, or `None` if the column is absent.
///
/// Cloning a Series only bumps a reference count; it releases the borrow
/// on `df` so the column can then be replaced.
pub(crate) fn column_series(df: &DataFrame, col_name: &str) -> Option<Series> {
    df.column(col_name)
        .ok()
        .map(|col| col.as_materialized_series().clone())
}
