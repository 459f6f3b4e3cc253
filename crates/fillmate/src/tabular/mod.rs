//! Reading and writing tabular files.
//!
//! Input is CSV or a spreadsheet workbook, read fully into a polars
//! `DataFrame`. Output is CSV or a single-sheet xlsx workbook.

mod reader;
mod writer;

pub use reader::{load, load_csv_bytes};
pub use writer::{to_bytes, write};

use crate::error::{FillMateError, Result};
use std::path::Path;

/// Input file family, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// Comma-separated text
    Csv,
    /// Any workbook format calamine can open (xlsx, xlsm, xls, xlsb, ods)
    Workbook,
}

impl TabularFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(TabularFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(TabularFormat::Workbook),
            _ => Err(FillMateError::UnsupportedFormat { extension }),
        }
    }
}
