//! Writing DataFrames as CSV or xlsx.

use crate::config::OutputFormat;
use crate::error::{FillMateError, Result, ResultExt};
use crate::utils::{DtypeCategory, get_dtype_category, numeric_values};
use polars::prelude::*;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Name of the single sheet in xlsx output.
const SHEET_NAME: &str = "Cleaned Data";

/// Write `df` to `path` in the given format, creating parent directories.
pub fn write(df: &DataFrame, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    match format {
        OutputFormat::Csv => {
            let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
            write_csv(df, &mut file)?;
        }
        OutputFormat::Xlsx => {
            build_workbook(df)?.save(path)?;
        }
    }

    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Serialize `df` in the given format into memory.
pub fn to_bytes(df: &DataFrame, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(df, &mut buf)?;
            Ok(buf)
        }
        OutputFormat::Xlsx => Ok(build_workbook(df)?.save_to_buffer()?),
    }
}

fn write_csv<W: std::io::Write>(df: &DataFrame, out: &mut W) -> Result<()> {
    let mut df = df.clone();
    CsvWriter::new(out)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Writing CSV")?;
    Ok(())
}

/// One sheet, header in row 0, data from row 1. Missing cells stay blank.
fn build_workbook(df: &DataFrame) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (idx, column) in df.get_columns().iter().enumerate() {
        let col = u16::try_from(idx).map_err(|_| {
            FillMateError::InvalidConfig(format!(
                "{} columns exceed the xlsx column limit",
                df.width()
            ))
        })?;
        worksheet.write_string(0, col, column.name().as_str())?;
        write_column(worksheet, col, column.as_materialized_series())?;
    }

    Ok(workbook)
}

fn write_column(worksheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            for (row, value) in numeric_values(series)?.into_iter().enumerate() {
                match value {
                    Some(v) if v.is_finite() => {
                        worksheet.write_number(data_row(row), col, v)?;
                    }
                    Some(v) => {
                        worksheet.write_string(data_row(row), col, v.to_string())?;
                    }
                    None => {}
                }
            }
        }
        DtypeCategory::Boolean => {
            for (row, value) in series.bool()?.into_iter().enumerate() {
                if let Some(b) = value {
                    worksheet.write_boolean(data_row(row), col, b)?;
                }
            }
        }
        DtypeCategory::Datetime | DtypeCategory::String | DtypeCategory::Other => {
            let text = series.cast(&DataType::String)?;
            for (row, value) in text.str()?.into_iter().enumerate() {
                if let Some(s) = value {
                    worksheet.write_string(data_row(row), col, s)?;
                }
            }
        }
    }
    Ok(())
}

#[inline]
fn data_row(idx: usize) -> u32 {
    idx as u32 + 1
}
