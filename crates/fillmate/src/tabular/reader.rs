//! Loading CSV and workbook files into DataFrames.

use crate::config::LoadOptions;
use crate::error::{FillMateError, Result};
use crate::tabular::TabularFormat;
use calamine::{Data, Range, Reader, open_workbook_auto};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV or workbook file.
///
/// Any failure to interpret the file as a table is reported as
/// [`FillMateError::ParseFailed`] (or a more specific input error).
pub fn load(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    if !path.exists() {
        return Err(FillMateError::FileNotFound(path.to_path_buf()));
    }

    let df = match TabularFormat::from_path(path)? {
        TabularFormat::Csv => load_csv(path, options)?,
        TabularFormat::Workbook => load_workbook(path, options)?,
    };

    info!("Loaded '{}': {:?}", path.display(), df.shape());
    Ok(df)
}

/// Parse CSV content already held in memory.
pub fn load_csv_bytes(bytes: &[u8], file_name: &str, options: &LoadOptions) -> Result<DataFrame> {
    csv_read_options(options, options.infer_schema_length, true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| FillMateError::parse_failed(file_name, e))
}

/// Reader options; `infer_rows` of `None` infers the schema from every row.
fn csv_read_options(
    options: &LoadOptions,
    infer_rows: Option<usize>,
    quoted: bool,
) -> CsvReadOptions {
    let null_values = NullValues::AllColumns(
        options
            .null_markers
            .iter()
            .map(|m| m.as_str().into())
            .collect(),
    );
    let quote_char = if quoted { Some(b'"') } else { None };

    CsvReadOptions::default()
        .with_infer_schema_length(infer_rows)
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(quote_char)
                .with_null_values(Some(null_values)),
        )
}

fn read_csv_file(path: &Path, read_options: CsvReadOptions) -> PolarsResult<DataFrame> {
    read_options
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Load CSV, retrying with a whole-file schema scan and then without
/// quote handling before giving up.
fn load_csv(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let mut result = read_csv_file(
        path,
        csv_read_options(options, options.infer_schema_length, true),
    );

    if let Err(e) = &result
        && options.infer_schema_length.is_some()
    {
        debug!("Loading with limited schema inference failed: {}", e);
        result = read_csv_file(path, csv_read_options(options, None, true));
    }

    if let Err(e) = &result {
        debug!("Standard loading failed: {}", e);
        result = read_csv_file(path, csv_read_options(options, None, false));
    }

    result.map_err(|e| FillMateError::parse_failed(path.display().to_string(), e))
}

fn load_workbook(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let file = path.display().to_string();
    let mut workbook =
        open_workbook_auto(path).map_err(|e| FillMateError::parse_failed(file.as_str(), e))?;

    let sheet_names = workbook.sheet_names();
    let sheet = match &options.sheet {
        Some(name) if sheet_names.contains(name) => name.clone(),
        Some(name) => {
            return Err(FillMateError::SheetNotFound {
                sheet: name.clone(),
                available: sheet_names,
            });
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| FillMateError::EmptyWorkbook(file.clone()))?,
    };

    debug!("Reading sheet '{}' from '{}'", sheet, file);
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| FillMateError::parse_failed(file.as_str(), e))?;

    range_to_dataframe(&range, &options.null_markers)
        .map_err(|e| FillMateError::parse_failed(file, e))
}

/// Convert a sheet range to a DataFrame, using the first row as header.
pub(crate) fn range_to_dataframe(range: &Range<Data>, null_markers: &[String]) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns: Vec<Column> = header_names(header)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&Data>> = body
                .iter()
                .map(|row| row.get(idx).filter(|cell| !is_missing_cell(cell, null_markers)))
                .collect();
            column_from_cells(&name, &cells)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Header labels with blanks named `Unnamed: <idx>` and duplicates suffixed `.1`, `.2`, ...
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {}", idx),
                Data::String(s) if s.trim().is_empty() => format!("Unnamed: {}", idx),
                Data::String(s) => s.clone(),
                other => other.to_string(),
            };

            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn is_missing_cell(cell: &Data, null_markers: &[String]) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.is_empty() || null_markers.iter().any(|m| m == s),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Bool,
    Text,
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

/// Narrowest column type that holds every present cell.
fn infer_kind(cells: &[Option<&Data>]) -> CellKind {
    let mut kind: Option<CellKind> = None;

    for cell in cells.iter().flatten() {
        let this = match cell {
            Data::Int(_) => CellKind::Int,
            Data::Float(f) if is_integral(*f) => CellKind::Int,
            Data::Float(_) => CellKind::Float,
            Data::Bool(_) => CellKind::Bool,
            _ => return CellKind::Text,
        };

        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(CellKind::Int | CellKind::Float), CellKind::Int | CellKind::Float) => {
                CellKind::Float
            }
            _ => return CellKind::Text,
        });
    }

    // an all-missing column reads as float, like an all-NaN column
    kind.unwrap_or(CellKind::Float)
}

fn column_from_cells(name: &str, cells: &[Option<&Data>]) -> Column {
    let series = match infer_kind(cells) {
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(i)) => Some(*i),
                    Some(Data::Float(f)) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(i)) => Some(*i as f64),
                    Some(Data::Float(f)) => Some(*f),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellKind::Bool => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellKind::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| {
                    cell.map(|data| match data {
                        Data::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                })
                .collect();
            Series::new(name.into(), values)
        }
    };

    Column::from(series)
}
