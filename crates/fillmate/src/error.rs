//! Custom error types for FillMate.
//!
//! This module provides the error hierarchy using `thiserror` for every
//! fallible operation: loading and writing tabular files, the run log,
//! and configuration validation.
//!
//! Errors are serializable so they can be emitted as JSON by the CLI
//! (`--json`) in the same `{code, message}` shape as successful output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for FillMate.
#[derive(Error, Debug)]
pub enum FillMateError {
    /// Input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File extension is not a supported tabular format.
    #[error("Unsupported file format '{extension}' (expected csv, xlsx, xlsm, xls, xlsb or ods)")]
    UnsupportedFormat { extension: String },

    /// The file could not be parsed as tabular data.
    #[error("Error reading file '{file}': {reason}")]
    ParseFailed { file: String, reason: String },

    /// Requested sheet is not in the workbook.
    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// Workbook has no sheets at all.
    #[error("Workbook '{0}' contains no sheets")]
    EmptyWorkbook(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A row in the run log could not be decoded.
    #[error("Run log '{}' is corrupt at record {record}: {reason}", .path.display())]
    CorruptRunLog {
        path: PathBuf,
        record: usize,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Run log CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet reader error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Xlsx writer error.
    #[error("Xlsx writer error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FillMateError>,
    },
}

impl FillMateError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FillMateError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a parse failure for `file` from any displayable cause.
    pub fn parse_failed(file: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        FillMateError::ParseFailed {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::ParseFailed { .. } => "PARSE_FAILED",
            Self::SheetNotFound { .. } => "SHEET_NOT_FOUND",
            Self::EmptyWorkbook(_) => "EMPTY_WORKBOOK",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::CorruptRunLog { .. } => "CORRUPT_RUN_LOG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::XlsxWrite(_) => "XLSX_WRITE_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error means the input could not be read as a table.
    ///
    /// These are the errors the CLI reports as "Error reading file" and
    /// for which no output or run record is produced.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::FileNotFound(_)
            | Self::UnsupportedFormat { .. }
            | Self::ParseFailed { .. }
            | Self::SheetNotFound { .. }
            | Self::EmptyWorkbook(_)
            | Self::Spreadsheet(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for FillMateError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("FillMateError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for FillMate operations.
pub type Result<T> = std::result::Result<T, FillMateError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| FillMateError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| FillMateError::Io(e).with_context(context))
    }
}
