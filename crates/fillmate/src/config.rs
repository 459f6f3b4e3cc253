//! Configuration types for FillMate.
//!
//! This module provides the fill strategies, output formats, and the
//! [`FillConfig`] used by the CLI, built with the builder pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Markers read as missing when loading CSV input.
pub const DEFAULT_NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Default file name (without extension) for the cleaned output.
pub const DEFAULT_OUTPUT_NAME: &str = "fillmate_cleaned_data";

/// Default number of rows shown in the cleaned-data preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Strategy for filling missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Carry the last non-missing value forward
    ForwardFill,
    /// Carry the next non-missing value backward
    BackwardFill,
    /// Column mean (numeric columns only)
    Mean,
    /// Column median (numeric columns only)
    Median,
    /// Most frequent value of the column
    Mode,
    /// Linear interpolation between neighbors (numeric columns only)
    Interpolation,
}

impl FillStrategy {
    /// All strategies, in menu order.
    pub const ALL: [FillStrategy; 6] = [
        FillStrategy::ForwardFill,
        FillStrategy::BackwardFill,
        FillStrategy::Mean,
        FillStrategy::Median,
        FillStrategy::Mode,
        FillStrategy::Interpolation,
    ];

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            FillStrategy::ForwardFill => "Forward Fill",
            FillStrategy::BackwardFill => "Backward Fill",
            FillStrategy::Mean => "Mean",
            FillStrategy::Median => "Median",
            FillStrategy::Mode => "Mode",
            FillStrategy::Interpolation => "Interpolation",
        }
    }

    /// Whether the strategy only applies to numeric columns.
    pub fn numeric_only(&self) -> bool {
        matches!(
            self,
            FillStrategy::Mean | FillStrategy::Median | FillStrategy::Interpolation
        )
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FillStrategy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "ffill" | "forwardfill" | "forward" | "pad" => Ok(FillStrategy::ForwardFill),
            "bfill" | "backwardfill" | "backward" | "backfill" => Ok(FillStrategy::BackwardFill),
            "mean" | "average" => Ok(FillStrategy::Mean),
            "median" => Ok(FillStrategy::Median),
            "mode" | "mostfrequent" => Ok(FillStrategy::Mode),
            "interpolation" | "interpolate" | "linear" | "linearinterpolation" => {
                Ok(FillStrategy::Interpolation)
            }
            _ => Err(ConfigValidationError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Output file format for the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated text
    #[default]
    Csv,
    /// Excel workbook with a single sheet
    Xlsx,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

/// Options controlling how input files are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Sheet to read from a workbook. `None` reads the first sheet.
    pub sheet: Option<String>,

    /// Strings treated as missing in CSV input.
    pub null_markers: Vec<String>,

    /// Rows used for CSV schema inference. `None` scans the whole file.
    #[serde(default)]
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|m| m.to_string()).collect(),
            infer_schema_length: None,
        }
    }
}

/// Configuration for a fill run.
///
/// Use [`FillConfig::builder()`] to create a new configuration with the
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use fillmate::config::{FillConfig, FillStrategy, OutputFormat};
///
/// let config = FillConfig::builder()
///     .strategy(FillStrategy::Median)
///     .output_format(OutputFormat::Xlsx)
///     .preview_rows(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    /// Strategy used to fill missing cells.
    /// Default: ForwardFill
    pub strategy: FillStrategy,

    /// Format of the cleaned output file.
    /// Default: Csv
    pub output_format: OutputFormat,

    /// Directory the cleaned file is written to.
    /// Default: "."
    pub output_dir: PathBuf,

    /// Output file name without extension.
    /// Default: "fillmate_cleaned_data"
    pub output_name: String,

    /// Number of rows printed in the preview.
    /// Default: 20
    pub preview_rows: usize,

    /// How input files are read.
    pub load: LoadOptions,

    /// Run log file. `None` disables run logging.
    /// Default: None
    pub run_log: Option<PathBuf>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            strategy: FillStrategy::ForwardFill,
            output_format: OutputFormat::default(),
            output_dir: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            load: LoadOptions::default(),
            run_log: None,
        }
    }
}

impl FillConfig {
    /// Create a new configuration builder.
    pub fn builder() -> FillConfigBuilder {
        FillConfigBuilder::default()
    }

    /// Full path of the cleaned output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_name, self.output_format.extension()))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::InvalidPreviewRows(self.preview_rows));
        }

        let name = self.output_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ConfigValidationError::InvalidOutputName(
                self.output_name.clone(),
            ));
        }

        if self.load.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid preview rows: {0} (must be at least 1)")]
    InvalidPreviewRows(usize),

    #[error("Invalid output name '{0}' (must be non-empty and contain no path separators)")]
    InvalidOutputName(String),

    #[error("Schema inference length must be at least 1")]
    InvalidSchemaLength,

    #[error("Unknown fill strategy '{0}'")]
    UnknownStrategy(String),
}

impl From<ConfigValidationError> for crate::error::FillMateError {
    fn from(e: ConfigValidationError) -> Self {
        crate::error::FillMateError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`FillConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct FillConfigBuilder {
    strategy: Option<FillStrategy>,
    output_format: Option<OutputFormat>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    preview_rows: Option<usize>,
    sheet: Option<String>,
    null_markers: Option<Vec<String>>,
    infer_schema_length: Option<usize>,
    run_log: Option<PathBuf>,
}

impl FillConfigBuilder {
    /// Set the fill strategy.
    pub fn strategy(mut self, strategy: FillStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set the output format.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the output file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Set the number of preview rows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Read a specific sheet from workbook inputs.
    pub fn sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Replace the set of CSV missing-value markers.
    pub fn null_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Limit CSV schema inference to the first `rows` rows.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Enable run logging to the given file.
    pub fn run_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.run_log = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `FillConfig` or an error if validation fails.
    pub fn build(self) -> Result<FillConfig, ConfigValidationError> {
        let defaults = LoadOptions::default();
        let config = FillConfig {
            strategy: self.strategy.unwrap_or(FillStrategy::ForwardFill),
            output_format: self.output_format.unwrap_or_default(),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_name: self
                .output_name
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            preview_rows: self.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
            load: LoadOptions {
                sheet: self.sheet,
                null_markers: self.null_markers.unwrap_or(defaults.null_markers),
                infer_schema_length: self.infer_schema_length,
            },
            run_log: self.run_log,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FillConfig::default();
        assert_eq!(config.strategy, FillStrategy::ForwardFill);
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.preview_rows, 20);
        assert_eq!(config.output_name, "fillmate_cleaned_data");
        assert!(config.run_log.is_none());
        assert!(config.load.null_markers.contains(&"NaN".to_string()));
        // whole-file schema inference
        assert_eq!(config.load.infer_schema_length, None);
    }

    #[test]
    fn test_validation_schema_length() {
        let config = FillConfig::builder().infer_schema_length(500).build().unwrap();
        assert_eq!(config.load.infer_schema_length, Some(500));

        let result = FillConfig::builder().infer_schema_length(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSchemaLength
        ));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::Mode)
            .output_format(OutputFormat::Xlsx)
            .output_dir("out")
            .output_name("clean")
            .preview_rows(5)
            .sheet("Data")
            .null_markers(["?"])
            .run_log("runs.csv")
            .build()
            .unwrap();

        assert_eq!(config.strategy, FillStrategy::Mode);
        assert_eq!(config.output_path(), PathBuf::from("out").join("clean.xlsx"));
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.load.sheet.as_deref(), Some("Data"));
        assert_eq!(config.load.null_markers, vec!["?".to_string()]);
        assert_eq!(config.run_log, Some(PathBuf::from("runs.csv")));
    }

    #[test]
    fn test_validation_zero_preview_rows() {
        let result = FillConfig::builder().preview_rows(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPreviewRows(0)
        ));
    }

    #[test]
    fn test_validation_output_name_with_separator() {
        let result = FillConfig::builder().output_name("../escape").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidOutputName(_)
        ));

        let result = FillConfig::builder().output_name("   ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("ffill".parse::<FillStrategy>().unwrap(), FillStrategy::ForwardFill);
        assert_eq!(
            "Forward Fill".parse::<FillStrategy>().unwrap(),
            FillStrategy::ForwardFill
        );
        assert_eq!(
            "backward-fill".parse::<FillStrategy>().unwrap(),
            FillStrategy::BackwardFill
        );
        assert_eq!("MEDIAN".parse::<FillStrategy>().unwrap(), FillStrategy::Median);
        assert_eq!(
            "interpolate".parse::<FillStrategy>().unwrap(),
            FillStrategy::Interpolation
        );
        assert!("zero".parse::<FillStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in FillStrategy::ALL {
            let parsed: FillStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
    }

    #[test]
    fn test_numeric_only() {
        assert!(FillStrategy::Mean.numeric_only());
        assert!(FillStrategy::Interpolation.numeric_only());
        assert!(!FillStrategy::Mode.numeric_only());
        assert!(!FillStrategy::ForwardFill.numeric_only());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "strategy": "median",
            "output_format": "xlsx",
            "output_dir": "exports",
            "output_name": "cleaned",
            "preview_rows": 10,
            "load": {
                "sheet": "Sheet2",
                "null_markers": ["-", "?"],
                "infer_schema_length": 50
            },
            "run_log": "history.csv"
        }"#;

        let config: FillConfig = serde_json::from_str(json).expect("should deserialize");

        assert_eq!(config.strategy, FillStrategy::Median);
        assert_eq!(config.output_format, OutputFormat::Xlsx);
        assert_eq!(config.output_path(), PathBuf::from("exports").join("cleaned.xlsx"));
        assert_eq!(config.load.infer_schema_length, Some(50));
        assert!(config.validate().is_ok());
    }
}
