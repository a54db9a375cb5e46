//! Configuration types for an anonymization run.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default privacy threshold when none is given.
pub const DEFAULT_TARGET_K: usize = 3;

/// Default number of rows sampled per column by the PII scanner.
pub const DEFAULT_PII_SAMPLE_ROWS: usize = 100;

/// Default file name (without extension) of the anonymized dataset.
pub const DEFAULT_OUTPUT_NAME: &str = "anonymized_data";

/// Configuration for an anonymization run.
///
/// Use [`AnonymizationConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_privacy::config::AnonymizationConfig;
///
/// let config = AnonymizationConfig::builder()
///     .quasi_identifiers(["Age", "Pincode"])
///     .target_k(3)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizationConfig {
    /// Columns whose combined values could re-identify a person.
    /// Selected by the caller, never inferred.
    /// Default: empty
    pub quasi_identifiers: Vec<String>,

    /// Minimum equivalence class size the run aims for.
    /// Default: 3
    pub target_k: usize,

    /// Columns to read as text when loading CSV input, so that values like
    /// postal codes keep their exact digits.
    /// Default: empty
    pub text_columns: Vec<String>,

    /// Number of leading rows per column inspected by the PII scanner.
    /// Default: 100
    pub pii_sample_rows: usize,

    /// Output directory for the anonymized dataset and reports.
    /// Default: "./outputs"
    pub output_dir: PathBuf,

    /// Custom output file name (without extension).
    /// If None, uses "anonymized_data".
    /// Default: None
    pub output_name: Option<String>,

    /// Whether to save the anonymized dataset to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            quasi_identifiers: Vec::new(),
            target_k: DEFAULT_TARGET_K,
            text_columns: Vec::new(),
            pii_sample_rows: DEFAULT_PII_SAMPLE_ROWS,
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
            save_to_disk: true,
        }
    }
}

impl AnonymizationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnonymizationConfigBuilder {
        AnonymizationConfigBuilder::default()
    }

    /// File name (without extension) used for the anonymized dataset.
    pub fn output_file_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME)
    }

    /// Validate the configuration and return errors if invalid.
    ///
    /// An empty quasi-identifier selection is accepted here so that a config
    /// can drive a PII scan alone; [`validate_for_run`](Self::validate_for_run)
    /// rejects it.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.target_k < 2 {
            return Err(ConfigValidationError::InvalidTargetK(self.target_k));
        }

        if self.pii_sample_rows == 0 {
            return Err(ConfigValidationError::InvalidSampleRows(
                self.pii_sample_rows,
            ));
        }

        if let Some(blank) = self
            .quasi_identifiers
            .iter()
            .find(|name| name.trim().is_empty())
        {
            return Err(ConfigValidationError::BlankColumnName(blank.clone()));
        }

        Ok(())
    }

    /// Validate the configuration for an anonymization run.
    pub fn validate_for_run(&self) -> Result<(), ConfigValidationError> {
        self.validate()?;
        if self.quasi_identifiers.is_empty() {
            return Err(ConfigValidationError::NoQuasiIdentifiers);
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid target k: {0} (must be at least 2)")]
    InvalidTargetK(usize),

    #[error("Invalid PII sample size: {0} (must be at least 1)")]
    InvalidSampleRows(usize),

    #[error("Quasi-identifier column name '{0}' is blank")]
    BlankColumnName(String),

    #[error("Select at least one quasi-identifier column")]
    NoQuasiIdentifiers,
}

/// Builder for [`AnonymizationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnonymizationConfigBuilder {
    quasi_identifiers: Vec<String>,
    target_k: Option<usize>,
    text_columns: Vec<String>,
    pii_sample_rows: Option<usize>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    save_to_disk: Option<bool>,
}

impl AnonymizationConfigBuilder {
    /// Start from an existing configuration (e.g. one loaded from JSON).
    pub fn from_config(config: AnonymizationConfig) -> Self {
        Self {
            quasi_identifiers: config.quasi_identifiers,
            target_k: Some(config.target_k),
            text_columns: config.text_columns,
            pii_sample_rows: Some(config.pii_sample_rows),
            output_dir: Some(config.output_dir),
            output_name: config.output_name,
            save_to_disk: Some(config.save_to_disk),
        }
    }

    /// Add a single quasi-identifier column.
    pub fn quasi_identifier(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.quasi_identifiers.contains(&column) {
            self.quasi_identifiers.push(column);
        }
        self
    }

    /// Replace the quasi-identifier selection.
    ///
    /// Duplicate names are collapsed; first occurrence order is kept.
    pub fn quasi_identifiers<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quasi_identifiers.clear();
        for column in columns {
            self = self.quasi_identifier(column);
        }
        self
    }

    /// Set the minimum equivalence class size to aim for.
    pub fn target_k(mut self, k: usize) -> Self {
        self.target_k = Some(k);
        self
    }

    /// Set the columns that must be read as text.
    pub fn text_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set how many rows per column the PII scanner inspects.
    pub fn pii_sample_rows(mut self, rows: usize) -> Self {
        self.pii_sample_rows = Some(rows);
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Enable or disable saving the anonymized dataset to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnonymizationConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnonymizationConfig, ConfigValidationError> {
        let config = AnonymizationConfig {
            quasi_identifiers: self.quasi_identifiers,
            target_k: self.target_k.unwrap_or(DEFAULT_TARGET_K),
            text_columns: self.text_columns,
            pii_sample_rows: self.pii_sample_rows.unwrap_or(DEFAULT_PII_SAMPLE_ROWS),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from("./outputs")),
            output_name: self.output_name,
            save_to_disk: self.save_to_disk.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
