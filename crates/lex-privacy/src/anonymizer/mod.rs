//! Anonymization driver.
//!
//! [`anonymize`] is the bare measure → check → generalize → re-measure pass.
//! [`Anonymizer`] wraps it with a validated [`AnonymizationConfig`], the
//! caller-side input checks, and a serializable [`AnonymizationSummary`].

mod driver;

pub use driver::anonymize;

use crate::config::AnonymizationConfig;
use crate::error::{AnonymizationError, Result, ResultExt};
use crate::measure::{equivalence_classes, records_at_risk};
use crate::types::{AnonymizationSummary, ColumnSummary, GeneralizationResult};
use crate::utils::{column_series, series_cells};
use polars::prelude::*;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};

/// Runs anonymization with a fixed configuration.
///
/// Holds no state between runs: every call to [`process`](Self::process)
/// works on the DataFrame it is given and returns a fresh outcome.
///
/// # Example
///
/// ```rust,ignore
/// use lex_privacy::{Anonymizer, AnonymizationConfig};
///
/// let config = AnonymizationConfig::builder()
///     .quasi_identifiers(["Age", "Pincode"])
///     .target_k(3)
///     .build()?;
///
/// let outcome = Anonymizer::new(config)?.process(&df)?;
/// println!("k: {} -> {}", outcome.result.k_before, outcome.result.k_after);
/// ```
#[derive(Debug, Clone)]
pub struct Anonymizer {
    config: AnonymizationConfig,
}

static_assertions::assert_impl_all!(Anonymizer: Send, Sync);

/// Result of [`Anonymizer::process`].
#[derive(Debug, Clone)]
pub struct AnonymizationOutcome {
    pub result: GeneralizationResult,
    pub summary: AnonymizationSummary,
}

impl Anonymizer {
    /// Create an anonymizer, rejecting configs that cannot drive a run.
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config.validate_for_run()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Check that `df` can be anonymized with the configured selection.
    pub fn validate_input(&self, df: &DataFrame) -> Result<()> {
        if df.width() == 0 {
            return Err(AnonymizationError::EmptySchema);
        }
        if self.config.quasi_identifiers.is_empty() {
            return Err(AnonymizationError::NoQuasiIdentifiers);
        }
        for name in &self.config.quasi_identifiers {
            column_series(df, name)?;
        }
        Ok(())
    }

    /// Measure the dataset without changing it.
    pub fn measure(&self, df: &DataFrame) -> Result<AnonymizationSummary> {
        let start = Instant::now();
        self.validate_input(df)?;

        let qi = self.config.quasi_identifiers.as_slice();
        let target_k = self.config.target_k;
        let classes = equivalence_classes(df, qi).context("While measuring k")?;
        let k = classes.iter().map(|c| c.size()).min().unwrap_or(0);
        let at_risk = records_at_risk(&classes, target_k);

        let mut column_summaries = Vec::with_capacity(qi.len());
        for name in qi {
            let series = column_series(df, name)?;
            let distinct = distinct_count(series)?;
            column_summaries.push(ColumnSummary {
                column: name.clone(),
                dtype_before: series.dtype().to_string(),
                dtype_after: series.dtype().to_string(),
                distinct_before: distinct,
                distinct_after: distinct,
                cells_generalized: 0,
            });
        }

        Ok(AnonymizationSummary {
            duration_ms: start.elapsed().as_millis() as u64,
            rows: df.height(),
            columns: df.width(),
            k_before: k,
            k_after: k,
            target_k,
            target_met: k >= target_k,
            generalization_applied: false,
            classes_before: classes.len(),
            classes_after: classes.len(),
            records_at_risk_before: at_risk,
            records_at_risk_after: at_risk,
            column_summaries,
            warnings: Vec::new(),
        })
    }

    /// Anonymize `df` and summarize what changed.
    pub fn process(&self, df: &DataFrame) -> Result<AnonymizationOutcome> {
        let start = Instant::now();
        self.validate_input(df)?;

        let qi = self.config.quasi_identifiers.as_slice();
        let target_k = self.config.target_k;
        info!(
            "Anonymizing {} rows over quasi-identifiers {:?} (target k = {})",
            df.height(),
            qi,
            target_k
        );

        let result = anonymize(df, qi, target_k)?;

        let classes_before = equivalence_classes(&result.original, qi)?;
        let classes_after = if result.generalized {
            equivalence_classes(&result.anonymized, qi)?
        } else {
            classes_before.clone()
        };

        let mut column_summaries = Vec::with_capacity(qi.len());
        for name in qi {
            column_summaries.push(summarize_column(&result, name)?);
        }

        let mut summary = AnonymizationSummary {
            duration_ms: 0,
            rows: df.height(),
            columns: df.width(),
            k_before: result.k_before,
            k_after: result.k_after,
            target_k,
            target_met: result.target_met(),
            generalization_applied: result.generalized,
            classes_before: classes_before.len(),
            classes_after: classes_after.len(),
            records_at_risk_before: records_at_risk(&classes_before, target_k),
            records_at_risk_after: records_at_risk(&classes_after, target_k),
            column_summaries,
            warnings: Vec::new(),
        };

        if df.height() == 0 {
            summary.add_warning("Dataset has no rows; k is reported as 0");
        } else if !result.target_met() {
            let message = format!(
                "Single-pass generalization reached k = {} but target is {}; {} record(s) remain in smaller classes",
                result.k_after, target_k, summary.records_at_risk_after
            );
            warn!("{}", message);
            summary.add_warning(message);
        }

        if result.k_after < result.k_before {
            // Per-cell generalization only merges classes, so this should not happen.
            let message = format!(
                "k decreased from {} to {} after generalization",
                result.k_before, result.k_after
            );
            warn!("{}", message);
            summary.add_warning(message);
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        Ok(AnonymizationOutcome { result, summary })
    }
}

fn distinct_count(series: &Series) -> Result<usize> {
    let distinct: HashSet<Option<String>> = series_cells(series)?
        .iter()
        .map(|cell| cell.to_text())
        .collect();
    Ok(distinct.len())
}

fn summarize_column(result: &GeneralizationResult, name: &str) -> Result<ColumnSummary> {
    let before = column_series(&result.original, name)?;
    let after = column_series(&result.anonymized, name)?;

    let before_cells = series_cells(before)?;
    let after_cells = series_cells(after)?;
    let cells_generalized = before_cells
        .iter()
        .zip(&after_cells)
        .filter(|(b, a)| b.to_text() != a.to_text())
        .count();

    Ok(ColumnSummary {
        column: name.to_string(),
        dtype_before: before.dtype().to_string(),
        dtype_after: after.dtype().to_string(),
        distinct_before: distinct_count(before)?,
        distinct_after: distinct_count(after)?,
        cells_generalized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn anonymizer(columns: &[&str], target_k: usize) -> Anonymizer {
        let config = AnonymizationConfig::builder()
            .quasi_identifiers(columns.iter().copied())
            .target_k(target_k)
            .save_to_disk(false)
            .build()
            .unwrap();
        Anonymizer::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_selection() {
        let config = AnonymizationConfig::default();
        let err = Anonymizer::new(config).unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_validate_input_rejects_zero_columns() {
        let err = anonymizer(&["Age"], 2)
            .validate_input(&DataFrame::empty())
            .unwrap_err();
        assert!(matches!(err, AnonymizationError::EmptySchema));
    }

    #[test]
    fn test_validate_input_rejects_unknown_column() {
        let df = df!["Age" => [25i64]].unwrap();
        let err = anonymizer(&["Pincode"], 2).validate_input(&df).unwrap_err();
        assert!(matches!(err, AnonymizationError::ColumnNotFound(name) if name == "Pincode"));
    }

    #[test]
    fn test_process_summary() {
        let df = df![
            "Pincode" => ["560034", "560034", "560091"],
            "Disease" => ["Flu", "Cold", "Flu"],
        ]
        .unwrap();

        let outcome = anonymizer(&["Pincode"], 2).process(&df).unwrap();
        let summary = &outcome.summary;

        assert_eq!(summary.k_before, 1);
        assert_eq!(summary.k_after, 3);
        assert!(summary.target_met);
        assert!(summary.generalization_applied);
        assert_eq!(summary.classes_before, 2);
        assert_eq!(summary.classes_after, 1);
        assert_eq!(summary.records_at_risk_before, 1);
        assert_eq!(summary.records_at_risk_after, 0);
        assert!(summary.warnings.is_empty());
        assert_eq!(
            summary.column_summaries,
            vec![ColumnSummary {
                column: "Pincode".to_string(),
                dtype_before: DataType::String.to_string(),
                dtype_after: DataType::String.to_string(),
                distinct_before: 2,
                distinct_after: 1,
                cells_generalized: 3,
            }]
        );
    }

    #[test]
    fn test_process_warns_when_target_missed() {
        let df = df!["Age" => [25i64, 26, 31]].unwrap();
        let outcome = anonymizer(&["Age"], 2).process(&df).unwrap();

        assert!(!outcome.summary.target_met);
        assert_eq!(outcome.summary.records_at_risk_after, 1);
        assert_eq!(outcome.summary.warnings.len(), 1);
    }

    #[test]
    fn test_measure_does_not_generalize() {
        let df = df!["Age" => [25i64, 26, 31]].unwrap();
        let summary = anonymizer(&["Age"], 2).measure(&df).unwrap();

        assert_eq!(summary.k_before, 1);
        assert_eq!(summary.k_after, 1);
        assert!(!summary.generalization_applied);
        assert_eq!(summary.records_at_risk_before, 3);
        assert_eq!(summary.column_summaries[0].cells_generalized, 0);
    }
}
