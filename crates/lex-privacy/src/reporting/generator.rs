use crate::config::DEFAULT_OUTPUT_NAME;
use crate::error::Result;
use crate::io::write_csv_file;
use crate::pii::PiiFinding;
use crate::types::AnonymizationSummary;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Report of one anonymization (or measurement) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the anonymized dataset (if written)
    pub output_file: Option<String>,

    // Privacy setup
    pub quasi_identifiers: Vec<String>,
    pub target_k: usize,

    // Outcome
    pub k_before: usize,
    pub k_after: usize,
    pub target_met: bool,
    pub generalization_applied: bool,

    /// Full run summary
    pub summary: AnonymizationSummary,

    /// Columns that look like they hold PII
    pub pii_findings: Vec<PiiFinding>,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    /// Path the anonymized dataset is written to.
    pub fn dataset_path(&self) -> PathBuf {
        let file_name = self.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME);
        self.output_dir.join(format!("{}.csv", file_name))
    }

    /// Assemble a report from a run summary.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        summary: &AnonymizationSummary,
        quasi_identifiers: &[String],
        pii_findings: &[PiiFinding],
    ) -> AnonymizationReport {
        AnonymizationReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(str::to_string),
            quasi_identifiers: quasi_identifiers.to_vec(),
            target_k: summary.target_k,
            k_before: summary.k_before,
            k_after: summary.k_after,
            target_met: summary.target_met,
            generalization_applied: summary.generalization_applied,
            summary: summary.clone(),
            pii_findings: pii_findings.to_vec(),
        }
    }

    /// Write the anonymized dataset as CSV and return its path.
    pub fn write_dataset(&self, df: &DataFrame) -> Result<PathBuf> {
        let path = self.dataset_path();
        write_csv_file(df, &path)?;
        Ok(path)
    }

    /// Write a report to `<output_dir>/<stem>_report.json` and return its path.
    pub fn write_report_to_file(&self, report: &AnonymizationReport, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let report_path = self.output_dir.join(format!("{}_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
