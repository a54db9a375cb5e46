//! Report generation module.
//!
//! [`AnonymizationReport`] is the single report shape used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_privacy::reporting::{AnonymizationReport, ReportGenerator};
//!
//! let report = ReportGenerator::build_report("data/people.csv", None, &outcome.summary, &outcome.result.quasi_identifiers, &[]);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"), None);
//! generator.write_dataset(&outcome.result.anonymized)?;
//! generator.write_report_to_file(&report, "people")?;
//! ```

mod generator;

pub use generator::{AnonymizationReport, ReportGenerator};
