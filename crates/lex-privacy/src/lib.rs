//! k-Anonymity Library
//!
//! Measures and improves the k-anonymity of tabular datasets, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! - **k-Measurement**: partition rows by their quasi-identifier values and
//!   report the size of the smallest equivalence class
//! - **Field Generalization**: coarsen individual values by shape (postal
//!   codes, numbers, email addresses, free text)
//! - **Anonymization**: measure, generalize once if below target, re-measure
//! - **PII Detection**: flag columns holding emails, phone numbers, IDs,
//!   card numbers or IP addresses
//! - **CSV I/O and Reports**: encoding-tolerant loading, CSV export, JSON reports
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_privacy::{AnonymizationConfig, Anonymizer};
//! use lex_privacy::io::read_csv_file;
//!
//! let df = read_csv_file("people.csv", &["Pincode"])?;
//!
//! let config = AnonymizationConfig::builder()
//!     .quasi_identifiers(["Age", "Pincode"])
//!     .target_k(3)
//!     .build()?;
//!
//! let outcome = Anonymizer::new(config)?.process(&df)?;
//!
//! println!("k before: {}", outcome.result.k_before);
//! println!("k after:  {}", outcome.result.k_after);
//! println!("target met: {}", outcome.result.target_met());
//! ```
//!
//! # Generalization is single-pass
//!
//! When the dataset is already `target_k`-anonymous it is returned as-is.
//! Otherwise every quasi-identifier cell is generalized exactly once; there
//! is no search for a coarser level if the target is still missed. Check
//! [`GeneralizationResult::target_met`] and the warnings in
//! [`AnonymizationSummary`].

pub mod anonymizer;
pub mod config;
pub mod error;
pub mod generalizer;
pub mod io;
pub mod measure;
pub mod pii;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use anonymizer::{AnonymizationOutcome, Anonymizer, anonymize};
pub use config::{AnonymizationConfig, AnonymizationConfigBuilder, ConfigValidationError};
pub use error::{AnonymizationError, Result as AnonymizationResult, ResultExt};
pub use generalizer::{ValueShape, generalize, generalize_column, generalize_columns};
pub use measure::{EquivalenceClass, equivalence_classes, measure_k, records_at_risk};
pub use pii::{PiiFinding, PiiKind, PiiMatch, detect_pii, find_pii, scan_dataframe};
pub use reporting::{AnonymizationReport, ReportGenerator};
pub use types::{AnonymizationSummary, CellValue, ColumnSummary, GeneralizationResult};
