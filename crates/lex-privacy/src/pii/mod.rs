//! Pattern-based PII detection.
//!
//! Helps a user decide which columns to treat as quasi-identifiers (or drop
//! outright) before anonymizing. Detection is purely syntactic: a ten-digit
//! number is reported as a phone number whether or not it is one.

use crate::error::Result;
use crate::utils::{column_series, column_names, series_cells};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of personally identifiable information the scanner knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    Email,
    Phone,
    /// 12-digit Aadhaar number or `ddd-dd-dddd` SSN.
    NationalId,
    CreditCard,
    IpAddress,
}

impl PiiKind {
    /// All kinds, in detection order.
    pub const ALL: [PiiKind; 5] = [
        PiiKind::Email,
        PiiKind::Phone,
        PiiKind::NationalId,
        PiiKind::CreditCard,
        PiiKind::IpAddress,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PiiKind::Email => "Email",
            PiiKind::Phone => "Phone",
            PiiKind::NationalId => "Aadhaar/SSN",
            PiiKind::CreditCard => "Credit Card",
            PiiKind::IpAddress => "IP Address",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            PiiKind::Email => &EMAIL,
            PiiKind::Phone => &PHONE,
            PiiKind::NationalId => &NATIONAL_ID,
            PiiKind::CreditCard => &CREDIT_CARD,
            PiiKind::IpAddress => &IP_ADDRESS,
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// PII pattern regexes - compiled once on first use
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid regex: email")
});
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{10}\b").expect("Invalid regex: phone"));
static NATIONAL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{12}\b|\b\d{3}-\d{2}-\d{4}\b").expect("Invalid regex: national id")
});
static CREDIT_CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}-\d{4}-\d{4}-\d{4}\b").expect("Invalid regex: credit card")
});
static IP_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("Invalid regex: ip address")
});

/// A single PII occurrence in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiMatch {
    pub kind: PiiKind,
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
    pub value: String,
}

/// PII kinds found in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiFinding {
    pub column: String,
    pub kinds: Vec<PiiKind>,
}

/// Which kinds of PII occur anywhere in `text`, in detection order.
pub fn detect_pii(text: &str) -> Vec<PiiKind> {
    PiiKind::ALL
        .into_iter()
        .filter(|kind| kind.pattern().is_match(text))
        .collect()
}

/// Every PII occurrence in `text`, ordered by position.
pub fn find_pii(text: &str) -> Vec<PiiMatch> {
    let mut matches: Vec<PiiMatch> = PiiKind::ALL
        .into_iter()
        .flat_map(|kind| {
            kind.pattern().find_iter(text).map(move |m| PiiMatch {
                kind,
                start: m.start(),
                end: m.end(),
                value: m.as_str().to_string(),
            })
        })
        .collect();
    matches.sort_by_key(|m| (m.start, m.end));
    matches
}

/// Scan the first `sample_rows` cells of every column for PII.
///
/// The sampled cells of a column are rendered as text and joined with
/// spaces before matching. Only columns with at least one finding are
/// returned, in column order.
pub fn scan_dataframe(df: &DataFrame, sample_rows: usize) -> Result<Vec<PiiFinding>> {
    let mut findings = Vec::new();

    for name in column_names(df) {
        let series = column_series(df, &name)?;
        let sample = series.head(Some(sample_rows));
        let text = series_cells(&sample)?
            .iter()
            .map(|cell| cell.to_text().unwrap_or_else(|| "null".to_string()))
            .collect::<Vec<_>>()
            .join(" ");

        let kinds = detect_pii(&text);
        if !kinds.is_empty() {
            tracing::debug!("Column '{}' contains {:?}", name, kinds);
            findings.push(PiiFinding { column: name, kinds });
        }
    }

    Ok(findings)
}
