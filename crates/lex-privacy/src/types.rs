use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Owned view of a single dataset cell.
///
/// Polars stores a column with one dtype, so within a column every present
/// value maps to the same variant. `NaN` is treated as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Any other dtype (dates, durations, ...), kept in rendered form.
    Other(String),
}

impl CellValue {
    /// Build a cell view from a Polars value.
    pub fn from_any(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Missing,
            AnyValue::String(s) => Self::Text((*s).to_string()),
            AnyValue::StringOwned(s) => Self::Text(s.to_string()),
            AnyValue::Boolean(b) => Self::Boolean(*b),
            AnyValue::Int8(v) => Self::Integer(i64::from(*v)),
            AnyValue::Int16(v) => Self::Integer(i64::from(*v)),
            AnyValue::Int32(v) => Self::Integer(i64::from(*v)),
            AnyValue::Int64(v) => Self::Integer(*v),
            AnyValue::UInt8(v) => Self::Integer(i64::from(*v)),
            AnyValue::UInt16(v) => Self::Integer(i64::from(*v)),
            AnyValue::UInt32(v) => Self::Integer(i64::from(*v)),
            AnyValue::UInt64(v) => match i64::try_from(*v) {
                Ok(i) => Self::Integer(i),
                Err(_) => Self::Float(*v as f64),
            },
            AnyValue::Float32(v) => Self::from_float(f64::from(*v)),
            AnyValue::Float64(v) => Self::from_float(*v),
            other => Self::Other(format!("{other}")),
        }
    }

    fn from_float(v: f64) -> Self {
        if v.is_nan() {
            Self::Missing
        } else {
            Self::Float(v)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Text rendering of the cell; `None` for missing cells.
    ///
    /// Also serves as the exact-equality key when partitioning rows, so all
    /// missing cells of a column fall into the same class.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Text(s) | Self::Other(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::from_float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Outcome of one anonymization pass.
///
/// `anonymized` always has the same row count, column names and row order
/// as `original`. When the dataset already met the target, both frames are
/// identical and `generalized` is false.
#[derive(Debug, Clone)]
pub struct GeneralizationResult {
    pub original: DataFrame,
    pub anonymized: DataFrame,
    pub quasi_identifiers: Vec<String>,
    pub target_k: usize,
    /// k measured on the input.
    pub k_before: usize,
    /// k measured on `anonymized` (equals `k_before` when nothing was done).
    pub k_after: usize,
    /// Whether field generalization was applied.
    pub generalized: bool,
}

impl GeneralizationResult {
    /// Whether the achieved k satisfies the requested threshold.
    pub fn target_met(&self) -> bool {
        self.k_after >= self.target_k
    }
}

// ============================================================================
// Run Summary Types
// ============================================================================

/// Serializable summary of an anonymization run, for display and reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows: usize,
    pub columns: usize,

    pub k_before: usize,
    pub k_after: usize,
    pub target_k: usize,
    pub target_met: bool,
    pub generalization_applied: bool,

    /// Number of equivalence classes before generalization.
    pub classes_before: usize,
    /// Number of equivalence classes after generalization.
    pub classes_after: usize,
    /// Rows in classes smaller than `target_k`, before generalization.
    pub records_at_risk_before: usize,
    /// Rows in classes smaller than `target_k`, after generalization.
    pub records_at_risk_after: usize,

    /// Per quasi-identifier column details.
    pub column_summaries: Vec<ColumnSummary>,

    /// Warnings and notes generated during the run.
    pub warnings: Vec<String>,
}

impl AnonymizationSummary {
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Percentage of rows sitting in too-small classes after the run.
    pub fn records_at_risk_percentage(&self) -> f32 {
        if self.rows == 0 {
            0.0
        } else {
            (self.records_at_risk_after as f32 / self.rows as f32) * 100.0
        }
    }
}

/// What happened to one quasi-identifier column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub dtype_before: String,
    pub dtype_after: String,
    pub distinct_before: usize,
    pub distinct_after: usize,
    /// Cells whose value changed.
    pub cells_generalized: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_any_numeric_and_text() {
        assert_eq!(CellValue::from_any(&AnyValue::Int32(25)), CellValue::Integer(25));
        assert_eq!(CellValue::from_any(&AnyValue::UInt8(7)), CellValue::Integer(7));
        assert_eq!(CellValue::from_any(&AnyValue::Float64(2.5)), CellValue::Float(2.5));
        assert_eq!(
            CellValue::from_any(&AnyValue::String("560034")),
            CellValue::Text("560034".to_string())
        );
        assert_eq!(CellValue::from_any(&AnyValue::Boolean(true)), CellValue::Boolean(true));
    }

    #[test]
    fn test_null_and_nan_are_missing() {
        assert!(CellValue::from_any(&AnyValue::Null).is_missing());
        assert!(CellValue::from_any(&AnyValue::Float64(f64::NAN)).is_missing());
        assert!(CellValue::from(None::<i64>).is_missing());
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let value = CellValue::from_any(&AnyValue::UInt64(u64::MAX));
        assert!(matches!(value, CellValue::Float(_)));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Missing.to_text(), None);
        assert_eq!(CellValue::Integer(-3).to_text(), Some("-3".to_string()));
        assert_eq!(CellValue::from("a").to_text(), Some("a".to_string()));
    }

    #[test]
    fn test_target_met() {
        let df = DataFrame::empty();
        let result = GeneralizationResult {
            original: df.clone(),
            anonymized: df,
            quasi_identifiers: vec!["Age".to_string()],
            target_k: 3,
            k_before: 1,
            k_after: 2,
            generalized: true,
        };
        assert!(!result.target_met());
    }

    #[test]
    fn test_records_at_risk_percentage() {
        let summary = AnonymizationSummary {
            rows: 4,
            records_at_risk_after: 1,
            ..Default::default()
        };
        assert_eq!(summary.records_at_risk_percentage(), 25.0);
        assert_eq!(AnonymizationSummary::default().records_at_risk_percentage(), 0.0);
    }
}
