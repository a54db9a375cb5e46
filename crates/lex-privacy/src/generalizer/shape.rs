//! Value-shape classification.
//!
//! Every cell is classified into exactly one [`ValueShape`] by a fixed rule
//! order; the first matching rule wins.

use crate::types::CellValue;

/// Length of a postal-code-like digit string.
pub const POSTAL_CODE_LEN: usize = 6;

/// Strings must be longer than this (in characters) to be masked.
pub const GENERIC_MIN_EXCLUSIVE_LEN: usize = 4;

/// A number eligible for range bucketing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    /// Always finite.
    Float(f64),
}

/// The shape of a cell value, which decides how it is generalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueShape<'a> {
    /// Null / missing marker.
    Missing,
    /// Exactly six ASCII digits, e.g. a postal code.
    FixedWidthNumericString(&'a str),
    /// Integer or finite floating-point value.
    Numeric(Number),
    /// Text with exactly one `@`, split around it.
    EmailLike { local: &'a str, domain: &'a str },
    /// Any other text longer than four characters.
    GenericString(&'a str),
    /// Everything else: short text, booleans, infinities, other dtypes.
    Other,
}

impl<'a> ValueShape<'a> {
    /// Classify a cell. Rule order:
    /// missing, six-digit string, number, email, long string, other.
    pub fn classify(value: &'a CellValue) -> Self {
        match value {
            CellValue::Missing => Self::Missing,
            CellValue::Text(s) => Self::classify_text(s),
            CellValue::Integer(i) => Self::Numeric(Number::Int(*i)),
            CellValue::Float(f) if f.is_finite() => Self::Numeric(Number::Float(*f)),
            CellValue::Float(_) | CellValue::Boolean(_) | CellValue::Other(_) => Self::Other,
        }
    }

    fn classify_text(s: &'a str) -> Self {
        if s.len() == POSTAL_CODE_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            return Self::FixedWidthNumericString(s);
        }

        if s.matches('@').count() == 1 {
            if let Some((local, domain)) = s.split_once('@') {
                return Self::EmailLike { local, domain };
            }
        }

        if s.chars().count() > GENERIC_MIN_EXCLUSIVE_LEN {
            return Self::GenericString(s);
        }

        Self::Other
    }
}
