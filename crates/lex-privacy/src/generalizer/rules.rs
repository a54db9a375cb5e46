//! Per-cell generalization rules.

use super::shape::{Number, ValueShape};
use crate::types::CellValue;

/// Marker standing in for hidden characters.
pub const MASK: &str = "***";

/// Width of the numeric ranges values are bucketed into.
pub const BUCKET_WIDTH: i64 = 5;

/// Digits of a postal code kept in the clear.
pub const POSTAL_PREFIX_LEN: usize = 3;

/// Characters of an email's local part kept in the clear.
pub const EMAIL_LOCAL_PREFIX_LEN: usize = 2;

/// Characters of a long string kept in the clear.
pub const GENERIC_PREFIX_LEN: usize = 3;

/// Map a single cell to its coarsened representative.
///
/// Pure and total: unrecognized shapes are returned unchanged.
///
/// Known weakness: the mask is a fixed `***` rather than one character per
/// hidden character, so the output format still reveals which rule fired.
/// A generalized postal code (`560***`) is distinguishable from a generalized
/// free-text value (`Ban***`) by its digit prefix.
pub fn generalize(value: &CellValue) -> CellValue {
    match ValueShape::classify(value) {
        ValueShape::Missing | ValueShape::Other => value.clone(),
        ValueShape::FixedWidthNumericString(digits) => {
            CellValue::Text(format!("{}{}", &digits[..POSTAL_PREFIX_LEN], MASK))
        }
        ValueShape::Numeric(number) => CellValue::Text(range_label(number)),
        ValueShape::EmailLike { local, domain } => CellValue::Text(format!(
            "{}{}@{}",
            prefix(local, EMAIL_LOCAL_PREFIX_LEN),
            MASK,
            domain
        )),
        ValueShape::GenericString(s) => {
            CellValue::Text(format!("{}{}", prefix(s, GENERIC_PREFIX_LEN), MASK))
        }
    }
}

/// Label of the width-5 range containing `number`, e.g. `27 -> "25-29"`.
///
/// The range starts at `floor(value / 5) * 5`, rounding toward negative
/// infinity, and the label shows both inclusive integer bounds.
pub fn range_label(number: Number) -> String {
    match number {
        Number::Int(i) => {
            let start = i128::from(i.div_euclid(BUCKET_WIDTH)) * i128::from(BUCKET_WIDTH);
            format!("{}-{}", start, start + i128::from(BUCKET_WIDTH) - 1)
        }
        Number::Float(f) => {
            let width = BUCKET_WIDTH as f64;
            // `+ 0.0` turns a -0.0 start into 0.0
            let start = (f / width).floor() * width + 0.0;
            format!("{:.0}-{:.0}", start, start + width - 1.0)
        }
    }
}

fn prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
