//! Field generalization.
//!
//! Each cell is mapped to a coarser representative according to its shape:
//!
//! | Shape                     | Example            | Result        |
//! |---------------------------|--------------------|---------------|
//! | missing                   | `null`             | `null`        |
//! | six-digit string          | `"560034"`         | `"560***"`    |
//! | integer / float           | `27`, `27.5`       | `"25-29"`     |
//! | text with exactly one `@` | `"john.doe@x.com"` | `"jo***@x.com"` |
//! | text longer than 4 chars  | `"Bangalore"`      | `"Ban***"`    |
//! | anything else             | `"Pune"`, `true`   | unchanged     |
//!
//! Rules are tried in table order and the first match wins.

mod column;
mod rules;
mod shape;

pub use column::{generalize_column, generalize_columns};
pub use rules::{
    BUCKET_WIDTH, EMAIL_LOCAL_PREFIX_LEN, GENERIC_PREFIX_LEN, MASK, POSTAL_PREFIX_LEN, generalize,
    range_label,
};
pub use shape::{Number, ValueShape};
