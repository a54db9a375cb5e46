//! k-measurement over a chosen set of quasi-identifier columns.
//!
//! Rows are partitioned into equivalence classes by exact equality of their
//! values across the selected columns. Missing cells compare equal to each
//! other and to nothing else, so they form a class of their own rather than
//! acting as a wildcard. k is the size of the smallest class.

mod partition;

pub use partition::{EquivalenceClass, equivalence_classes, measure_k, records_at_risk};
