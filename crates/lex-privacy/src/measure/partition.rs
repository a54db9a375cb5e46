//! Equivalence class partitioning.

use crate::error::Result;
use crate::utils::{column_series, series_cells};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Values shared by every row of a class, one entry per selected column.
/// `None` marks a missing cell.
pub type ClassKey = Vec<Option<String>>;

/// A set of rows with identical values across the selected columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    pub key: ClassKey,
    /// Row indices in ascending order.
    pub rows: Vec<usize>,
}

impl EquivalenceClass {
    pub fn size(&self) -> usize {
        self.rows.len()
    }
}

/// Partition the rows of `df` by their values in `columns`.
///
/// Classes are returned in order of first appearance. An empty column set
/// yields no classes: without attributes there is nothing to group on.
pub fn equivalence_classes<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> Result<Vec<EquivalenceClass>> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let mut column_keys: Vec<Vec<Option<String>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let series = column_series(df, name.as_ref())?;
        let keys = series_cells(series)?
            .iter()
            .map(|cell| cell.to_text())
            .collect();
        column_keys.push(keys);
    }

    let mut classes: Vec<EquivalenceClass> = Vec::new();
    let mut index: HashMap<ClassKey, usize> = HashMap::new();

    for row in 0..df.height() {
        let key: ClassKey = column_keys.iter().map(|keys| keys[row].clone()).collect();
        match index.get(&key) {
            Some(&pos) => classes[pos].rows.push(row),
            None => {
                index.insert(key.clone(), classes.len());
                classes.push(EquivalenceClass {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    debug!(
        "Partitioned {} rows into {} equivalence classes",
        df.height(),
        classes.len()
    );

    Ok(classes)
}

/// Size of the smallest equivalence class over `columns`.
///
/// Returns 0 when `columns` is empty or the dataset has no rows: there is
/// no anonymity guarantee to speak of in either case.
pub fn measure_k<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<usize> {
    let classes = equivalence_classes(df, columns)?;
    Ok(classes.iter().map(EquivalenceClass::size).min().unwrap_or(0))
}

/// Number of rows living in classes smaller than `target_k`.
pub fn records_at_risk(classes: &[EquivalenceClass], target_k: usize) -> usize {
    classes
        .iter()
        .filter(|class| class.size() < target_k)
        .map(EquivalenceClass::size)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnonymizationError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_measure_k_pincode_singleton() {
        let df = df!["Pincode" => ["560034", "560034", "560091"]].unwrap();
        assert_eq!(measure_k(&df, &["Pincode"]).unwrap(), 1);
    }

    #[test]
    fn test_measure_k_empty_columns_is_zero() {
        let df = df!["Age" => [30i64, 30, 30, 30]].unwrap();
        let none: [&str; 0] = [];
        assert_eq!(measure_k(&df, &none).unwrap(), 0);
    }

    #[test]
    fn test_measure_k_empty_dataset_is_zero() {
        let df = df!["Age" => Vec::<i64>::new()].unwrap();
        assert_eq!(measure_k(&df, &["Age"]).unwrap(), 0);
    }

    #[test]
    fn test_measure_k_multiple_columns() {
        let df = df![
            "Age" => [30i64, 30, 30, 41],
            "City" => ["Pune", "Pune", "Goa", "Goa"],
        ]
        .unwrap();

        assert_eq!(measure_k(&df, &["Age"]).unwrap(), 1);
        assert_eq!(measure_k(&df, &["City"]).unwrap(), 2);
        assert_eq!(measure_k(&df, &["Age", "City"]).unwrap(), 1);
    }

    #[test]
    fn test_missing_values_form_their_own_class() {
        let df = df!["City" => [Some("Pune"), None, None, Some("Pune")]].unwrap();
        let classes = equivalence_classes(&df, &["City"]).unwrap();

        assert_eq!(
            classes,
            vec![
                EquivalenceClass {
                    key: vec![Some("Pune".to_string())],
                    rows: vec![0, 3],
                },
                EquivalenceClass {
                    key: vec![None],
                    rows: vec![1, 2],
                },
            ]
        );
        assert_eq!(measure_k(&df, &["City"]).unwrap(), 2);
    }

    #[test]
    fn test_measure_k_independent_of_row_order() {
        let a = df!["Age" => [25i64, 31, 25, 40, 40]].unwrap();
        let b = df!["Age" => [40i64, 25, 40, 31, 25]].unwrap();
        assert_eq!(measure_k(&a, &["Age"]).unwrap(), measure_k(&b, &["Age"]).unwrap());
    }

    #[test]
    fn test_unknown_column_is_reported() {
        let df = df!["Age" => [25i64]].unwrap();
        let err = measure_k(&df, &["Pincode"]).unwrap_err();
        assert!(matches!(err, AnonymizationError::ColumnNotFound(_)));
    }

    #[test]
    fn test_records_at_risk() {
        let df = df!["Age" => [25i64, 25, 25, 31, 40, 40]].unwrap();
        let classes = equivalence_classes(&df, &["Age"]).unwrap();

        assert_eq!(records_at_risk(&classes, 2), 1);
        assert_eq!(records_at_risk(&classes, 3), 3);
        assert_eq!(records_at_risk(&classes, 4), 6);
    }
}
