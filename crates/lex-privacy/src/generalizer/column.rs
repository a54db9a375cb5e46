//! Column-level application of the generalization rules.

use super::rules::generalize;
use crate::error::Result;
use crate::utils::{DtypeCategory, column_series, get_dtype_category, series_cells};
use polars::prelude::*;
use tracing::debug;

/// Generalize every cell of a column.
///
/// Numeric and text columns come back as text columns, with missing cells
/// kept as nulls. Columns of any other dtype are returned unchanged, since
/// none of their values match a generalization rule.
pub fn generalize_column(series: &Series) -> Result<Series> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric | DtypeCategory::String => {
            let generalized: Vec<Option<String>> = series_cells(series)?
                .iter()
                .map(|cell| generalize(cell).to_text())
                .collect();
            Ok(Series::new(series.name().clone(), generalized))
        }
        _ => {
            debug!(
                "Column '{}' has dtype {:?}; nothing to generalize",
                series.name(),
                series.dtype()
            );
            Ok(series.clone())
        }
    }
}

/// Return a copy of `df` with the listed columns generalized.
///
/// Row count, row order and the column set are preserved; columns not
/// listed are copied untouched.
pub fn generalize_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in columns {
        let name = name.as_ref();
        let generalized = generalize_column(column_series(df, name)?)?;
        out.replace(name, generalized)?;
        debug!("Generalized column '{}'", name);
    }
    Ok(out)
}
