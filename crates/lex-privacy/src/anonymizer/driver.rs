//! Single-pass k-anonymization.

use crate::error::Result;
use crate::generalizer::generalize_columns;
use crate::measure::measure_k;
use crate::types::GeneralizationResult;
use polars::prelude::*;
use tracing::{info, warn};

/// Bring `df` toward `target_k`-anonymity over `quasi_identifiers`.
///
/// 1. Measure the current k.
/// 2. If it already reaches `target_k`, return the dataset unchanged.
/// 3. Otherwise generalize every selected column once and measure again.
///
/// There is no retry with coarser rules: when one pass is not enough,
/// the returned `k_after` stays below `target_k` and the caller decides
/// what to do with that.
///
/// Callers are expected to have checked that `quasi_identifiers` is non-empty
/// and `target_k >= 2`; see [`Anonymizer`](super::Anonymizer).
pub fn anonymize<S: AsRef<str>>(
    df: &DataFrame,
    quasi_identifiers: &[S],
    target_k: usize,
) -> Result<GeneralizationResult> {
    let quasi_identifiers: Vec<String> = quasi_identifiers
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();

    let k_before = measure_k(df, quasi_identifiers.as_slice())?;
    info!("Current dataset k = {}", k_before);

    if k_before >= target_k {
        info!("Dataset already satisfies {}-anonymity", target_k);
        return Ok(GeneralizationResult {
            original: df.clone(),
            anonymized: df.clone(),
            quasi_identifiers,
            target_k,
            k_before,
            k_after: k_before,
            generalized: false,
        });
    }

    info!(
        "Dataset does not satisfy {}-anonymity; generalizing {} column(s)",
        target_k,
        quasi_identifiers.len()
    );

    let anonymized = generalize_columns(df, quasi_identifiers.as_slice())?;
    let k_after = measure_k(&anonymized, quasi_identifiers.as_slice())?;

    if k_after >= target_k {
        info!("After generalization, new k = {}", k_after);
    } else {
        warn!(
            "After generalization, new k = {} is still below target {}",
            k_after, target_k
        );
    }

    Ok(GeneralizationResult {
        original: df.clone(),
        anonymized,
        quasi_identifiers,
        target_k,
        k_before,
        k_after,
        generalized: true,
    })
}
