//! Stage 1: Aggregation
//!
//! Folds raw contracts into per-strike call/put figures.

use crate::core::OptionContract;

use super::StrikeSummary;

/// Aggregate contracts into a per-strike summary
///
/// Open interest and volume are summed per strike and side, so duplicate
/// strike/type rows accumulate. Delta and theta are overwritten by each
/// contract in turn (absent greeks write 0.0).
///
/// Contracts with an unrecognized type are skipped; the rest of the batch
/// is still aggregated.
pub fn aggregate<'a, I>(contracts: I) -> StrikeSummary
where
    I: IntoIterator<Item = &'a OptionContract>,
{
    let mut summary = StrikeSummary::new();
    let mut skipped = 0usize;

    for contract in contracts {
        let Some(side) = contract.option_type else {
            skipped += 1;
            continue;
        };

        let metrics = summary.upsert(contract.strike).side_mut(side);
        metrics.open_interest = metrics.open_interest.saturating_add(contract.open_interest);
        metrics.volume = metrics.volume.saturating_add(contract.volume);
        // Greeks keep the last row seen for the strike/side rather than an
        // aggregate. Duplicate rows therefore report only the final greek.
        metrics.delta = contract.delta.unwrap_or(0.0);
        metrics.theta = contract.theta.unwrap_or(0.0);
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} contracts with unrecognized type", skipped);
    }

    summary
}
