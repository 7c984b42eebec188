//! Stage 2: Max-pain estimation
//!
//! For each observed strike T, total pain is the intrinsic value option
//! holders would collect if the underlying settled at T, weighted by open
//! interest (or volume). Max pain is the T with the lowest total.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::core::{OptionType, ScannerError, ScannerResult};

use super::{MaxPainResult, Metric, PainWeighting, StrikeSummary};

/// Compute the max-pain strike of a summary
///
/// Candidates are exactly the strikes present in `summary`. Ties resolve to
/// the lowest strike.
///
/// # Errors
/// [`ScannerError::EmptyInput`] if `summary` has no strikes,
/// [`ScannerError::InvalidInput`] if a pain total overflows.
pub fn max_pain(summary: &StrikeSummary, weighting: PainWeighting) -> ScannerResult<MaxPainResult> {
    if summary.is_empty() {
        return Err(ScannerError::EmptyInput);
    }

    let mut pain_by_strike = BTreeMap::new();
    let mut best: Option<(Decimal, Decimal)> = None;

    // BTreeMap iteration is ascending, so only a strict improvement moves
    // the minimum and the lowest strike wins ties.
    for (target, _) in summary.iter() {
        let pain = total_pain(summary, target, weighting)?;
        pain_by_strike.insert(target, pain);

        if best.map_or(true, |(_, best_pain)| pain < best_pain) {
            best = Some((target, pain));
        }
    }

    let (strike, pain) = best.ok_or(ScannerError::EmptyInput)?;
    tracing::debug!(
        "Max pain ({}) at {} with total pain {} over {} strikes",
        weighting,
        strike,
        pain,
        summary.len()
    );

    Ok(MaxPainResult {
        strike,
        pain,
        weighting,
        pain_by_strike,
    })
}

/// Aggregate holder payoff if the underlying settles at `settle`
///
/// Strikes equal to `settle` contribute nothing in every mode.
///
/// # Errors
/// [`ScannerError::InvalidInput`] if the weighted payoff exceeds the
/// `Decimal` range.
pub fn total_pain(
    summary: &StrikeSummary,
    settle: Decimal,
    weighting: PainWeighting,
) -> ScannerResult<Decimal> {
    summary
        .iter()
        .try_fold(Decimal::ZERO, |acc, (strike, entry)| {
            let pain = match weighting {
                PainWeighting::OpenInterest => add(
                    side_pain(entry.call.open_interest, OptionType::Call, settle, strike)?,
                    side_pain(entry.put.open_interest, OptionType::Put, settle, strike)?,
                    settle,
                )?,
                PainWeighting::Volume => add(
                    side_pain(entry.call.volume, OptionType::Call, settle, strike)?,
                    side_pain(entry.put.volume, OptionType::Put, settle, strike)?,
                    settle,
                )?,
                PainWeighting::Combined => weigh(
                    entry.combined(Metric::OpenInterest),
                    (settle - strike).abs(),
                    settle,
                )?,
            };
            add(acc, pain, settle)
        })
}

fn side_pain(weight: u64, side: OptionType, settle: Decimal, strike: Decimal) -> ScannerResult<Decimal> {
    weigh(weight, side.intrinsic(settle, strike), settle)
}

fn weigh(weight: u64, payoff: Decimal, settle: Decimal) -> ScannerResult<Decimal> {
    Decimal::from(weight)
        .checked_mul(payoff)
        .ok_or_else(|| overflow(settle))
}

fn add(a: Decimal, b: Decimal, settle: Decimal) -> ScannerResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(settle))
}

fn overflow(settle: Decimal) -> ScannerError {
    ScannerError::invalid_input(format!("Pain at {} overflows the decimal range", settle))
}
