//! Stage 3: Secondary signals
//!
//! Cheap derived views of a [`StrikeSummary`]. None of these model true
//! dealer gamma; they are open-interest threshold and ranking helpers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::OptionType;

use super::{Metric, StrikeSummary};

/// First strike (ascending) where call OI falls below put OI
///
/// Returns `None` when call OI is at least put OI at every strike.
pub fn gamma_flip(summary: &StrikeSummary) -> Option<Decimal> {
    summary
        .iter()
        .find(|(_, entry)| entry.net_open_interest() < 0)
        .map(|(strike, _)| strike)
}

/// The `n` strikes with the highest `metric` on `side`, highest first
///
/// Order among equal values follows the stable sort and is not part of the
/// contract.
pub fn top_strikes(
    summary: &StrikeSummary,
    metric: Metric,
    side: OptionType,
    n: usize,
) -> Vec<(Decimal, u64)> {
    let mut ranked: Vec<(Decimal, u64)> = summary
        .iter()
        .map(|(strike, entry)| (strike, entry.side(side).get(metric)))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// One bar pair of the exposure profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureRow {
    pub strike: Decimal,
    /// Call OI, drawn upward
    pub call: i128,
    /// Put OI negated, drawn downward
    pub put: i128,
}

impl ExposureRow {
    pub fn net(&self) -> i128 {
        self.call + self.put
    }
}

/// Call OI against negated put OI per strike, with the spot marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureProfile {
    pub rows: Vec<ExposureRow>,
    /// Spot price of the underlying, if a quote was available
    pub spot: Option<f64>,
}

impl ExposureProfile {
    pub fn from_summary(summary: &StrikeSummary, spot: Option<f64>) -> Self {
        let rows = summary
            .iter()
            .map(|(strike, entry)| ExposureRow {
                strike,
                call: i128::from(entry.call.open_interest),
                put: -i128::from(entry.put.open_interest),
            })
            .collect();

        Self { rows, spot }
    }

    /// Largest bar magnitude on either side (for scaling a chart)
    pub fn max_magnitude(&self) -> i128 {
        self.rows
            .iter()
            .map(|r| r.call.max(-r.put))
            .max()
            .unwrap_or(0)
    }

    /// Index of the first row whose strike is at or above spot
    ///
    /// `rows.len()` when spot is above every strike; `None` without spot
    /// or rows.
    pub fn spot_index(&self) -> Option<usize> {
        let spot = self.spot?;
        let spot = Decimal::try_from(spot).ok()?;
        if self.rows.is_empty() {
            return None;
        }
        Some(
            self.rows
                .iter()
                .position(|r| r.strike >= spot)
                .unwrap_or(self.rows.len()),
        )
    }
}
