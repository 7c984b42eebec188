//! Open-interest aggregation and max-pain estimation
//!
//! Turns an option chain into per-strike figures and derived signals.
//!
//! Pipeline:
//! 1. **Aggregation**: fold contracts into a [`StrikeSummary`] keyed by strike
//! 2. **Max pain**: find the settlement strike minimizing aggregate holder payoff
//! 3. **Signals**: gamma-flip point, top-N strikes, call/put exposure profile
//!
//! Every stage is a pure function of its input.

mod aggregate;
mod max_pain;
mod signals;

pub use aggregate::*;
pub use max_pain::*;
pub use signals::*;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::{OptionType, ScannerError};

/// Per-side figures at one strike
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeMetrics {
    /// Summed open interest
    pub open_interest: u64,
    /// Summed volume
    pub volume: u64,
    /// Delta of the last contract folded in
    pub delta: f64,
    /// Theta of the last contract folded in
    pub theta: f64,
}

impl StrikeMetrics {
    /// Value of the selected metric
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::OpenInterest => self.open_interest,
            Metric::Volume => self.volume,
        }
    }
}

/// Call and put figures at one strike
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeEntry {
    pub call: StrikeMetrics,
    pub put: StrikeMetrics,
}

impl StrikeEntry {
    pub fn side(&self, side: OptionType) -> &StrikeMetrics {
        match side {
            OptionType::Call => &self.call,
            OptionType::Put => &self.put,
        }
    }

    fn side_mut(&mut self, side: OptionType) -> &mut StrikeMetrics {
        match side {
            OptionType::Call => &mut self.call,
            OptionType::Put => &mut self.put,
        }
    }

    /// Call OI minus put OI
    pub fn net_open_interest(&self) -> i128 {
        i128::from(self.call.open_interest) - i128::from(self.put.open_interest)
    }

    /// Call plus put value of the selected metric
    pub fn combined(&self, metric: Metric) -> u64 {
        self.call.get(metric).saturating_add(self.put.get(metric))
    }
}

/// Per-strike summary of an option chain, iterated in ascending strike order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeSummary {
    strikes: BTreeMap<Decimal, StrikeEntry>,
}

impl StrikeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `strike`, inserted zeroed if absent
    pub(crate) fn upsert(&mut self, strike: Decimal) -> &mut StrikeEntry {
        self.strikes.entry(strike.normalize()).or_default()
    }

    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    pub fn get(&self, strike: Decimal) -> Option<&StrikeEntry> {
        self.strikes.get(&strike)
    }

    /// Entries in ascending strike order
    pub fn iter(&self) -> impl Iterator<Item = (Decimal, &StrikeEntry)> + '_ {
        self.strikes.iter().map(|(k, v)| (*k, v))
    }

    /// All strikes, ascending
    pub fn strikes(&self) -> Vec<Decimal> {
        self.strikes.keys().copied().collect()
    }

    /// Total of `metric` on one side across all strikes
    pub fn total(&self, metric: Metric, side: OptionType) -> u64 {
        self.strikes.values().map(|e| e.side(side).get(metric)).sum()
    }

    /// Put/call ratio of `metric`, `None` when there is no call-side figure
    pub fn put_call_ratio(&self, metric: Metric) -> Option<f64> {
        let calls = self.total(metric, OptionType::Call);
        if calls == 0 {
            return None;
        }
        Some(self.total(metric, OptionType::Put) as f64 / calls as f64)
    }
}

/// Quantity a signal or weighting reads from [`StrikeMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OpenInterest,
    Volume,
}

/// Weighting policy for the max-pain estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainWeighting {
    /// Call OI below the settlement strike, put OI above it
    #[default]
    #[serde(alias = "oi", alias = "open-interest")]
    OpenInterest,
    /// Same as `OpenInterest` with volume in place of OI
    #[serde(alias = "vol")]
    Volume,
    /// Call plus put OI on both sides of the settlement strike
    #[serde(alias = "oi_combined", alias = "oi-combined")]
    Combined,
}

impl PainWeighting {
    pub fn label(&self) -> &'static str {
        match self {
            PainWeighting::OpenInterest => "oi",
            PainWeighting::Volume => "volume",
            PainWeighting::Combined => "combined",
        }
    }
}

impl fmt::Display for PainWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Keep in step with the serde aliases on `PainWeighting`.
impl FromStr for PainWeighting {
    type Err = ScannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oi" | "open_interest" | "open-interest" => Ok(PainWeighting::OpenInterest),
            "volume" | "vol" => Ok(PainWeighting::Volume),
            "combined" | "oi_combined" | "oi-combined" => Ok(PainWeighting::Combined),
            other => Err(ScannerError::invalid_input(format!(
                "unknown weighting '{}' (expected oi, volume or combined)",
                other
            ))),
        }
    }
}

/// Result of the max-pain estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxPainResult {
    /// Strike with the lowest total pain
    pub strike: Decimal,
    /// Total pain at `strike`
    pub pain: Decimal,
    /// Weighting used
    pub weighting: PainWeighting,
    /// Total pain for every candidate strike
    pub pain_by_strike: BTreeMap<Decimal, Decimal>,
}

impl MaxPainResult {
    /// Signed distance from spot to the max-pain strike
    pub fn distance_from(&self, spot: Decimal) -> Decimal {
        self.strike - spot
    }
}
