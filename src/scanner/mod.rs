//! Scan pipeline
//!
//! Ties the provider to the analytics for one (ticker, expiration) request:
//! fetch, aggregate, estimate max pain, derive signals.
//!
//! Fetch failures stop at this boundary. They are logged and reported as
//! [`ScanOutcome::NoData`]; the analytics never see partial data.

mod config;
mod pipeline;
mod refresh;

pub use config::*;
pub use pipeline::*;
pub use refresh::*;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::{ExposureProfile, MaxPainResult, StrikeSummary};
use crate::core::SpotQuote;

/// Everything computed for one (ticker, expiration) snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub ticker: String,
    pub expiration: NaiveDate,
    /// Underlying quote; `None` if the quote fetch failed
    pub quote: Option<SpotQuote>,
    pub summary: StrikeSummary,
    pub max_pain: MaxPainResult,
    /// First strike where put OI exceeds call OI
    pub gamma_flip: Option<Decimal>,
    /// Highest call OI strikes
    pub top_calls: Vec<(Decimal, u64)>,
    /// Highest put OI strikes
    pub top_puts: Vec<(Decimal, u64)>,
    pub exposure: ExposureProfile,
    pub generated_at: DateTime<Utc>,
}

impl ScanReport {
    /// Last price of the underlying, if known
    pub fn spot(&self) -> Option<f64> {
        self.quote.as_ref().and_then(|q| q.last)
    }
}

/// Result of one scan
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// Data was fetched and analysed
    Complete(Box<ScanReport>),
    /// Nothing to analyse; `reason` is meant for the user
    NoData {
        ticker: String,
        expiration: NaiveDate,
        reason: String,
    },
}

impl ScanOutcome {
    pub fn report(&self) -> Option<&ScanReport> {
        match self {
            ScanOutcome::Complete(report) => Some(&**report),
            ScanOutcome::NoData { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ScanOutcome::Complete(_))
    }
}
