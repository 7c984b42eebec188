//! Spot quote for the underlying

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spot price quote
///
/// Every market field is optional; providers routinely omit `high`/`low`
/// outside the session and rarely send an IV summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    /// Last traded price
    pub last: Option<f64>,
    /// Session high
    pub high: Option<f64>,
    /// Session low
    pub low: Option<f64>,
    /// Session volume
    pub volume: Option<u64>,
    /// Mean implied volatility, if the provider reports one
    pub iv: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl SpotQuote {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last: None,
            high: None,
            low: None,
            volume: None,
            iv: None,
            timestamp: Utc::now(),
        }
    }
}
