//! OptionsScanner - Main facade for the scan pipeline

use chrono::{NaiveDate, Utc};

use crate::analytics::{
    aggregate, gamma_flip, max_pain, top_strikes, ExposureProfile, Metric,
};
use crate::core::{OptionType, ScannerError, ScannerResult};
use crate::data::MarketDataProvider;

use super::{AnalysisConfig, ScanOutcome, ScanReport};

/// Runs fetch + analytics against a market-data provider
pub struct OptionsScanner<P> {
    provider: P,
    config: AnalysisConfig,
}

impl<P: MarketDataProvider> OptionsScanner<P> {
    /// Create a scanner with default analysis settings
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: AnalysisConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(provider: P, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Listed expirations for `ticker`
    pub fn expirations(&self, ticker: &str) -> ScannerResult<Vec<NaiveDate>> {
        self.provider.fetch_expirations(ticker)
    }

    /// Use `requested` if given, otherwise the nearest listed expiration
    pub fn resolve_expiration(
        &self,
        ticker: &str,
        requested: Option<NaiveDate>,
    ) -> ScannerResult<NaiveDate> {
        if let Some(date) = requested {
            return Ok(date);
        }

        self.expirations(ticker)?
            .into_iter()
            .next()
            .ok_or_else(|| ScannerError::provider(format!("No expirations listed for {}", ticker)))
    }

    /// Fetch and analyse one expiration
    ///
    /// Provider failures become [`ScanOutcome::NoData`]. The only error
    /// returned is an analytics precondition failure, which indicates a bug.
    pub fn scan(&self, ticker: &str, expiration: NaiveDate) -> ScannerResult<ScanOutcome> {
        let no_data = |reason: String| ScanOutcome::NoData {
            ticker: ticker.to_string(),
            expiration,
            reason,
        };

        let contracts = match self.provider.fetch_contracts(ticker, expiration) {
            Ok(contracts) => contracts,
            Err(e) => {
                tracing::error!("Failed to fetch chain for {} {}: {}", ticker, expiration, e);
                return Ok(no_data(e.to_string()));
            }
        };

        let summary = aggregate(&contracts);
        if summary.is_empty() {
            tracing::warn!("No usable contracts for {} {}", ticker, expiration);
            return Ok(no_data(format!(
                "No option data for {} expiring {}",
                ticker, expiration
            )));
        }

        let quote = match self.provider.fetch_quote(ticker) {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!("Quote unavailable for {}: {}", ticker, e);
                None
            }
        };
        let spot = quote.as_ref().and_then(|q| q.last);

        let max_pain = max_pain(&summary, self.config.weighting)?;
        let top_n = self.config.top_n;

        tracing::info!(
            "{} {}: {} strikes, max pain {} ({})",
            ticker,
            expiration,
            summary.len(),
            max_pain.strike,
            max_pain.weighting
        );

        let report = ScanReport {
            ticker: ticker.to_string(),
            expiration,
            gamma_flip: gamma_flip(&summary),
            top_calls: top_strikes(&summary, Metric::OpenInterest, OptionType::Call, top_n),
            top_puts: top_strikes(&summary, Metric::OpenInterest, OptionType::Put, top_n),
            exposure: ExposureProfile::from_summary(&summary, spot),
            quote,
            summary,
            max_pain,
            generated_at: Utc::now(),
        };

        Ok(ScanOutcome::Complete(Box::new(report)))
    }
}
