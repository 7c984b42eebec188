//! Market-data provider interface
//!
//! The analytics never talk to the network. A provider hands them already
//! fetched contracts; credentials and transport stay behind this trait.

use chrono::NaiveDate;

use crate::core::{OptionContract, ScannerResult, SpotQuote};

/// Source of quotes and option chains
pub trait MarketDataProvider {
    /// Current quote for the underlying
    fn fetch_quote(&self, ticker: &str) -> ScannerResult<SpotQuote>;

    /// Listed expiration dates, ascending
    fn fetch_expirations(&self, ticker: &str) -> ScannerResult<Vec<NaiveDate>>;

    /// Every contract of one expiration
    fn fetch_contracts(&self, ticker: &str, expiration: NaiveDate)
        -> ScannerResult<Vec<OptionContract>>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    fn fetch_quote(&self, ticker: &str) -> ScannerResult<SpotQuote> {
        (**self).fetch_quote(ticker)
    }

    fn fetch_expirations(&self, ticker: &str) -> ScannerResult<Vec<NaiveDate>> {
        (**self).fetch_expirations(ticker)
    }

    fn fetch_contracts(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> ScannerResult<Vec<OptionContract>> {
        (**self).fetch_contracts(ticker, expiration)
    }
}
