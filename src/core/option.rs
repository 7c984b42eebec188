//! Option contract definitions
//!
//! A contract is one row of a provider's option chain: strike, side,
//! open interest, volume and whatever greeks the provider supplied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Parse a provider type string ("call", "PUT", ...).
    ///
    /// Returns `None` for anything that is not a call or a put.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Some(OptionType::Call),
            "put" | "p" => Some(OptionType::Put),
            _ => None,
        }
    }

    /// Intrinsic value at expiry if the underlying settles at `settle`
    pub fn intrinsic(&self, settle: Decimal, strike: Decimal) -> Decimal {
        match self {
            OptionType::Call => (settle - strike).max(Decimal::ZERO),
            OptionType::Put => (strike - settle).max(Decimal::ZERO),
        }
    }

    /// Column label used in tables and CSV headers
    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One option contract as delivered by the market-data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Strike price
    pub strike: Decimal,
    /// Call or put; `None` when the provider sent an unrecognized type
    pub option_type: Option<OptionType>,
    /// Outstanding contracts
    pub open_interest: u64,
    /// Contracts traded in the session
    pub volume: u64,
    /// Provider delta, passed through
    pub delta: Option<f64>,
    /// Provider theta, passed through
    pub theta: Option<f64>,
}

impl OptionContract {
    /// Contract with the given side and open interest, no volume or greeks
    pub fn new(strike: Decimal, option_type: OptionType, open_interest: u64) -> Self {
        Self {
            strike: strike.normalize(),
            option_type: Some(option_type),
            open_interest,
            volume: 0,
            delta: None,
            theta: None,
        }
    }

    pub fn call(strike: Decimal, open_interest: u64) -> Self {
        Self::new(strike, OptionType::Call, open_interest)
    }

    pub fn put(strike: Decimal, open_interest: u64) -> Self {
        Self::new(strike, OptionType::Put, open_interest)
    }

    /// Set traded volume
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }

    /// Set provider greeks
    pub fn with_greeks(mut self, delta: f64, theta: f64) -> Self {
        self.delta = Some(delta);
        self.theta = Some(theta);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.intrinsic(dec!(110), dec!(100)), dec!(10));
        assert_eq!(OptionType::Put.intrinsic(dec!(90), dec!(100)), dec!(10));
        assert_eq!(OptionType::Call.intrinsic(dec!(90), dec!(100)), dec!(0));
        assert_eq!(OptionType::Put.intrinsic(dec!(100), dec!(100)), dec!(0));
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(OptionType::parse("call"), Some(OptionType::Call));
        assert_eq!(OptionType::parse("PUT"), Some(OptionType::Put));
        assert_eq!(OptionType::parse(" Put "), Some(OptionType::Put));
        assert_eq!(OptionType::parse("straddle"), None);
        assert_eq!(OptionType::parse(""), None);
    }

    #[test]
    fn test_contract_builders() {
        let c = OptionContract::call(dec!(100.50), 25)
            .with_volume(7)
            .with_greeks(0.45, -0.12);

        assert_eq!(c.option_type, Some(OptionType::Call));
        assert_eq!(c.strike.to_string(), "100.5");
        assert_eq!(c.volume, 7);
        assert_eq!(c.delta, Some(0.45));
    }
}
