//! Tradier market-data client
//!
//! Fetches quotes, expiration dates and option chains from the Tradier
//! brokerage REST API. Requests are blocking, one at a time, with no retry.
//!
//! Response decoding lives in the `parse_*` functions so it can be tested
//! without network access.

use chrono::{NaiveDate, Utc};
use reqwest::header::ACCEPT;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::core::{OptionContract, OptionType, ScannerError, ScannerResult, SpotQuote};

use super::MarketDataProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.tradier.com/v1";

/// Connection settings for the Tradier API
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Bearer token
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Tradier API client
pub struct TradierClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl TradierClient {
    /// Build a client; fails if no API key is configured
    pub fn new(config: &ProviderConfig) -> ScannerResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ScannerError::config("Tradier API key is not set"))?
            .to_string();

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("options-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScannerError::provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// GET `path` and return the body of a successful response
    fn get(&self, path: &str, query: &[(&str, &str)]) -> ScannerResult<String> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| ScannerError::provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScannerError::provider(format!("{} returned {}", path, status)));
        }

        response
            .text()
            .map_err(|e| ScannerError::provider(format!("Failed to read {}: {}", path, e)))
    }
}

impl MarketDataProvider for TradierClient {
    fn fetch_quote(&self, ticker: &str) -> ScannerResult<SpotQuote> {
        let body = self.get("markets/quotes", &[("symbols", ticker)])?;
        parse_quote(ticker, &body)
    }

    fn fetch_expirations(&self, ticker: &str) -> ScannerResult<Vec<NaiveDate>> {
        let body = self.get("markets/options/expirations", &[("symbol", ticker)])?;
        parse_expirations(&body)
    }

    fn fetch_contracts(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> ScannerResult<Vec<OptionContract>> {
        let expiration = expiration.format("%Y-%m-%d").to_string();
        let body = self.get(
            "markets/options/chains",
            &[
                ("symbol", ticker),
                ("expiration", expiration.as_str()),
                ("greeks", "true"),
            ],
        )?;
        let contracts = parse_chain(&body)?;
        tracing::info!("Fetched {} contracts for {} {}", contracts.len(), ticker, expiration);
        Ok(contracts)
    }
}

/// Decode a `markets/quotes` response; the first quote wins when a list comes back
pub fn parse_quote(symbol: &str, body: &str) -> ScannerResult<SpotQuote> {
    let response: TradierQuoteResponse = serde_json::from_str(body)
        .map_err(|e| ScannerError::provider(format!("Failed to parse quote: {}", e)))?;

    let data = response
        .quotes
        .and_then(|q| q.quote)
        .and_then(|q| q.into_vec().into_iter().next())
        .ok_or_else(|| ScannerError::provider(format!("No quote data returned for {}", symbol)))?;

    Ok(SpotQuote {
        symbol: data.symbol.unwrap_or_else(|| symbol.to_string()),
        last: data.last,
        high: data.high,
        low: data.low,
        volume: data.volume,
        iv: data.greeks.and_then(|g| g.iv_mean),
        timestamp: Utc::now(),
    })
}

/// Decode a `markets/options/expirations` response, sorted ascending
pub fn parse_expirations(body: &str) -> ScannerResult<Vec<NaiveDate>> {
    let response: TradierExpirationsResponse = serde_json::from_str(body)
        .map_err(|e| ScannerError::provider(format!("Failed to parse expirations: {}", e)))?;

    let mut dates: Vec<NaiveDate> = response
        .expirations
        .and_then(|e| e.date)
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|d| match NaiveDate::parse_from_str(&d, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!("Ignoring expiration '{}': {}", d, e);
                None
            }
        })
        .collect();

    dates.sort();
    dates.dedup();
    Ok(dates)
}

/// Decode a `markets/options/chains` response
///
/// Records that cannot be decoded are logged and dropped; the rest of the
/// chain is returned. A missing chain decodes as empty.
pub fn parse_chain(body: &str) -> ScannerResult<Vec<OptionContract>> {
    let response: TradierChainResponse = serde_json::from_str(body)
        .map_err(|e| ScannerError::provider(format!("Failed to parse options: {}", e)))?;

    let records = response
        .options
        .and_then(|o| o.option)
        .map(OneOrMany::into_vec)
        .unwrap_or_default();

    let mut contracts = Vec::with_capacity(records.len());
    for record in records {
        match convert_option(record) {
            Ok(contract) => contracts.push(contract),
            Err(e) => tracing::warn!("Skipping option record: {}", e),
        }
    }

    Ok(contracts)
}

/// Convert one raw chain record to a contract
fn convert_option(record: serde_json::Value) -> ScannerResult<OptionContract> {
    let data: TradierOptionData =
        serde_json::from_value(record).map_err(|e| ScannerError::malformed(e.to_string()))?;

    let label = data.symbol.as_deref().unwrap_or("<unnamed>");

    let strike = data
        .strike
        .ok_or_else(|| ScannerError::malformed(format!("{}: missing strike", label)))?;
    let strike = Decimal::try_from(strike)
        .map_err(|e| ScannerError::malformed(format!("{}: strike {}: {}", label, strike, e)))?
        .normalize();

    let option_type = data
        .option_type
        .as_deref()
        .ok_or_else(|| ScannerError::malformed(format!("{}: missing option_type", label)))?;

    let (delta, theta) = match data.greeks {
        Some(g) => (g.delta, g.theta),
        None => (None, None),
    };

    Ok(OptionContract {
        strike,
        // Unrecognized types pass through as `None`; aggregation skips them
        option_type: OptionType::parse(option_type),
        open_interest: data.open_interest.unwrap_or(0),
        volume: data.volume.unwrap_or(0),
        delta,
        theta,
    })
}

// Tradier API response structures

/// Tradier sends a bare object instead of a one-element array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

#[derive(Debug, Deserialize)]
struct TradierQuoteResponse {
    quotes: Option<TradierQuotes>,
}

#[derive(Debug, Deserialize)]
struct TradierQuotes {
    quote: Option<OneOrMany<TradierQuoteData>>,
}

#[derive(Debug, Deserialize)]
struct TradierQuoteData {
    symbol: Option<String>,
    last: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    volume: Option<u64>,
    greeks: Option<TradierQuoteGreeks>,
}

#[derive(Debug, Deserialize)]
struct TradierQuoteGreeks {
    iv_mean: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TradierExpirationsResponse {
    expirations: Option<TradierExpirations>,
}

#[derive(Debug, Deserialize)]
struct TradierExpirations {
    date: Option<OneOrMany<String>>,
}

#[derive(Debug, Deserialize)]
struct TradierChainResponse {
    options: Option<TradierOptions>,
}

#[derive(Debug, Deserialize)]
struct TradierOptions {
    option: Option<OneOrMany<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct TradierOptionData {
    symbol: Option<String>,
    strike: Option<f64>,
    option_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    open_interest: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    volume: Option<u64>,
    greeks: Option<TradierOptionGreeks>,
}

#[derive(Debug, Deserialize)]
struct TradierOptionGreeks {
    delta: Option<f64>,
    theta: Option<f64>,
}

/// Counts arrive as integers or as integral floats (`1200.0`)
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Int(u64),
        Float(f64),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Count::Int(n)) => Ok(Some(n)),
        Some(Count::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(Some(f as u64))
        }
        Some(Count::Float(f)) => Err(serde::de::Error::custom(format!(
            "expected a non-negative whole count, got {}",
            f
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_quote_object_and_list() {
        let body = r#"{"quotes":{"quote":{"symbol":"SPY","last":512.34,"high":514.0,
            "low":509.1,"volume":48211000}}}"#;
        let quote = parse_quote("SPY", body).unwrap();
        assert_eq!(quote.symbol, "SPY");
        assert_eq!(quote.last, Some(512.34));
        assert_eq!(quote.volume, Some(48211000));
        assert!(quote.iv.is_none());

        let body = r#"{"quotes":{"quote":[{"symbol":"AAPL","last":190.5,
            "greeks":{"iv_mean":0.24}},{"symbol":"MSFT","last":410.0}]}}"#;
        let quote = parse_quote("AAPL", body).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.iv, Some(0.24));
    }

    #[test]
    fn test_parse_quote_unmatched() {
        let body = r#"{"quotes":{"unmatched_symbols":{"symbol":"NOPE"}}}"#;
        let err = parse_quote("NOPE", body).unwrap_err();
        assert!(err.is_provider());

        assert!(parse_quote("SPY", "<html>").unwrap_err().is_provider());
    }

    #[test]
    fn test_parse_expirations() {
        let body = r#"{"expirations":{"date":["2025-07-18","2025-06-20","2025-06-20"]}}"#;
        let dates = parse_expirations(body).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 18).unwrap(),
            ]
        );

        let single = parse_expirations(r#"{"expirations":{"date":"2025-06-20"}}"#).unwrap();
        assert_eq!(single.len(), 1);

        let none = parse_expirations(r#"{"expirations":null}"#).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_parse_chain() {
        let body = r#"{"options":{"option":[
            {"symbol":"SPY250620C00500000","strike":500.0,"option_type":"call",
             "open_interest":1200,"volume":340,
             "greeks":{"delta":0.52,"theta":-0.31,"gamma":0.01}},
            {"symbol":"SPY250620P00500000","strike":500.0,"option_type":"put",
             "open_interest":900,"greeks":null},
            {"symbol":"SPY250620P00497500","strike":497.5,"option_type":"put"}
        ]}}"#;
        let contracts = parse_chain(body).unwrap();
        assert_eq!(contracts.len(), 3);

        let call = &contracts[0];
        assert_eq!(call.strike, dec!(500));
        assert_eq!(call.option_type, Some(OptionType::Call));
        assert_eq!(call.open_interest, 1200);
        assert_eq!(call.volume, 340);
        assert_eq!(call.delta, Some(0.52));
        assert_eq!(call.theta, Some(-0.31));

        let put = &contracts[1];
        assert_eq!(put.volume, 0);
        assert_eq!(put.delta, None);

        // Missing open interest defaults to zero
        assert_eq!(contracts[2].strike, dec!(497.5));
        assert_eq!(contracts[2].open_interest, 0);
    }

    #[test]
    fn test_parse_chain_skips_malformed() {
        let body = r#"{"options":{"option":[
            {"symbol":"A","option_type":"call","open_interest":10},
            {"symbol":"B","strike":"abc","option_type":"call"},
            {"symbol":"C","strike":100.0},
            {"symbol":"D","strike":100.0,"option_type":"binary","open_interest":5},
            {"symbol":"E","strike":100.0,"option_type":"put","open_interest":7}
        ]}}"#;
        let contracts = parse_chain(body).unwrap();

        // A, B and C are dropped; D survives with an unrecognized type
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].option_type, None);
        assert_eq!(contracts[1].option_type, Some(OptionType::Put));
    }

    #[test]
    fn test_parse_chain_float_counts() {
        let body = r#"{"options":{"option":[
            {"symbol":"A","strike":500.0,"option_type":"call","open_interest":1200.0,"volume":3.0},
            {"symbol":"B","strike":500.0,"option_type":"put","open_interest":null,"volume":12},
            {"symbol":"C","strike":505.0,"option_type":"put","open_interest":2.5},
            {"symbol":"D","strike":505.0,"option_type":"call","open_interest":-4.0}
        ]}}"#;
        let contracts = parse_chain(body).unwrap();

        // C and D carry counts that are not whole and non-negative
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].open_interest, 1200);
        assert_eq!(contracts[0].volume, 3);
        assert_eq!(contracts[1].open_interest, 0);
        assert_eq!(contracts[1].volume, 12);

        let body = r#"{"quotes":{"quote":{"symbol":"SPY","last":512.0,"volume":48211000.0}}}"#;
        assert_eq!(parse_quote("SPY", body).unwrap().volume, Some(48211000));
    }

    #[test]
    fn test_parse_chain_single_and_empty() {
        let single = r#"{"options":{"option":{"strike":10.0,"option_type":"put","open_interest":3}}}"#;
        assert_eq!(parse_chain(single).unwrap().len(), 1);

        assert!(parse_chain(r#"{"options":null}"#).unwrap().is_empty());
        assert!(parse_chain("not json").unwrap_err().is_provider());
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = ProviderConfig::default();
        assert!(matches!(
            TradierClient::new(&config),
            Err(ScannerError::Config(_))
        ));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = ProviderConfig {
            api_key: Some("secret-token".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }

    fn live_client() -> TradierClient {
        let config = ProviderConfig {
            api_key: std::env::var("TRADIER_API_KEY").ok(),
            ..Default::default()
        };
        TradierClient::new(&config).unwrap()
    }

    #[test]
    #[ignore] // Requires network and TRADIER_API_KEY
    fn test_fetch_quote() {
        let quote = live_client().fetch_quote("SPY").unwrap();
        assert!(quote.last.unwrap_or(0.0) > 0.0);
        println!("SPY last: {:?}", quote.last);
    }

    #[test]
    #[ignore] // Requires network and TRADIER_API_KEY
    fn test_fetch_chain() {
        let client = live_client();
        let expiries = client.fetch_expirations("SPY").unwrap();
        assert!(!expiries.is_empty());

        let contracts = client.fetch_contracts("SPY", expiries[0]).unwrap();
        println!("SPY {}: {} contracts", expiries[0], contracts.len());
        assert!(!contracts.is_empty());
    }
}
