//! # Options Scanner - Open Interest and Max Pain
//!
//! Fetches an equity option chain for one ticker and expiration and derives
//! the figures options traders read off it.
//!
//! ## Overview
//!
//! The pipeline is linear:
//! - **Aggregation**: raw contracts folded into call/put open interest,
//!   volume and pass-through greeks per strike
//! - **Max pain**: the strike minimizing aggregate holder payoff, weighted by
//!   open interest, volume, or combined call+put open interest
//! - **Signals**: gamma-flip strike, top strikes per side, exposure profile
//!
//! ## Key Components
//!
//! - **Data Fetching**: Tradier REST API behind the `MarketDataProvider` trait
//! - **Analytics**: pure functions over a `StrikeSummary`
//! - **Scanner**: fetch + analytics facade, cancellable watch loop
//! - **Report**: CSV export and terminal rendering
//!
//! ## Usage
//!
//! ```rust,no_run
//! use options_scanner::prelude::*;
//!
//! let config = ScannerConfig::default();
//! let client = TradierClient::new(&config.provider).unwrap();
//! let scanner = OptionsScanner::with_config(client, config.analysis);
//!
//! let expiration = scanner.resolve_expiration("SPY", None).unwrap();
//! if let ScanOutcome::Complete(report) = scanner.scan("SPY", expiration).unwrap() {
//!     println!("Max pain: {}", report.max_pain.strike);
//! }
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Price options or derive greeks (provider greeks are passed through)
//! - Model dealer gamma exposure (the "gamma" views are open-interest proxies)
//! - Persist or compare snapshots across time or tickers

pub mod analytics;
pub mod core;
pub mod data;
pub mod report;
pub mod scanner;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{OptionContract, OptionType, ScannerError, ScannerResult, SpotQuote};

    // Data fetching
    pub use crate::data::{MarketDataProvider, ProviderConfig, TradierClient};

    // Analytics
    pub use crate::analytics::{
        aggregate, gamma_flip, max_pain, top_strikes, total_pain, ExposureProfile, ExposureRow,
        MaxPainResult, Metric, PainWeighting, StrikeEntry, StrikeMetrics, StrikeSummary,
    };

    // Scanner
    pub use crate::scanner::{
        AnalysisConfig, OptionsScanner, RefreshConfig, RefreshLoop, ScanOutcome, ScanReport,
        ScannerConfig,
    };

    // Reporting
    pub use crate::report::{default_csv_name, export_csv, write_csv, CsvLayout};
}

// Re-export main types at crate root
pub use crate::core::{ScannerError, ScannerResult};
pub use crate::scanner::{OptionsScanner, ScannerConfig};
