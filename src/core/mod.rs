//! Core data types for the options scanner
//!
//! Defines fundamental types:
//! - OptionContract: Strike, type (call/put), open interest, volume, greeks
//! - SpotQuote: Last/high/low/volume of the underlying
//! - ScannerError: Error taxonomy shared by every module

pub mod option;
pub mod quote;
pub mod error;

pub use option::*;
pub use quote::*;
pub use error::*;
