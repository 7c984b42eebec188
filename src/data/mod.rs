//! Data fetching
//!
//! Handles:
//! - The provider trait the scanner depends on
//! - Tradier REST API for quotes, expirations and option chains

pub mod provider;
pub mod tradier;

pub use provider::*;
pub use tradier::*;
