//! Output formats
//!
//! - CSV export of the strike summary
//! - Plain-text headline, strike table and exposure bars for the CLI

pub mod export;
pub mod table;

pub use export::*;
pub use table::*;
