//! Error types for the options scanner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    /// Market-data fetch failed (transport, status or payload)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Max pain requested over a summary with no strikes
    #[error("Empty input: no candidate strikes")]
    EmptyInput,

    /// A single contract record could not be decoded
    #[error("Malformed contract: {0}")]
    MalformedContract(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type ScannerResult<T> = Result<T, ScannerError>;

impl ScannerError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContract(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the failure came from the market-data boundary
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

impl From<csv::Error> for ScannerError {
    fn from(e: csv::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
