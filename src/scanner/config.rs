//! Configuration for the scanner

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::analytics::PainWeighting;
use crate::core::{ScannerError, ScannerResult};
use crate::data::ProviderConfig;

/// Full scanner configuration, usually read from a TOML file
///
/// ```toml
/// [provider]
/// base_url = "https://api.tradier.com/v1"
///
/// [analysis]
/// weighting = "oi"
/// top_n = 5
///
/// [refresh]
/// interval_secs = 60
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Market-data connection
    pub provider: ProviderConfig,
    /// Max-pain and signal settings
    pub analysis: AnalysisConfig,
    /// Watch mode
    pub refresh: RefreshConfig,
}

impl ScannerConfig {
    /// Parse from TOML text
    pub fn from_toml_str(s: &str) -> ScannerResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| ScannerError::config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ScannerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::info!("Loaded config from {:?}", path);
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> ScannerResult<()> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ScannerError::config("provider.base_url must not be empty"));
        }
        if self.analysis.top_n == 0 {
            return Err(ScannerError::config("analysis.top_n must be at least 1"));
        }
        if self.refresh.interval_secs == 0 {
            return Err(ScannerError::config("refresh.interval_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Analysis settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Max-pain weighting policy
    /// Default: open interest
    pub weighting: PainWeighting,

    /// How many strikes to report per side
    /// Default: 5
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weighting: PainWeighting::OpenInterest,
            top_n: 5,
        }
    }
}

/// Watch-mode settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between refreshes
    /// Default: 60
    pub interval_secs: u64,

    /// Stop after this many refreshes (None = until cancelled)
    pub max_ticks: Option<u64>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            max_ticks: None,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.provider.base_url, crate::data::DEFAULT_BASE_URL);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.analysis.weighting, PainWeighting::OpenInterest);
        assert_eq!(config.analysis.top_n, 5);
        assert_eq!(config.refresh.interval(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = ScannerConfig::from_toml_str(
            r#"
            [analysis]
            weighting = "combined"

            [refresh]
            interval_secs = 15
            max_ticks = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.weighting, PainWeighting::Combined);
        assert_eq!(config.analysis.top_n, 5);
        assert_eq!(config.refresh.interval_secs, 15);
        assert_eq!(config.refresh.max_ticks, Some(4));
        assert_eq!(config.provider.base_url, crate::data::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_weighting_aliases() {
        let config = ScannerConfig::from_toml_str("[analysis]\nweighting = \"oi\"").unwrap();
        assert_eq!(config.analysis.weighting, PainWeighting::OpenInterest);

        let config = ScannerConfig::from_toml_str("[analysis]\nweighting = \"volume\"").unwrap();
        assert_eq!(config.analysis.weighting, PainWeighting::Volume);

        // Every spelling the CLI accepts is accepted in TOML too
        for (name, expected) in [
            ("open_interest", PainWeighting::OpenInterest),
            ("open-interest", PainWeighting::OpenInterest),
            ("vol", PainWeighting::Volume),
            ("combined", PainWeighting::Combined),
            ("oi_combined", PainWeighting::Combined),
            ("oi-combined", PainWeighting::Combined),
        ] {
            let toml = format!("[analysis]\nweighting = \"{}\"", name);
            let config = ScannerConfig::from_toml_str(&toml).unwrap();
            assert_eq!(config.analysis.weighting, expected);
            assert_eq!(name.parse::<PainWeighting>().unwrap(), expected);
        }
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ScannerConfig::from_toml_str("[analysis]\ntop_n = 0"),
            Err(ScannerError::Config(_))
        ));
        assert!(matches!(
            ScannerConfig::from_toml_str("[refresh]\ninterval_secs = 0"),
            Err(ScannerError::Config(_))
        ));
        assert!(matches!(
            ScannerConfig::from_toml_str("[provider]\nbase_url = \" \""),
            Err(ScannerError::Config(_))
        ));
        assert!(matches!(
            ScannerConfig::from_toml_str("[analysis]\nweighting = \"gamma\""),
            Err(ScannerError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[provider]\napi_key = \"abc\"\nbase_url = \"https://sandbox.tradier.com/v1\"").unwrap();

        let config = ScannerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("abc"));
        assert_eq!(config.provider.base_url, "https://sandbox.tradier.com/v1");

        assert!(matches!(
            ScannerConfig::from_file("/nonexistent/scanner.toml"),
            Err(ScannerError::IO(_))
        ));
    }
}
