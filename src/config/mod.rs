//! Configuration management for the trendlens engine
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Validation happens once at construction; the
//! analysis thresholds are deliberately configurable rather than hard-coded
//! because their defaults are empirical.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provider client configuration
    pub provider: ProviderConfig,

    /// Analysis tuning parameters
    pub analysis: AnalysisConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Provider client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the trends gateway
    pub base_url: String,

    /// Minimum spacing between provider calls in milliseconds
    pub min_call_interval_ms: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum retry attempts for transient failures
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    pub retry_base_delay_ms: u64,

    /// Overall deadline for one aggregation run in seconds
    pub run_deadline_secs: u64,
}

/// Analysis tuning parameters
///
/// The trend-direction thresholds and window divisor come from the
/// reference behavior (leading/trailing `max(1, N/10)`-point windows,
/// +/-10% bands); they are parameters because their fit for short series
/// is unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A series is Rising when `end_avg > start_avg * rising_factor`
    pub rising_factor: f64,

    /// A series is Declining when `end_avg < start_avg * declining_factor`
    pub declining_factor: f64,

    /// Leading/trailing window size is `max(1, len / window_divisor)`
    pub window_divisor: usize,

    /// Result-set size for related and regional rankings
    pub top_n: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TRENDLENS_BASE_URL")
            .unwrap_or_else(|_| String::from("http://localhost:8080"));

        let min_call_interval_ms = std::env::var("TRENDLENS_MIN_CALL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1000);

        let request_timeout_secs = std::env::var("TRENDLENS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let max_retries = std::env::var("TRENDLENS_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_base_delay_ms = std::env::var("TRENDLENS_RETRY_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1000);

        let run_deadline_secs = std::env::var("TRENDLENS_RUN_DEADLINE")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let log_level =
            std::env::var("TRENDLENS_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        let log_format =
            std::env::var("TRENDLENS_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            provider: ProviderConfig {
                base_url,
                min_call_interval_ms,
                request_timeout_secs,
                max_retries,
                retry_base_delay_ms,
                run_deadline_secs,
            },
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.provider.base_url.is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        url::Url::parse(&self.provider.base_url)
            .with_context(|| format!("base_url is not a valid URL: {}", self.provider.base_url))?;

        if self.provider.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.provider.run_deadline_secs == 0 {
            anyhow::bail!("run_deadline_secs must be greater than 0");
        }

        if self.analysis.window_divisor == 0 {
            anyhow::bail!("window_divisor must be greater than 0");
        }

        if self.analysis.top_n == 0 {
            anyhow::bail!("top_n must be greater than 0");
        }

        if self.analysis.rising_factor <= self.analysis.declining_factor {
            anyhow::bail!("rising_factor must be greater than declining_factor");
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Get minimum call spacing as Duration
    #[must_use]
    pub fn min_call_interval(&self) -> Duration {
        Duration::from_millis(self.min_call_interval_ms)
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the overall run deadline as Duration
    #[must_use]
    pub fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:8080"),
            min_call_interval_ms: 1000,
            request_timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            run_deadline_secs: 60,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rising_factor: 1.1,
            declining_factor: 0.9,
            window_divisor: 10,
            top_n: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let mut config = EngineConfig::default();
        config.provider.base_url = String::from("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_window_divisor() {
        let mut config = EngineConfig::default();
        config.analysis.window_divisor = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.analysis.rising_factor = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_accessors() {
        let config = EngineConfig::default();
        assert_eq!(config.provider.request_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.provider.min_call_interval(),
            Duration::from_millis(1000)
        );
        assert_eq!(config.provider.run_deadline(), Duration::from_secs(60));
    }
}
