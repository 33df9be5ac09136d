//! Unified error handling for the trendlens crate
//!
//! Provider failures are classified by retryability: transient network
//! conditions (timeouts, rate limits, 5xx) may be retried by the client,
//! while malformed responses and client-side HTTP errors surface
//! immediately and degrade only the report section they belong to.

use thiserror::Error;

/// Errors that can occur while talking to the trends provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded its bounded wait
    #[error("request timed out")]
    Timeout,

    /// Provider signalled too many requests
    #[error("provider rate limit exceeded")]
    RateLimited,

    /// Non-success HTTP status
    #[error("provider returned status {0}")]
    Status(u16),

    /// Response body did not match the expected schema
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Check whether the failure is transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited => true,
            Self::Status(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Malformed(_) => false,
        }
    }

    /// Classify an HTTP status code, folding 429 into `RateLimited`
    pub fn from_status(code: u16) -> Self {
        if code == 429 {
            Self::RateLimited
        } else {
            Self::Status(code)
        }
    }
}

/// Unified error type for the trendlens crate
///
/// Only `InvalidQuery` aborts a whole aggregation run; every provider or
/// analysis failure is caught at the section boundary by the orchestrator
/// and recorded inside the report instead of unwinding past it.
#[derive(Error, Debug)]
pub enum Error {
    /// Query failed validation before any network call
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Provider call failed after retries
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A section's data failed its own invariants
    #[error("analysis error: {0}")]
    Analysis(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a query validation error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check whether this error is fatal for the whole aggregation run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::Config(_))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::RateLimited.is_retryable());
        assert!(ProviderError::Status(503).is_retryable());
        assert!(!ProviderError::Status(404).is_retryable());
        assert!(!ProviderError::Malformed("bad json".into()).is_retryable());
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ProviderError::from_status(429),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            ProviderError::from_status(500),
            ProviderError::Status(500)
        ));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::invalid_query("no keywords").is_fatal());
        assert!(Error::config("bad interval").is_fatal());
        assert!(!Error::Provider(ProviderError::Timeout).is_fatal());
    }

    #[test]
    fn test_provider_error_conversion() {
        let err: Error = ProviderError::RateLimited.into();
        assert!(matches!(err, Error::Provider(_)));
    }
}
