//! HTTP client for the trends gateway
//!
//! Every call waits on the shared [`Pacer`] before hitting the network,
//! including each retry attempt. Transient failures (timeouts, 429, 5xx)
//! are retried with exponential backoff; malformed responses and other
//! 4xx failures surface immediately.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::pacer::Pacer;
use super::wire::{
    self, InterestPayload, RegionalPayload, RelatedPayload, TrendingPayload,
};
use super::TrendsProvider;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::{InterestSeries, Query, RegionalEntry, RelatedSet};

/// Trends gateway client with pacing and retry
pub struct TrendsClient {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Shared admission gate for all provider calls
    pacer: Arc<Pacer>,

    /// Gateway base URL
    base_url: String,

    /// Maximum number of retry attempts for transient failures
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,
}

impl TrendsClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be created
    pub fn new(config: &ProviderConfig, pacer: Arc<Pacer>) -> Result<Self, ProviderError> {
        Self::with_config(
            &config.base_url,
            pacer,
            config.max_retries,
            config.retry_base_delay_ms,
            config.request_timeout(),
        )
    }

    /// Create a client with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be created
    pub fn with_config(
        base_url: &str,
        pacer: Arc<Pacer>,
        max_retries: u32,
        base_delay_ms: u64,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;

        Ok(Self {
            client,
            pacer,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
            base_delay_ms,
        })
    }

    /// Issue a GET with pacing and retry, decoding the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay_ms * 2_u64.pow(attempt - 1);
                debug!(attempt, delay_ms = delay, path, "Retrying provider call");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            // Each attempt re-blocks on the shared pacer
            self.pacer.acquire().await;

            match self.attempt::<T>(&url, params).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        path,
                        error = %e,
                        "Provider call failed"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(ProviderError::Timeout))
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else if e.is_decode() {
                ProviderError::Malformed(e.to_string())
            } else {
                ProviderError::Http(e)
            }
        })
    }

    fn batch_params(query: &Query) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("keywords", query.keywords.join(",")),
            ("timeframe", query.timeframe.clone()),
            ("category", query.category.to_string()),
            ("property", query.property.as_param().to_string()),
        ];
        if let Some(geo) = &query.geo {
            params.push(("geo", geo.clone()));
        }
        params
    }
}

#[async_trait]
impl TrendsProvider for TrendsClient {
    async fn interest_over_time(&self, query: &Query) -> Result<InterestSeries, ProviderError> {
        debug!(keywords = ?query.keywords, timeframe = %query.timeframe, "Fetching interest over time");
        let payload: InterestPayload = self
            .get_json("/api/interest_over_time", &Self::batch_params(query))
            .await?;
        Ok(wire::normalize_series(payload, &query.keywords))
    }

    async fn related_topics(&self, keyword: &str) -> Result<RelatedSet, ProviderError> {
        debug!(keyword, "Fetching related topics");
        let payload: RelatedPayload = self
            .get_json("/api/related_topics", &[("keyword", keyword.to_string())])
            .await?;
        wire::normalize_related(payload)
    }

    async fn related_queries(&self, keyword: &str) -> Result<RelatedSet, ProviderError> {
        debug!(keyword, "Fetching related queries");
        let payload: RelatedPayload = self
            .get_json("/api/related_queries", &[("keyword", keyword.to_string())])
            .await?;
        wire::normalize_related(payload)
    }

    async fn regional_interest(
        &self,
        query: &Query,
    ) -> Result<BTreeMap<String, Vec<RegionalEntry>>, ProviderError> {
        debug!(keywords = ?query.keywords, "Fetching regional interest");
        let mut params = Self::batch_params(query);
        params.push(("resolution", "COUNTRY".to_string()));
        let payload: RegionalPayload = self
            .get_json("/api/regional_interest", &params)
            .await?;
        wire::normalize_regional(payload, &query.keywords)
    }

    async fn trending_now(&self, region: &str) -> Result<Vec<String>, ProviderError> {
        debug!(region, "Fetching trending searches");
        let result: Result<TrendingPayload, ProviderError> = self
            .get_json("/api/trending", &[("region", region.to_string())])
            .await;

        match result {
            Ok(payload) => Ok(payload.searches),
            // Unsupported region is a valid empty result, not an error
            Err(ProviderError::Status(404)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacer() -> Arc<Pacer> {
        Arc::new(Pacer::new(Duration::from_millis(1)))
    }

    #[test]
    fn test_client_creation() {
        let client = TrendsClient::new(&ProviderConfig::default(), pacer());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = TrendsClient::with_config(
            "http://localhost:9999/",
            pacer(),
            1,
            10,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_batch_params_include_geo_only_when_set() {
        let query = Query::new(["ai", "ml"]).unwrap();
        let params = TrendsClient::batch_params(&query);
        assert!(params.iter().any(|(k, v)| *k == "keywords" && v == "ai,ml"));
        assert!(!params.iter().any(|(k, _)| *k == "geo"));

        let query = query.with_geo("US");
        let params = TrendsClient::batch_params(&query);
        assert!(params.iter().any(|(k, v)| *k == "geo" && v == "US"));
    }
}
