//! Rate-limited access to the external trends provider
//!
//! This module implements the HTTP client for the four logical query types
//! (interest over time, related topics/queries, regional interest) plus the
//! best-effort trending-now lookup, all gated by a single shared [`Pacer`].

pub mod client;
pub mod pacer;
mod wire;

pub use client::TrendsClient;
pub use pacer::Pacer;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::ProviderError;
use crate::models::{InterestSeries, Query, RegionalEntry, RelatedSet};

/// Seam between the orchestrator and the concrete provider client
///
/// The orchestrator receives an `Arc<dyn TrendsProvider>` at construction;
/// tests substitute a scripted in-memory implementation.
#[async_trait]
pub trait TrendsProvider: Send + Sync {
    /// Fetch chronological interest points for all query keywords
    ///
    /// A provider reporting no data yields an empty series, not an error.
    async fn interest_over_time(&self, query: &Query) -> Result<InterestSeries, ProviderError>;

    /// Fetch related topics for a single keyword
    async fn related_topics(&self, keyword: &str) -> Result<RelatedSet, ProviderError>;

    /// Fetch related queries for a single keyword
    async fn related_queries(&self, keyword: &str) -> Result<RelatedSet, ProviderError>;

    /// Fetch per-country interest per keyword, zero-value entries excluded
    async fn regional_interest(
        &self,
        query: &Query,
    ) -> Result<BTreeMap<String, Vec<RegionalEntry>>, ProviderError>;

    /// Fetch currently trending searches for a region, best-effort
    ///
    /// Unsupported regions yield an empty list rather than an error.
    async fn trending_now(&self, region: &str) -> Result<Vec<String>, ProviderError>;
}
