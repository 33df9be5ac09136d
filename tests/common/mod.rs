//! Shared test fixtures: a scripted in-memory trends provider

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use trendlens::error::ProviderError;
use trendlens::models::{
    InterestSeries, Query, RegionalEntry, RelatedEntry, RelatedSet, TimeSeriesPoint,
};
use trendlens::provider::TrendsProvider;

/// Deterministic provider whose responses and failures are scripted up front
#[derive(Default)]
pub struct ScriptedProvider {
    pub series: InterestSeries,
    pub topics: BTreeMap<String, RelatedSet>,
    pub queries: BTreeMap<String, RelatedSet>,
    pub regional: BTreeMap<String, Vec<RegionalEntry>>,
    pub trending: Vec<String>,

    /// Keywords whose related-queries fetch fails with a malformed response
    pub fail_queries_for: BTreeSet<String>,
    pub fail_series: bool,
    pub fail_regional: bool,

    /// Artificial latency applied to every call
    pub delay: Option<Duration>,
}

impl ScriptedProvider {
    async fn stall(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TrendsProvider for ScriptedProvider {
    async fn interest_over_time(&self, query: &Query) -> Result<InterestSeries, ProviderError> {
        self.stall().await;
        if self.fail_series {
            return Err(ProviderError::Timeout);
        }
        Ok(self
            .series
            .iter()
            .filter(|(k, _)| query.keywords.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn related_topics(&self, keyword: &str) -> Result<RelatedSet, ProviderError> {
        self.stall().await;
        Ok(self.topics.get(keyword).cloned().unwrap_or_default())
    }

    async fn related_queries(&self, keyword: &str) -> Result<RelatedSet, ProviderError> {
        self.stall().await;
        if self.fail_queries_for.contains(keyword) {
            return Err(ProviderError::Malformed(
                "related row has neither title nor query".into(),
            ));
        }
        Ok(self.queries.get(keyword).cloned().unwrap_or_default())
    }

    async fn regional_interest(
        &self,
        query: &Query,
    ) -> Result<BTreeMap<String, Vec<RegionalEntry>>, ProviderError> {
        self.stall().await;
        if self.fail_regional {
            return Err(ProviderError::Status(500));
        }
        Ok(self
            .regional
            .iter()
            .filter(|(k, _)| query.keywords.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn trending_now(&self, _region: &str) -> Result<Vec<String>, ProviderError> {
        self.stall().await;
        Ok(self.trending.clone())
    }
}

pub fn point(date: &str, value: u32) -> TimeSeriesPoint {
    TimeSeriesPoint::new(date.parse::<NaiveDate>().unwrap(), value)
}

pub fn query_entry(query: &str, value: i64) -> RelatedEntry {
    RelatedEntry::Query {
        query: query.into(),
        value,
    }
}

pub fn topic_entry(title: &str, value: i64) -> RelatedEntry {
    RelatedEntry::Topic {
        title: title.into(),
        topic_type: "Topic".into(),
        value,
    }
}
