//! Aggregation orchestrator
//!
//! Drives the provider calls and analyzers stage by stage for one query:
//! interest series, related fan-out, regional breakdown, trending-now,
//! then summary synthesis. Every stage after validation degrades in
//! isolation: a failing sub-query marks its report section with an error
//! and the run continues. Only an invalid query aborts.
//!
//! The run carries a deadline; a provider call that exceeds the remaining
//! budget is abandoned and its section marked as timed out, so the report
//! is never blocked past the deadline.

use futures::future::join_all;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::analysis::{synthesize, RegionalRanker, RelatedRanker, TimeSeriesAnalyzer};
use crate::config::{AnalysisConfig, EngineConfig};
use crate::error::{Error, ProviderError, Result};
use crate::models::{
    InterestOverTime, InterestSeries, Query, QueryInfo, RegionalInterest, RelatedSet, Report,
    RisingSearches, Section,
};
use crate::provider::TrendsProvider;

/// Per-run options for skipping optional sections
///
/// A skipped section serializes as an empty section, not an error, so
/// consumers can tell "not requested" from "failed".
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub include_related: bool,
    pub include_regional: bool,
    pub include_trending: bool,

    /// Region for the trending-now lookup
    pub trending_region: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            include_related: true,
            include_regional: true,
            include_trending: true,
            trending_region: String::from("US"),
        }
    }
}

/// Orchestrates one aggregation run per query
///
/// The provider is injected at construction; there are no process-wide
/// singletons. All state below is read-only during a run, so concurrent
/// runs share nothing except the provider's pacer.
pub struct TrendEngine {
    provider: Arc<dyn TrendsProvider>,
    analysis: AnalysisConfig,
    deadline: Duration,
}

impl TrendEngine {
    pub fn new(provider: Arc<dyn TrendsProvider>, config: &EngineConfig) -> Self {
        Self {
            provider,
            analysis: config.analysis.clone(),
            deadline: config.provider.run_deadline(),
        }
    }

    /// Run a full aggregation with default options
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidQuery` for an empty keyword set; every other
    /// failure degrades its own report section instead.
    pub async fn aggregate(&self, query: &Query) -> Result<Report> {
        self.aggregate_with(query, &EngineOptions::default()).await
    }

    /// Run a full aggregation with explicit section options
    pub async fn aggregate_with(
        &self,
        query: &Query,
        options: &EngineOptions,
    ) -> Result<Report> {
        if query.keywords.is_empty() {
            return Err(Error::invalid_query("no keywords to aggregate"));
        }

        let deadline = Instant::now() + self.deadline;
        info!(
            keywords = ?query.keywords,
            timeframe = %query.timeframe,
            geo = %query.geo_label(),
            "Starting trend aggregation"
        );

        let interest_over_time = self.fetch_interest(query, deadline).await;
        let (related_topics, related_queries) =
            self.fetch_related(query, options, deadline).await;
        let regional_interest = self.fetch_regional(query, options, deadline).await;
        let rising_searches = self.fetch_trending(options, deadline).await;

        let has_related_data = [&related_topics, &related_queries]
            .iter()
            .filter_map(|section| section.data())
            .flat_map(|map| map.values())
            .any(|section| section.data().is_some_and(|set| !set.is_empty()));

        let summary = synthesize(
            &query.keywords,
            interest_over_time.data(),
            has_related_data,
            regional_interest.data(),
        );

        info!(
            insights = summary.key_insights.len(),
            degraded_series = !interest_over_time.is_ok(),
            degraded_regional = !regional_interest.is_ok(),
            "Trend aggregation complete"
        );

        Ok(Report {
            query_info: QueryInfo::snapshot(query),
            interest_over_time,
            related_topics,
            related_queries,
            regional_interest,
            rising_searches,
            summary,
        })
    }

    async fn fetch_interest(&self, query: &Query, deadline: Instant) -> Section<InterestOverTime> {
        match bounded(deadline, self.provider.interest_over_time(query)).await {
            Ok(series) => Section::Ok(self.build_interest(series)),
            Err(e) => {
                warn!(error = %e, "Interest-over-time fetch degraded");
                Section::degraded(e.to_string())
            }
        }
    }

    /// Derive per-keyword metrics from a fetched series
    ///
    /// Keywords with an empty series get no metric entries; an empty
    /// provider result yields an empty (but healthy) section.
    fn build_interest(&self, series: InterestSeries) -> InterestOverTime {
        let analyzer = TimeSeriesAnalyzer::new(self.analysis.clone());
        let mut section = InterestOverTime::default();

        for (keyword, points) in &series {
            let metrics = analyzer.analyze(points);
            if let Some(peak) = metrics.peak {
                section.peak_periods.insert(keyword.clone(), peak);
            }
            if let Some(average) = metrics.average {
                section.average_interest.insert(keyword.clone(), average);
            }
            if let Some(trend) = metrics.trend {
                section.trend_direction.insert(keyword.clone(), trend);
            }
        }

        section.data = series;
        section
    }

    /// Fan out related-topic/query fetches across keywords
    ///
    /// Within one keyword, topics are fetched before queries (fixed order
    /// for reproducibility); across keywords the fetches run concurrently,
    /// gated only by the shared pacer.
    async fn fetch_related(
        &self,
        query: &Query,
        options: &EngineOptions,
        deadline: Instant,
    ) -> (
        Section<BTreeMap<String, Section<RelatedSet>>>,
        Section<BTreeMap<String, Section<RelatedSet>>>,
    ) {
        if !options.include_related {
            return (Section::Ok(BTreeMap::new()), Section::Ok(BTreeMap::new()));
        }

        let ranker = RelatedRanker::new(self.analysis.top_n);
        let fetches = query.keywords.iter().map(|keyword| async move {
            let topics = bounded(deadline, self.provider.related_topics(keyword))
                .await
                .map(|set| ranker.rank(set));
            let queries = bounded(deadline, self.provider.related_queries(keyword))
                .await
                .map(|set| ranker.rank(set));

            if let Err(e) = &topics {
                warn!(keyword = %keyword, error = %e, "Related-topics fetch degraded");
            }
            if let Err(e) = &queries {
                warn!(keyword = %keyword, error = %e, "Related-queries fetch degraded");
            }

            (keyword.clone(), Section::from(topics), Section::from(queries))
        });

        let mut topics_map = BTreeMap::new();
        let mut queries_map = BTreeMap::new();
        for (keyword, topics, queries) in join_all(fetches).await {
            topics_map.insert(keyword.clone(), topics);
            queries_map.insert(keyword, queries);
        }

        (Section::Ok(topics_map), Section::Ok(queries_map))
    }

    async fn fetch_regional(
        &self,
        query: &Query,
        options: &EngineOptions,
        deadline: Instant,
    ) -> Section<RegionalInterest> {
        if !options.include_regional {
            return Section::Ok(RegionalInterest::default());
        }

        match bounded(deadline, self.provider.regional_interest(query)).await {
            Ok(by_country) => {
                let ranker = RegionalRanker::new(self.analysis.top_n);
                let top_regions = by_country
                    .iter()
                    .map(|(keyword, entries)| (keyword.clone(), ranker.rank(entries)))
                    .collect();
                Section::Ok(RegionalInterest {
                    by_country,
                    top_regions,
                })
            }
            Err(e) => {
                warn!(error = %e, "Regional-interest fetch degraded");
                Section::degraded(e.to_string())
            }
        }
    }

    async fn fetch_trending(
        &self,
        options: &EngineOptions,
        deadline: Instant,
    ) -> Section<RisingSearches> {
        if !options.include_trending {
            return Section::Ok(RisingSearches::default());
        }

        match bounded(
            deadline,
            self.provider.trending_now(&options.trending_region),
        )
        .await
        {
            Ok(mut searches) => {
                searches.truncate(self.analysis.top_n);
                Section::Ok(RisingSearches {
                    trending_now: searches,
                })
            }
            Err(e) => {
                warn!(region = %options.trending_region, error = %e, "Trending fetch degraded");
                Section::degraded(e.to_string())
            }
        }
    }
}

/// Bound a provider call by the run deadline
///
/// A call that outlives the remaining budget is abandoned and reported as
/// a timeout on its own section.
async fn bounded<T, F>(deadline: Instant, fut: F) -> std::result::Result<T, ProviderError>
where
    F: Future<Output = std::result::Result<T, ProviderError>>,
{
    let remaining = deadline.saturating_duration_since(Instant::now());
    match tokio::time::timeout(remaining, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_expired_deadline_times_out() {
        let deadline = Instant::now();
        let result = bounded(deadline, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, ProviderError>(42)
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Timeout)));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_within_deadline() {
        let deadline = Instant::now() + Duration::from_secs(5);
        let result = bounded(deadline, async { Ok::<_, ProviderError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
