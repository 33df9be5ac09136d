// Core data structures for the trendlens engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Maximum number of keywords the provider accepts in one comparison
pub const MAX_KEYWORDS: usize = 5;

/// Provider property (search surface) a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchProperty {
    #[default]
    Web,
    Images,
    News,
    Youtube,
    Shopping,
}

impl SearchProperty {
    /// Wire parameter value expected by the provider
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Web => "",
            Self::Images => "images",
            Self::News => "news",
            Self::Youtube => "youtube",
            Self::Shopping => "froogle",
        }
    }

    /// Human-readable label used in report output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Web => "Web Search",
            Self::Images => "Image Search",
            Self::News => "News Search",
            Self::Youtube => "YouTube Search",
            Self::Shopping => "Shopping Search",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "" | "web" => Some(Self::Web),
            "images" => Some(Self::Images),
            "news" => Some(Self::News),
            "youtube" => Some(Self::Youtube),
            "shopping" | "froogle" => Some(Self::Shopping),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An immutable, validated trends query
///
/// Keywords are trimmed, deduplicated (order preserved) and clamped to
/// [`MAX_KEYWORDS`]; excess keywords are dropped, not an error. Validation
/// happens once at construction, never at call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub keywords: Vec<String>,
    pub timeframe: String,
    pub geo: Option<String>,
    pub category: u32,
    pub property: SearchProperty,
}

impl Query {
    /// Build a query with defaults (`today 12-m`, worldwide, all categories)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidQuery` when no non-empty keyword remains
    /// after trimming and deduplication.
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.into().trim().to_string();
            if kw.is_empty() || deduped.iter().any(|k| k == &kw) {
                continue;
            }
            deduped.push(kw);
            if deduped.len() == MAX_KEYWORDS {
                break;
            }
        }

        if deduped.is_empty() {
            return Err(Error::invalid_query("at least one keyword is required"));
        }

        Ok(Self {
            keywords: deduped,
            timeframe: String::from("today 12-m"),
            geo: None,
            category: 0,
            property: SearchProperty::Web,
        })
    }

    /// Set the analysis timeframe token (e.g. `today 5-y`)
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    /// Restrict the query to a region code (e.g. `US`)
    #[must_use]
    pub fn with_geo(mut self, geo: impl Into<String>) -> Self {
        let geo = geo.into();
        self.geo = (!geo.is_empty()).then_some(geo);
        self
    }

    /// Set the provider category filter (0 = all categories)
    #[must_use]
    pub fn with_category(mut self, category: u32) -> Self {
        self.category = category;
        self
    }

    /// Set the search property
    #[must_use]
    pub fn with_property(mut self, property: SearchProperty) -> Self {
        self.property = property;
        self
    }

    /// Geo label for report output, `Worldwide` when unset
    pub fn geo_label(&self) -> &str {
        self.geo.as_deref().unwrap_or("Worldwide")
    }
}

/// A single interest observation for a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDate,
    pub value: u32,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDate, value: u32) -> Self {
        Self { timestamp, value }
    }
}

/// Chronological interest points per keyword, immutable after creation
pub type InterestSeries = BTreeMap<String, Vec<TimeSeriesPoint>>;

/// A provider-suggested term associated with a keyword
///
/// The provider's related endpoint returns topic-shaped and query-shaped
/// rows; the variant is resolved once during ingestion and never inferred
/// again downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelatedEntry {
    Topic {
        title: String,
        #[serde(rename = "type")]
        topic_type: String,
        value: i64,
    },
    Query {
        query: String,
        value: i64,
    },
}

impl RelatedEntry {
    /// Provider-assigned relevance score
    pub fn value(&self) -> i64 {
        match self {
            Self::Topic { value, .. } | Self::Query { value, .. } => *value,
        }
    }
}

/// Top and rising related entries for one keyword
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedSet {
    pub top: Vec<RelatedEntry>,
    pub rising: Vec<RelatedEntry>,
}

impl RelatedSet {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.rising.is_empty()
    }
}

/// Per-country aggregate interest for a keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalEntry {
    pub region: String,
    pub interest: f64,
}

impl RegionalEntry {
    pub fn new(region: impl Into<String>, interest: f64) -> Self {
        Self {
            region: region.into(),
            interest,
        }
    }
}

/// 3-way classification of a series' early-vs-late average
///
/// Derived by the time-series analyzer, never constructed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "Rising",
            Self::Declining => "Declining",
            Self::Stable => "Stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_lowercase())
    }
}

/// A report section that either carries data or a degraded-error marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Ok(T),
    Degraded { error: String },
}

impl<T> Section<T> {
    pub fn degraded(error: impl Into<String>) -> Self {
        Self::Degraded {
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok(data) => Some(data),
            Self::Degraded { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { error } => Some(error),
        }
    }
}

impl<T, E: std::fmt::Display> From<std::result::Result<T, E>> for Section<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Ok(data),
            Err(e) => Self::degraded(e.to_string()),
        }
    }
}

/// Peak period of a keyword's interest series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakPeriod {
    pub peak_date: NaiveDate,
    pub peak_value: u32,
}

/// Windowed early-vs-late trend comparison for a keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub direction: TrendDirection,
    pub start_average: f64,
    pub end_average: f64,
    pub change_percentage: f64,
}

/// Interest-over-time section: raw points plus derived metrics
///
/// Keywords with an empty series are absent from the metric maps rather
/// than carried as zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterestOverTime {
    pub data: InterestSeries,
    pub peak_periods: BTreeMap<String, PeakPeriod>,
    pub trend_direction: BTreeMap<String, TrendSummary>,
    pub average_interest: BTreeMap<String, f64>,
}

/// Regional-interest section: full breakdown plus ranked top regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalInterest {
    pub by_country: BTreeMap<String, Vec<RegionalEntry>>,
    pub top_regions: BTreeMap<String, Vec<RegionalEntry>>,
}

impl RegionalInterest {
    /// Count of distinct regions seen across all keywords
    pub fn region_count(&self) -> usize {
        let mut regions: Vec<&str> = self
            .by_country
            .values()
            .flatten()
            .map(|e| e.region.as_str())
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions.len()
    }
}

/// Rising-searches section: best-effort trending terms for a region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RisingSearches {
    pub trending_now: Vec<String>,
}

/// Presence booleans for the summary's data-quality record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    pub has_time_series: bool,
    pub has_related_data: bool,
    pub has_regional_data: bool,
    pub keywords_analyzed: usize,
}

/// Narrative insights, recommendations and data-quality assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub data_quality: DataQuality,
}

/// Query snapshot stamped into each report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    pub keywords: Vec<String>,
    pub timeframe: String,
    pub geo: String,
    pub category: u32,
    pub property: String,
    pub analysis_date: DateTime<Utc>,
}

impl QueryInfo {
    /// Snapshot a query with the current timestamp
    pub fn snapshot(query: &Query) -> Self {
        Self {
            keywords: query.keywords.clone(),
            timeframe: query.timeframe.clone(),
            geo: query.geo_label().to_string(),
            category: query.category,
            property: query.property.label().to_string(),
            analysis_date: Utc::now(),
        }
    }
}

/// The assembled aggregation report, the engine's sole external artifact
///
/// Each section degrades independently; a failing sub-query never fails
/// the aggregation as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub query_info: QueryInfo,
    pub interest_over_time: Section<InterestOverTime>,
    pub related_topics: Section<BTreeMap<String, Section<RelatedSet>>>,
    pub related_queries: Section<BTreeMap<String, Section<RelatedSet>>>,
    pub regional_interest: Section<RegionalInterest>,
    pub rising_searches: Section<RisingSearches>,
    pub summary: Summary,
}
