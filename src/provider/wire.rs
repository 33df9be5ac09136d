//! Raw provider payloads and their normalization into internal records
//!
//! The gateway responds with loosely shaped JSON; everything is resolved
//! into typed records here, once, so nothing downstream has to inspect
//! row shapes again.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ProviderError;
use crate::models::{InterestSeries, RegionalEntry, RelatedEntry, RelatedSet, TimeSeriesPoint};

/// Interest-over-time response: one row per time bucket
#[derive(Debug, Deserialize)]
pub(crate) struct InterestPayload {
    #[serde(default)]
    pub points: Vec<RawBucket>,
}

/// One time bucket with a value per keyword
///
/// The provider flags the most recent bucket as possibly incomplete; the
/// flag is dropped during normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct RawBucket {
    pub date: NaiveDate,
    #[serde(default)]
    pub values: BTreeMap<String, u32>,
    #[serde(default, rename = "is_partial")]
    pub _is_partial: bool,
}

/// Build a per-keyword chronological series, skipping duplicate buckets
pub(crate) fn normalize_series(payload: InterestPayload, keywords: &[String]) -> InterestSeries {
    let mut buckets = payload.points;
    buckets.sort_by_key(|b| b.date);

    let mut series = InterestSeries::new();
    for keyword in keywords {
        let mut points: Vec<TimeSeriesPoint> = Vec::new();
        for bucket in &buckets {
            if let Some(&value) = bucket.values.get(keyword) {
                // First bucket wins on duplicate timestamps
                if points.last().is_some_and(|p| p.timestamp == bucket.date) {
                    continue;
                }
                points.push(TimeSeriesPoint::new(bucket.date, value));
            }
        }
        if !points.is_empty() {
            series.insert(keyword.clone(), points);
        }
    }
    series
}

/// Related-topics / related-queries response
#[derive(Debug, Deserialize)]
pub(crate) struct RelatedPayload {
    #[serde(default)]
    pub top: Vec<RawRelatedRow>,
    #[serde(default)]
    pub rising: Vec<RawRelatedRow>,
}

/// A duck-typed related row: topic-shaped or query-shaped
#[derive(Debug, Deserialize)]
pub(crate) struct RawRelatedRow {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub topic_type: Option<String>,
    pub query: Option<String>,
    #[serde(default)]
    pub value: i64,
}

impl RawRelatedRow {
    /// Resolve the tagged variant; rows with neither shape are malformed
    fn resolve(self) -> Result<RelatedEntry, ProviderError> {
        if let Some(query) = self.query {
            Ok(RelatedEntry::Query {
                query,
                value: self.value,
            })
        } else if let Some(title) = self.title {
            Ok(RelatedEntry::Topic {
                title,
                topic_type: self.topic_type.unwrap_or_default(),
                value: self.value,
            })
        } else {
            Err(ProviderError::Malformed(
                "related row has neither title nor query".into(),
            ))
        }
    }
}

pub(crate) fn normalize_related(payload: RelatedPayload) -> Result<RelatedSet, ProviderError> {
    Ok(RelatedSet {
        top: payload
            .top
            .into_iter()
            .map(RawRelatedRow::resolve)
            .collect::<Result<_, _>>()?,
        rising: payload
            .rising
            .into_iter()
            .map(RawRelatedRow::resolve)
            .collect::<Result<_, _>>()?,
    })
}

/// Regional-interest response at COUNTRY resolution
#[derive(Debug, Deserialize)]
pub(crate) struct RegionalPayload {
    #[serde(default)]
    pub regions: Vec<RawRegion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRegion {
    pub region: String,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

/// Per-keyword regional entries, zero-value entries excluded at the source
pub(crate) fn normalize_regional(
    payload: RegionalPayload,
    keywords: &[String],
) -> Result<BTreeMap<String, Vec<RegionalEntry>>, ProviderError> {
    let mut by_keyword: BTreeMap<String, Vec<RegionalEntry>> = BTreeMap::new();

    for region in payload.regions {
        for (keyword, value) in region.values {
            if !value.is_finite() {
                return Err(ProviderError::Malformed(format!(
                    "non-finite interest value for region {}",
                    region.region
                )));
            }
            // Zero-value entries are excluded at the source
            if value <= 0.0 || !keywords.contains(&keyword) {
                continue;
            }
            by_keyword
                .entry(keyword)
                .or_default()
                .push(RegionalEntry::new(region.region.clone(), value));
        }
    }

    Ok(by_keyword)
}

/// Trending-now response
#[derive(Debug, Deserialize)]
pub(crate) struct TrendingPayload {
    #[serde(default)]
    pub searches: Vec<String>,
}
