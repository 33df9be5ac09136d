//! Integration tests for TrendsClient using wiremock
//!
//! These validate HTTP behavior: payload decoding, retry on transient
//! failures, immediate surfacing of non-retryable ones, and the
//! best-effort trending lookup.

use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trendlens::error::ProviderError;
use trendlens::models::{Query, RelatedEntry};
use trendlens::provider::{Pacer, TrendsClient, TrendsProvider};

fn client(base_url: &str) -> TrendsClient {
    TrendsClient::with_config(
        base_url,
        Arc::new(Pacer::new(Duration::from_millis(1))),
        3,
        10, // fast backoff for tests
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_interest_over_time_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interest_over_time"))
        .and(query_param("keywords", "ai,ml"))
        .and(query_param("timeframe", "today 12-m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "points": [
                {"date": "2024-01-01", "values": {"ai": 10, "ml": 5}},
                {"date": "2024-06-01", "values": {"ai": 60, "ml": 7}, "is_partial": true}
            ]
        })))
        .mount(&server)
        .await;

    let query = Query::new(["ai", "ml"]).unwrap();
    let series = client(&server.uri())
        .interest_over_time(&query)
        .await
        .unwrap();

    assert_eq!(series["ai"].len(), 2);
    assert_eq!(series["ai"][1].value, 60);
    assert_eq!(series["ml"][0].value, 5);
}

#[tokio::test]
async fn test_empty_provider_data_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interest_over_time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"points": []})))
        .mount(&server)
        .await;

    let query = Query::new(["ai"]).unwrap();
    let series = client(&server.uri())
        .interest_over_time(&query)
        .await
        .unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn test_server_error_retries_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/related_topics"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/related_topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "top": [{"title": "Machine learning", "type": "Field of study", "value": 100}],
            "rising": []
        })))
        .mount(&server)
        .await;

    let set = client(&server.uri()).related_topics("ai").await.unwrap();
    assert!(matches!(set.top[0], RelatedEntry::Topic { .. }));
}

#[tokio::test]
async fn test_404_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/related_queries"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // a single attempt, no retries
        .mount(&server)
        .await;

    let result = client(&server.uri()).related_queries("ai").await;
    assert!(matches!(result, Err(ProviderError::Status(404))));
}

#[tokio::test]
async fn test_malformed_body_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/related_queries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server.uri()).related_queries("ai").await;
    assert!(matches!(result, Err(ProviderError::Malformed(_))));
}

#[tokio::test]
async fn test_retries_exhausted_surfaces_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/related_topics"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4) // initial attempt + 3 retries
        .mount(&server)
        .await;

    let result = client(&server.uri()).related_topics("ai").await;
    assert!(matches!(result, Err(ProviderError::Status(503))));
}

#[tokio::test]
async fn test_rate_limited_status_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/related_topics"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = client(&server.uri()).related_topics("ai").await;
    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

#[tokio::test]
async fn test_regional_interest_excludes_zero_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/regional_interest"))
        .and(query_param("resolution", "COUNTRY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "regions": [
                {"region": "US", "values": {"ai": 100.0}},
                {"region": "GB", "values": {"ai": 0.0}}
            ]
        })))
        .mount(&server)
        .await;

    let query = Query::new(["ai"]).unwrap();
    let regional = client(&server.uri())
        .regional_interest(&query)
        .await
        .unwrap();

    assert_eq!(regional["ai"].len(), 1);
    assert_eq!(regional["ai"][0].region, "US");
}

#[tokio::test]
async fn test_trending_unsupported_region_yields_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let searches = client(&server.uri()).trending_now("XX").await.unwrap();
    assert!(searches.is_empty());
}

#[tokio::test]
async fn test_trending_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .and(query_param("region", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "searches": ["solar eclipse", "rust 2.0"]
        })))
        .mount(&server)
        .await;

    let searches = client(&server.uri()).trending_now("US").await.unwrap();
    assert_eq!(searches, vec!["solar eclipse", "rust 2.0"]);
}

#[tokio::test]
async fn test_geo_forwarded_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interest_over_time"))
        .and(query_param("geo", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"points": []})))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::new(["ai"]).unwrap().with_geo("US");
    let result = client(&server.uri()).interest_over_time(&query).await;
    assert!(result.is_ok());
}
