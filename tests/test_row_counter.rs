//! Integration tests for the cache-backed row-count estimator

mod common;

use common::sample_csv;
use csv_pager::cache::{total_key, CacheProvider};
use csv_pager::{MemoryProvider, PagerMetrics, RemoteFetcher, RowCountEstimator};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn estimator() -> RowCountEstimator {
    RowCountEstimator::new(3600, PagerMetrics::new().unwrap())
}

fn fetcher() -> RemoteFetcher {
    RemoteFetcher::new(Duration::from_millis(5000)).unwrap()
}

#[tokio::test]
async fn counts_rows_and_memoizes_per_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_csv(17)))
        .mount(&server)
        .await;

    let provider = MemoryProvider::new();
    let mut store = provider.acquire().await.unwrap();
    let url = format!("{}/data.csv", server.uri());
    let estimator = estimator();
    let fetcher = fetcher();

    let total = estimator
        .estimate(&fetcher, store.as_mut(), &url)
        .await
        .unwrap();
    assert_eq!(total, 17);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    // Second estimate within the TTL reads the cache, not the origin
    let again = estimator
        .estimate(&fetcher, store.as_mut(), &url)
        .await
        .unwrap();
    assert_eq!(again, 17);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn trailing_newline_inflates_the_estimate() {
    let server = MockServer::start().await;
    let mut body = sample_csv(4);
    body.push('\n');
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let provider = MemoryProvider::new();
    let mut store = provider.acquire().await.unwrap();
    let url = format!("{}/data.csv", server.uri());

    // The estimate is line-based and documented as approximate
    let total = estimator()
        .estimate(&fetcher(), store.as_mut(), &url)
        .await
        .unwrap();
    assert_eq!(total, 5);
}

#[tokio::test]
async fn corrupt_cache_entry_triggers_recompute() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_csv(9)))
        .mount(&server)
        .await;

    let provider = MemoryProvider::new();
    let mut store = provider.acquire().await.unwrap();
    let url = format!("{}/data.csv", server.uri());
    store
        .set(&total_key(&url), "not-a-number", 3600)
        .await
        .unwrap();

    let total = estimator()
        .estimate(&fetcher(), store.as_mut(), &url)
        .await
        .unwrap();
    assert_eq!(total, 9);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn fetch_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = MemoryProvider::new();
    let mut store = provider.acquire().await.unwrap();
    let url = format!("{}/data.csv", server.uri());

    let result = estimator().estimate(&fetcher(), store.as_mut(), &url).await;
    assert!(result.is_err());
    // Nothing was cached for the failed fetch
    assert!(provider.is_empty());
}
