//! End-to-end validation behavior of the read flow
//!
//! Validation short-circuits before any network or cache activity, so these
//! tests run the full service without an origin server.

mod common;

use common::{raw_request, service_with_memory_cache};
use csv_pager::{PagerError, RawPageRequest, Surface};

fn assert_validation(result: Result<csv_pager::PageResponse, PagerError>, expected: &str) {
    match result {
        Err(err @ PagerError::Validation(_)) => {
            assert_eq!(err.to_string(), expected);
            assert_eq!(err.to_http_status(), 400);
        }
        other => panic!("expected validation failure '{}', got {:?}", expected, other),
    }
}

#[tokio::test]
async fn missing_url_is_rejected() {
    let (service, _) = service_with_memory_cache();
    let result = service.handle(RawPageRequest::default(), Surface::Query).await;
    assert_validation(result, "url is required");
}

#[tokio::test]
async fn non_csv_url_is_rejected() {
    let (service, _) = service_with_memory_cache();
    let result = service
        .handle(raw_request("https://x.test/data.json", None, None, None), Surface::Query)
        .await;
    assert_validation(result, "url should be a link to csv file");
}

#[tokio::test]
async fn non_positive_limit_is_rejected() {
    let (service, _) = service_with_memory_cache();
    for bad in ["0", "-1", "abc"] {
        let result = service
            .handle(
                raw_request("https://x.test/data.csv", None, Some(bad), None),
                Surface::Query,
            )
            .await;
        assert_validation(result, "limit should be greater than 0");
    }
}

#[tokio::test]
async fn limit_above_configured_max_is_rejected() {
    let (service, _) = service_with_memory_cache();
    let result = service
        .handle(
            raw_request("https://x.test/data.csv", None, Some("101"), None),
            Surface::Query,
        )
        .await;
    assert_validation(result, "limit should be less than or equal to 100");
}

#[tokio::test]
async fn page_below_one_is_rejected() {
    let (service, _) = service_with_memory_cache();
    let result = service
        .handle(
            raw_request("https://x.test/data.csv", Some("0"), None, None),
            Surface::Query,
        )
        .await;
    assert_validation(result, "page should be greater than 0");
}

#[tokio::test]
async fn body_surface_reports_absent_fields_as_required() {
    let (service, _) = service_with_memory_cache();

    let result = service
        .handle(raw_request("https://x.test/data.csv", None, None, None), Surface::Body)
        .await;
    assert_validation(result, "limit is required and should be greater than 0");

    let result = service
        .handle(
            raw_request("https://x.test/data.csv", None, Some("10"), None),
            Surface::Body,
        )
        .await;
    assert_validation(result, "page is required and should be greater than 0");
}

#[tokio::test]
async fn validation_failures_touch_neither_origin_nor_cache() {
    let (service, provider) = service_with_memory_cache();
    // A url pointing nowhere: if validation did not short-circuit, the fetch
    // would error with a non-validation failure
    let result = service
        .handle(
            raw_request("https://x.test/data.csv", Some("0"), None, None),
            Surface::Query,
        )
        .await;
    assert_validation(result, "page should be greater than 0");
    assert!(provider.is_empty());
}
