//! Integration tests for `HttpFetcher` + `Discovery` against a local
//! `wiremock` server. Covers pagination, details merging, and the retry
//! policy for each class of upstream failure.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leadgen_places::{Discovery, HttpFetcher, PlacesError, RetryPolicy};

fn test_discovery(server: &MockServer, max_attempts: u32, cap: usize) -> Discovery<HttpFetcher> {
    let fetcher = HttpFetcher::new(5, "leadgen-test/0.1", RetryPolicy::immediate(max_attempts))
        .expect("failed to build test HttpFetcher");
    Discovery::new(fetcher, "test-key", cap)
        .with_base_url(&server.uri())
        .with_page_token_delay(Duration::ZERO)
}

fn cities(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| (*c).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn discover_paginates_and_merges_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "learning in Pune"))
        .and(query_param("type", "establishment"))
        .and(query_param("key", "test-key"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{"place_id": "p1", "name": "Acme Learning Solutions", "types": ["school"]}],
            "next_page_token": "NEXT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("pagetoken", "NEXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{"place_id": "p2", "name": "Beta Bank", "types": ["bank"]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "p1"))
        .and(query_param(
            "fields",
            "name,formatted_address,international_phone_number,website,types",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "name": "Acme Learning Solutions",
                "formatted_address": "1 MG Road, Pune",
                "website": "https://acmelearning.com/",
                "types": ["school", "establishment"]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "NOT_FOUND"
        })))
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 1, 120);
    let records = discovery
        .discover("learning", &cities(&["Pune"]))
        .await
        .expect("discovery should succeed");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].address.as_deref(), Some("1 MG Road, Pune"));
    assert_eq!(
        records[0].website.as_deref(),
        Some("https://acmelearning.com/")
    );
    assert_eq!(records[0].types, vec!["school", "establishment"]);
    // NOT_FOUND on details degrades to the search fields.
    assert_eq!(records[1].name.as_deref(), Some("Beta Bank"));
    assert_eq!(records[1].types, vec!["bank"]);
    assert!(records[1].website.is_none());
}

#[tokio::test]
async fn zero_results_is_an_empty_city_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 1, 120);
    let records = discovery
        .discover("learning", &cities(&["Nowhere"]))
        .await
        .expect("ZERO_RESULTS should not fail");
    assert!(records.is_empty());
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn over_query_limit_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "OVER_QUERY_LIMIT"})),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{"name": "Third Time Lucky"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 5, 120);
    let records = discovery
        .discover("learning", &cities(&["Pune"]))
        .await
        .expect("should succeed after retries");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("Third Time Lucky"));
}

#[tokio::test]
async fn over_query_limit_exhausted_fails_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your daily request quota."
        })))
        .expect(5)
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 5, 120);
    let result = discovery.discover("learning", &cities(&["Pune"])).await;

    match result {
        Err(PlacesError::TransientStatus { status, message }) => {
            assert_eq!(status, "OVER_QUERY_LIMIT");
            assert!(message.contains("daily request quota"));
        }
        other => panic!("expected TransientStatus after exhaustion, got: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_status_fails_immediately_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 5, 120);
    let result = discovery.discover("learning", &cities(&["Pune"])).await;

    match result {
        Err(PlacesError::UpstreamStatus { status, message }) => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message, "The provided API key is invalid.");
        }
        other => panic!("expected UpstreamStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_retried_up_to_the_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 3, 120);
    let result = discovery.discover("learning", &cities(&["Pune"])).await;

    match result {
        Err(PlacesError::UnexpectedStatus { status, endpoint }) => {
            assert_eq!(status, 503);
            assert!(
                !endpoint.contains("test-key"),
                "endpoint must not leak the API key: {endpoint}"
            );
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn html_error_page_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{"name": "Second Try Labs"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 5, 120);
    let records = discovery
        .discover("learning", &cities(&["Pune"]))
        .await
        .expect("should succeed after one retry");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("Second Try Labs"));
}

#[tokio::test]
async fn persistent_non_json_body_exhausts_the_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
        )
        .expect(3)
        .mount(&server)
        .await;

    let discovery = test_discovery(&server, 3, 120);
    let result = discovery.discover("learning", &cities(&["Pune"])).await;
    assert!(
        matches!(result, Err(PlacesError::MalformedBody { .. })),
        "expected MalformedBody, got: {result:?}"
    );
}
