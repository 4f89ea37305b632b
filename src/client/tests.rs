//! Tests for the fetch client

use super::feed::{build_url, page_url};
use super::*;
use crate::error::Error;
use crate::loader::PageSource;
use crate::types::PageRequest;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> FeedClient {
    let config = FeedClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    FeedClient::with_config(config).unwrap()
}

fn products_json(range: std::ops::RangeInclusive<i64>) -> serde_json::Value {
    json!(range
        .map(|i| json!({
            "id": i,
            "name": format!("Product {i}"),
            "description": format!("Description for product {i}"),
            "price": i * 10,
            "category": "Category A"
        }))
        .collect::<Vec<_>>())
}

#[test]
fn test_client_config_default() {
    let config = FeedClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:5000");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("scrollfeed/"));
}

#[test]
fn test_client_config_builder() {
    let config = FeedClientConfig::builder()
        .base_url("http://api.example.com")
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::new(2, 4))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "http://api.example.com");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_build_url_keeps_base_path() {
    let url = build_url("http://host:5000/api/", SEARCH_PATH).unwrap();
    assert_eq!(url.as_str(), "http://host:5000/api/products/search");
}

#[test]
fn test_build_url_rejects_garbage() {
    assert!(matches!(
        build_url("not a url", SEARCH_PATH),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_page_url_params() {
    let search = build_url("http://host", SEARCH_PATH).unwrap();

    let url = page_url(&search, &PageRequest::new(18, 9));
    assert_eq!(url.as_str(), "http://host/products/search?from=18&limit=9");

    let url = page_url(
        &search,
        &PageRequest::new(0, 9).with_query(Some("board game".to_string())),
    );
    assert_eq!(
        url.as_str(),
        "http://host/products/search?query=board+game&from=0&limit=9"
    );
}

#[tokio::test]
async fn test_fetch_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("from", "9"))
        .and(query_param("limit", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json(10..=18)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.fetch_page(&PageRequest::new(9, 9)).await.unwrap();

    assert_eq!(page.len(), 9);
    assert_eq!(page[0].name, "Product 10");
    assert_eq!(page[8].price, 180.0);
}

#[tokio::test]
async fn test_fetch_page_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("query", "game"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .fetch_page(&PageRequest::new(0, 9).with_query(Some("game".to_string())))
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_page_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Internal Server Error"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_page(&PageRequest::default()).await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Internal Server Error"));
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_page_not_an_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.fetch_page(&PageRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_fetch_page_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = FeedClientConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_millis(50))
        .no_rate_limit()
        .build();
    let client = FeedClient::with_config(config).unwrap();

    let err = client.fetch_page(&PageRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Nothing listens on port 9 (discard) on test machines
    let client = FeedClient::with_config(
        FeedClientConfig::builder()
            .base_url("http://127.0.0.1:9")
            .no_rate_limit()
            .build(),
    )
    .unwrap();

    let err = client.fetch_page(&PageRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_page_source_impl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json(1..=3)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let source: &dyn PageSource = &client;
    let page = source.fetch(&PageRequest::new(0, 3)).await.unwrap();
    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.health().await.is_ok());
    assert!(!client.has_rate_limiter());
}
