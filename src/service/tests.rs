//! Tests for the product service

use super::*;
use crate::error::{Error, Result};
use crate::store::{DuckDbStore, ProductStore};
use crate::types::{seed_products, NewProduct, PageRequest, Product};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use test_case::test_case;
use tower::ServiceExt;

// ============================================================================
// Coercion Tests
// ============================================================================

#[test_case("12", Some(12) ; "plain")]
#[test_case("12abc", Some(12) ; "trailing garbage")]
#[test_case("  7", Some(7) ; "leading whitespace")]
#[test_case("+5", Some(5) ; "plus sign")]
#[test_case("-3", Some(-3) ; "negative")]
#[test_case("1e3", Some(1) ; "exponent is not read")]
#[test_case("0x10", Some(0) ; "hex prefix stops at x")]
#[test_case("abc", None ; "no digits")]
#[test_case("", None ; "empty")]
#[test_case("-", None ; "sign only")]
#[test_case("99999999999999999999", Some(i64::MAX) ; "saturates")]
fn test_parse_int_prefix(input: &str, expected: Option<i64>) {
    assert_eq!(parse_int_prefix(input), expected);
}

#[test_case(None, 0 ; "missing")]
#[test_case(Some("18"), 18 ; "valid")]
#[test_case(Some("abc"), 0 ; "garbage")]
#[test_case(Some("-4"), 0 ; "negative")]
#[test_case(Some("9xyz"), 9 ; "digit prefix")]
fn test_cursor_coercion(from: Option<&str>, expected: u64) {
    let params = SearchParams {
        from: from.map(String::from),
        ..SearchParams::default()
    };
    assert_eq!(params.cursor(), expected);
}

#[test_case(None, 9 ; "missing")]
#[test_case(Some("20"), 20 ; "valid")]
#[test_case(Some("0"), 9 ; "zero")]
#[test_case(Some("-1"), 9 ; "negative")]
#[test_case(Some("lots"), 9 ; "garbage")]
#[test_case(Some("99999999999"), u32::MAX ; "clamped")]
fn test_page_size_coercion(limit: Option<&str>, expected: u32) {
    let params = SearchParams {
        limit: limit.map(String::from),
        ..SearchParams::default()
    };
    assert_eq!(params.page_size(), expected);
}

#[test]
fn test_parse_raw_query() {
    let params = SearchParams::parse(Some("query=board%20game&from=9&limit=3&other=1"));
    assert_eq!(params.query.as_deref(), Some("board game"));
    assert_eq!(params.from.as_deref(), Some("9"));
    assert_eq!(params.limit.as_deref(), Some("3"));

    let request = params.to_request();
    assert_eq!(request.cursor, 9);
    assert_eq!(request.page_size, 3);
}

#[test]
fn test_parse_raw_query_first_value_wins() {
    let params = SearchParams::parse(Some("from=2&from=7"));
    assert_eq!(params.cursor(), 2);
}

#[test]
fn test_parse_missing_query() {
    let params = SearchParams::parse(None);
    assert_eq!(params, SearchParams::default());
    assert_eq!(params.to_request(), PageRequest::default());
}

#[test]
fn test_empty_query_is_no_filter() {
    let request = SearchParams::parse(Some("query=")).to_request();
    assert!(request.query.is_none());
}

// ============================================================================
// Router Tests
// ============================================================================

fn seeded(count: usize) -> Arc<dyn ProductStore> {
    let store = DuckDbStore::in_memory().unwrap();
    store.insert_many(&seed_products(count)).unwrap();
    Arc::new(store)
}

struct FailingStore;

impl ProductStore for FailingStore {
    fn fetch_page(&self, _request: &PageRequest) -> Result<Vec<Product>> {
        Err(Error::store("database file is locked"))
    }

    fn count(&self, _query: Option<&str>) -> Result<u64> {
        Err(Error::store("database file is locked"))
    }

    fn insert_many(&self, _products: &[NewProduct]) -> Result<usize> {
        Err(Error::store("database file is locked"))
    }
}

async fn get(store: Arc<dyn ProductStore>, uri: &str) -> (StatusCode, Value) {
    let response = router(AppState::new(store))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(seeded(0), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_search_defaults() {
    let (status, body) = get(seeded(25), "/products/search").await;

    assert_eq!(status, StatusCode::OK);
    let names = names(&body);
    assert_eq!(names.len(), 9);
    assert_eq!(names[0], "Product 1");
    assert_eq!(names[8], "Product 9");
    assert_eq!(body[0]["price"], 10.0);
    assert_eq!(body[0]["category"], "Category A");
}

#[tokio::test]
async fn test_search_pages_through_collection() {
    let store = seeded(25);
    let mut sizes = Vec::new();
    for from in [0, 9, 18, 25] {
        let (status, body) = get(Arc::clone(&store), &format!("/products/search?from={from}&limit=9")).await;
        assert_eq!(status, StatusCode::OK);
        sizes.push(body.as_array().unwrap().len());
    }
    assert_eq!(sizes, vec![9, 9, 7, 0]);
}

#[tokio::test]
async fn test_search_past_end_is_empty() {
    let (status, body) = get(seeded(5), "/products/search?from=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_search_coerces_malformed_params() {
    let (status, body) = get(seeded(25), "/products/search?from=-3&limit=zero").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body)[0], "Product 1");
    assert_eq!(names(&body).len(), 9);

    let (status, body) = get(seeded(25), "/products/search?from=2abc&limit=3px").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Product 3", "Product 4", "Product 5"]);
}

#[tokio::test]
async fn test_search_bad_percent_encoding_is_not_rejected() {
    let (status, body) = get(seeded(3), "/products/search?from=%ZZ&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 2);
}

#[tokio::test]
async fn test_search_query_filters_case_insensitively() {
    let (status, body) = get(seeded(25), "/products/search?query=PRODUCT%202&limit=20").await;
    assert_eq!(status, StatusCode::OK);
    // "Product 2" and "Product 20".."Product 25"
    assert_eq!(names(&body).len(), 7);
    assert_eq!(names(&body)[0], "Product 2");
}

#[tokio::test]
async fn test_search_invalid_pattern_is_literal() {
    let (status, body) = get(seeded(5), "/products/search?query=%5B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_search_inline_regex_flags() {
    let (status, body) = get(seeded(25), "/products/search?query=%28%3Fx%29product%201").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));

    let (status, body) =
        get(seeded(25), "/products/search?query=%28%3Fx%29product%5C%201&limit=20").await;
    assert_eq!(status, StatusCode::OK);
    // "Product 1" and "Product 10".."Product 19"
    assert_eq!(names(&body).len(), 11);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let (status, body) = get(Arc::new(FailingStore), "/products/search?from=0").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "Internal Server Error" }));
    assert!(!body.to_string().contains("locked"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = router(AppState::new(seeded(1)))
        .oneshot(
            Request::builder()
                .uri("/products/search")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
