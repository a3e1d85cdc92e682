//! Common test utilities for the web adaptor

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use locus_adaptor_web::{build_router, SearchApiState};
use locus_core::{Coordinate, PlaceFinder};
use serde::Deserialize;
use serde_json::{json, Value};

/// Where the tacos scenario happens
pub const SAN_FRANCISCO: Coordinate = Coordinate::new(37.7749, -122.4194);

/// Router over a finder with permissive CORS
pub fn router_for(finder: PlaceFinder) -> Router {
    build_router(SearchApiState::new(finder), &["*".to_string()])
}

/// Search request body for a query at a position
pub fn search_body(query: &str, at: Coordinate) -> Value {
    json!({
        "query": query,
        "userLocation": {"lat": at.latitude, "lng": at.longitude}
    })
}

/// POST a JSON body to the search endpoint
pub fn search_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/search")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Assert that a response has the expected status code
pub fn assert_status(response: &axum::response::Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Extract JSON body from response
pub async fn extract_json<T: for<'de> Deserialize<'de>>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
