//! Mock Google Maps web service for provider tests

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Test API key
pub const TEST_API_KEY: &str = "test-maps-key";

/// Canned replies and a log of received query strings
pub struct MockMapsState {
    /// Body returned by `/geocode/json`
    pub geocode_reply: RwLock<Value>,
    /// Body returned by `/place/textsearch/json`
    pub places_reply: RwLock<Value>,
    /// HTTP status to answer with instead of 200
    pub fail_with: RwLock<Option<StatusCode>>,
    /// Query parameters of every request, in arrival order
    pub requests: RwLock<Vec<HashMap<String, String>>>,
}

impl Default for MockMapsState {
    fn default() -> Self {
        Self {
            geocode_reply: RwLock::new(json!({"status": "ZERO_RESULTS", "results": []})),
            places_reply: RwLock::new(json!({"status": "ZERO_RESULTS", "results": []})),
            fail_with: RwLock::new(None),
            requests: RwLock::new(Vec::new()),
        }
    }
}

async fn reply(state: &MockMapsState, params: HashMap<String, String>, body: Value) -> axum::response::Response {
    state.requests.write().await.push(params);
    if let Some(status) = *state.fail_with.read().await {
        return (status, "upstream unavailable").into_response();
    }
    Json(body).into_response()
}

async fn geocode(
    State(state): State<Arc<MockMapsState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let body = state.geocode_reply.read().await.clone();
    reply(&state, params, body).await
}

async fn text_search(
    State(state): State<Arc<MockMapsState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let body = state.places_reply.read().await.clone();
    reply(&state, params, body).await
}

/// Start the mock Maps server; pass port 0 for an ephemeral port
pub async fn start_mock_maps(port: u16) -> (SocketAddr, Arc<MockMapsState>) {
    let state = Arc::new(MockMapsState::default());

    let app = Router::new()
        .route("/maps/api/geocode/json", get(geocode))
        .route("/maps/api/place/textsearch/json", get(text_search))
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let actual_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (actual_addr, state)
}

/// Base URL clients should use to reach the mock
pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{}/maps/api", addr)
}

/// Geocoding body with one result holding the given components
pub fn geocode_body(components: Value) -> Value {
    json!({
        "status": "OK",
        "results": [{"address_components": components, "formatted_address": "somewhere"}]
    })
}

/// Places result record in Google's shape
pub fn place_record(name: &str, lat: f64, lng: f64, rating: Option<f64>) -> Value {
    let mut record = json!({
        "name": name,
        "formatted_address": format!("{name}, San Francisco, CA"),
        "geometry": {"location": {"lat": lat, "lng": lng}},
        "types": ["restaurant", "food", "point_of_interest"],
        "place_id": format!("pid-{name}"),
    });
    if let Some(rating) = rating {
        record["rating"] = json!(rating);
    }
    record
}
