//! HTTP routes
//!
//! - `POST /api/search` runs the pipeline for `{query, userLocation: {lat, lng}}`
//! - `GET /health` reports liveness

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use locus_core::{Coordinate, LocusError, PlaceFinder, SearchResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

/// Longest query accepted, in characters
pub const MAX_QUERY_CHARS: usize = 500;

/// Shared state for the search routes
pub struct SearchApiState {
    /// Pipeline every request runs through
    pub finder: Arc<PlaceFinder>,
}

impl SearchApiState {
    /// Wrap a finder for use as router state
    pub fn new(finder: PlaceFinder) -> Arc<Self> {
        Arc::new(Self {
            finder: Arc::new(finder),
        })
    }
}

/// Position as sent by clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// Search request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// What the user is looking for, in their own words
    pub query: String,
    /// Where the user is
    #[serde(alias = "user_location")]
    pub user_location: LatLng,
}

impl SearchRequest {
    /// Check the query and coordinates, returning the trimmed query and origin
    pub fn validate(&self) -> locus_core::Result<(&str, Coordinate)> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(LocusError::validation("query must not be empty"));
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(LocusError::validation(format!(
                "query must be at most {} characters",
                MAX_QUERY_CHARS
            )));
        }

        let origin = Coordinate::new(self.user_location.lat, self.user_location.lng);
        if !origin.is_valid() {
            return Err(LocusError::validation(
                "userLocation must have lat in [-90, 90] and lng in [-180, 180]",
            ));
        }
        Ok((query, origin))
    }
}

/// Successful search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Always true
    pub success: bool,
    /// Identifier echoed in the server logs
    pub request_id: Uuid,
    /// Pipeline output
    #[serde(flatten)]
    pub result: SearchResult,
}

/// POST /api/search
pub async fn search_handler(
    State(state): State<Arc<SearchApiState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (query, origin) = request.validate()?;

    let request_id = Uuid::new_v4();
    info!(%request_id, "Search '{}' at {}", query, origin);

    let result = state.finder.find_places(query, origin).await?;

    info!(
        %request_id,
        "Returning {} places for '{}'",
        result.places.len(),
        result.search_phrase_used
    );
    Ok(Json(SearchResponse {
        success: true,
        request_id,
        result,
    }))
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// CORS policy for the given origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the router with every route, CORS and request tracing
pub fn build_router(state: Arc<SearchApiState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/search", post(search_handler))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
