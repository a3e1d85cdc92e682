//! Text search through the Google Places API

use crate::{check_status, endpoint, fetch_json, get_http_client, DEFAULT_REQUEST_TIMEOUT};
use async_trait::async_trait;
use locus_core::config::{PlaceSearchConfig, GOOGLE_MAPS_BASE_URL};
use locus_core::{Coordinate, LocusError, PlaceCandidate, PlaceSearchProvider, Result, TextSearchRequest};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "Places API";

/// Google Places Text Search client
pub struct GooglePlaceSearch {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GooglePlaceSearch {
    /// Create a client against the public Maps endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GOOGLE_MAPS_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: get_http_client(),
            api_key,
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a client from configuration; fails when no API key is set
    pub fn from_config(config: &PlaceSearchConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocusError::config("Places API key is not configured"))?;
        Ok(Self::with_base_url(api_key, config.base_url.clone()))
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: String,
    #[serde(default)]
    formatted_address: String,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl RawPlace {
    /// Places without a location cannot be ranked and are dropped
    fn into_candidate(self) -> Option<PlaceCandidate> {
        let Some(geometry) = self.geometry else {
            debug!("Dropping '{}': no geometry", self.name);
            return None;
        };
        Some(PlaceCandidate {
            name: self.name,
            formatted_address: self.formatted_address,
            coordinate: Coordinate::new(geometry.location.lat, geometry.location.lng),
            rating: self.rating,
            categories: self.types,
            external_id: self.place_id,
        })
    }
}

#[async_trait]
impl PlaceSearchProvider for GooglePlaceSearch {
    async fn text_search(&self, request: &TextSearchRequest) -> Result<Vec<PlaceCandidate>> {
        let location = request.origin.to_string();
        let radius = request.radius_m.to_string();
        let url = endpoint(
            &self.base_url,
            "place/textsearch/json",
            &[
                ("query", request.query.as_str()),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )?;

        debug!(
            "Text search '{}' around {} ({} m)",
            request.query, location, request.radius_m
        );
        let body: TextSearchResponse = fetch_json(&self.client, url, self.timeout, SERVICE).await?;

        if !check_status(SERVICE, &body.status, body.error_message.as_deref())? {
            return Ok(Vec::new());
        }

        Ok(body
            .results
            .into_iter()
            .filter_map(RawPlace::into_candidate)
            .collect())
    }
}
