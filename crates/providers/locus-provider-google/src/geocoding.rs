//! Reverse geocoding through the Google Geocoding API

use crate::{check_status, endpoint, fetch_json, get_http_client, DEFAULT_REQUEST_TIMEOUT};
use async_trait::async_trait;
use locus_core::config::{GeocodingConfig, GOOGLE_MAPS_BASE_URL};
use locus_core::{Coordinate, GeocodeResult, LocusError, Result, ReverseGeocoder};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "Geocoding API";

/// Google Geocoding API client
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GoogleGeocoder {
    /// Create a geocoder against the public Maps endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GOOGLE_MAPS_BASE_URL.to_string())
    }

    /// Create a geocoder with a custom base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: get_http_client(),
            api_key,
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a geocoder from configuration; fails when no API key is set
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocusError::config("Geocoding API key is not configured"))?;
        Ok(Self::with_base_url(api_key, config.base_url.clone()))
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[async_trait]
impl ReverseGeocoder for GoogleGeocoder {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<GeocodeResult>> {
        let latlng = coordinate.to_string();
        let url = endpoint(
            &self.base_url,
            "geocode/json",
            &[("latlng", latlng.as_str()), ("key", self.api_key.as_str())],
        )?;

        debug!("Reverse geocoding {}", latlng);
        let body: GeocodeResponse = fetch_json(&self.client, url, self.timeout, SERVICE).await?;

        if !check_status(SERVICE, &body.status, body.error_message.as_deref())? {
            return Ok(Vec::new());
        }
        Ok(body.results)
    }
}
