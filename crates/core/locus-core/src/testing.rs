//! In-memory providers for tests
//!
//! Each fake returns a canned reply, can be slowed down with a delay, and records
//! what it was asked so tests can assert on the outbound traffic.

use crate::distance::EARTH_RADIUS_KM;
use crate::providers::{ChatModel, PlaceSearchProvider, ReverseGeocoder};
use crate::types::{
    AddressComponent, ChatPrompt, Coordinate, GeocodeResult, PlaceCandidate, TextSearchRequest,
};
use crate::{LocusError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Kilometers per degree of latitude on the haversine sphere
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Coordinate `km` kilometers due north of `origin`
pub fn north_of(origin: Coordinate, km: f64) -> Coordinate {
    Coordinate::new(origin.latitude + km / KM_PER_DEGREE, origin.longitude)
}

/// Address component with the given name and types
pub fn address_component(name: &str, types: &[&str]) -> AddressComponent {
    AddressComponent {
        long_name: name.to_string(),
        short_name: name.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

/// Place record with a rating and a single category tag
pub fn place_candidate(name: &str, coordinate: Coordinate) -> PlaceCandidate {
    PlaceCandidate {
        name: name.to_string(),
        formatted_address: format!("{name}, Test City"),
        coordinate,
        rating: Some(4.0),
        categories: vec!["point_of_interest".to_string()],
        external_id: format!("place-{}", name.to_lowercase().replace(' ', "-")),
    }
}

fn lock<T: Clone>(calls: &Mutex<Vec<T>>) -> Vec<T> {
    calls.lock().map(|c| c.clone()).unwrap_or_default()
}

fn record<T>(calls: &Mutex<Vec<T>>, value: T) {
    if let Ok(mut calls) = calls.lock() {
        calls.push(value);
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

/// Reverse geocoder with a canned reply
pub struct FakeGeocoder {
    reply: std::result::Result<Vec<GeocodeResult>, String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Coordinate>>,
}

impl FakeGeocoder {
    /// Reply with the given results
    pub fn with_results(results: Vec<GeocodeResult>) -> Self {
        Self {
            reply: Ok(results),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with one result whose locality is `name`
    pub fn locality(name: &str) -> Self {
        Self::with_results(vec![GeocodeResult {
            address_components: vec![
                address_component(name, &["locality", "political"]),
                address_component("Test State", &["administrative_area_level_1", "political"]),
            ],
        }])
    }

    /// Reply with no results
    pub fn empty() -> Self {
        Self::with_results(Vec::new())
    }

    /// Fail every call with a provider error
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before replying
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Coordinates looked up so far
    pub fn calls(&self) -> Vec<Coordinate> {
        lock(&self.calls)
    }
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<GeocodeResult>> {
        record(&self.calls, coordinate);
        pause(self.delay).await;
        self.reply.clone().map_err(LocusError::provider)
    }
}

/// Chat model with a canned reply
pub struct FakeChatModel {
    reply: std::result::Result<String, String>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<ChatPrompt>>,
}

impl FakeChatModel {
    /// Reply with the given text
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with a well-formed intent object
    pub fn intent(search_query: &str, category: &str, description: &str) -> Self {
        Self::replying(
            serde_json::json!({
                "searchQuery": search_query,
                "type": category,
                "description": description,
            })
            .to_string(),
        )
    }

    /// Fail every call with a provider error
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before replying
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<ChatPrompt> {
        lock(&self.prompts)
    }
}

#[async_trait]
impl ChatModel for FakeChatModel {
    async fn complete(&self, prompt: ChatPrompt) -> Result<String> {
        record(&self.prompts, prompt);
        pause(self.delay).await;
        self.reply.clone().map_err(LocusError::provider)
    }
}

/// Place search provider with a canned reply
pub struct FakePlaceSearch {
    reply: std::result::Result<Vec<PlaceCandidate>, String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<TextSearchRequest>>,
}

impl FakePlaceSearch {
    /// Reply with the given candidates, in this order
    pub fn returning(candidates: Vec<PlaceCandidate>) -> Self {
        Self {
            reply: Ok(candidates),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with no candidates
    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    /// Fail every call with a provider error
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before replying
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<TextSearchRequest> {
        lock(&self.requests)
    }
}

#[async_trait]
impl PlaceSearchProvider for FakePlaceSearch {
    async fn text_search(&self, request: &TextSearchRequest) -> Result<Vec<PlaceCandidate>> {
        record(&self.requests, request.clone());
        pause(self.delay).await;
        self.reply.clone().map_err(LocusError::provider)
    }
}
