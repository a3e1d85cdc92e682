//! Place search and distance ranking

use crate::distance::distance_km;
use crate::providers::PlaceSearchProvider;
use crate::types::{Coordinate, Place, PlaceCandidate, TextSearchRequest};
use crate::{LocusError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Radius the text search is scoped to around the user
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 5_000;

/// Searches for places and orders them by distance from the origin
pub struct PlaceSearchClient {
    provider: Arc<dyn PlaceSearchProvider>,
    radius_m: u32,
}

impl PlaceSearchClient {
    /// Create a client with the default 5 km radius
    pub fn new(provider: Arc<dyn PlaceSearchProvider>) -> Self {
        Self::with_radius(provider, DEFAULT_SEARCH_RADIUS_M)
    }

    /// Create a client with a custom search radius in meters
    pub fn with_radius(provider: Arc<dyn PlaceSearchProvider>, radius_m: u32) -> Self {
        Self { provider, radius_m }
    }

    /// Search radius in meters
    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Places matching the phrase, nearest first
    ///
    /// # Errors
    /// [`LocusError::NoResults`] when the provider finds nothing, and whatever the
    /// provider raised (normally [`LocusError::Provider`]) when the call fails.
    pub async fn search_places(&self, phrase: &str, origin: Coordinate) -> Result<Vec<Place>> {
        let request = TextSearchRequest {
            query: phrase.to_string(),
            origin,
            radius_m: self.radius_m,
        };

        debug!(
            "Searching '{}' within {} m of {}",
            phrase, self.radius_m, origin
        );
        let candidates = self.provider.text_search(&request).await?;

        if candidates.is_empty() {
            return Err(LocusError::no_results(format!(
                "no places found for '{}'",
                phrase
            )));
        }

        let places = rank_by_distance(candidates, origin);
        info!("Found {} places for '{}'", places.len(), phrase);
        Ok(places)
    }
}

/// Attach distances and sort ascending; equal distances keep provider order
pub fn rank_by_distance(candidates: Vec<PlaceCandidate>, origin: Coordinate) -> Vec<Place> {
    let mut places: Vec<Place> = candidates
        .into_iter()
        .map(|candidate| {
            let distance = distance_km(origin, candidate.coordinate);
            Place::from_candidate(candidate, distance)
        })
        .collect();

    // Vec::sort_by is stable
    places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    places
}
