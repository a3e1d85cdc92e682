//! Seams for the three external collaborators
//!
//! The pipeline only talks to these traits; HTTP implementations live in the
//! provider crates and in-memory fakes live in [`crate::testing`].

use crate::types::{ChatPrompt, Coordinate, GeocodeResult, PlaceCandidate, TextSearchRequest};
use crate::Result;
use async_trait::async_trait;

/// Reverse geocoding provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Address matches for a coordinate, most relevant first; empty when nothing matched
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<GeocodeResult>>;
}

/// Language-model chat provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Free-text reply to a system instruction plus user message
    async fn complete(&self, prompt: ChatPrompt) -> Result<String>;
}

/// Text-based place search provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    /// Places matching the query around the origin, in provider order
    async fn text_search(&self, request: &TextSearchRequest) -> Result<Vec<PlaceCandidate>>;
}
