//! Locus Core
//!
//! Turns a free-text request for nearby places ("somewhere for tacos") plus the
//! user's position into a ranked list of matching places. It includes:
//!
//! - Location context resolution through a reverse geocoder
//! - Intent extraction through a language-model chat provider
//! - Place search with great-circle distance ranking
//! - The [`PlaceFinder`] pipeline that sequences the three stages
//! - Configuration loading, logging setup and in-memory test providers
//!
//! # Example
//!
//! ```no_run
//! use locus_core::testing::{FakeChatModel, FakeGeocoder, FakePlaceSearch};
//! use locus_core::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let finder = PlaceFinder::from_config(
//!         Arc::new(FakeGeocoder::locality("San Francisco")),
//!         Arc::new(FakeChatModel::intent("tacos", "Restaurant/Cafe", "Taco places")),
//!         Arc::new(FakePlaceSearch::empty()),
//!         &LocusConfig::default(),
//!     );
//!     let result = finder.find_places("tacos", Coordinate::new(37.7749, -122.4194)).await?;
//!     println!("{}", result.search_phrase_used);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod distance;
pub mod error;
pub mod intent;
pub mod pipeline;
pub mod places;
pub mod providers;
pub mod testing;
pub mod types;
pub mod utils;

pub use config::LocusConfig;
pub use context::LocationContextResolver;
pub use distance::{distance_km, format_distance};
pub use error::{LocusError, PipelineStage, Result};
pub use intent::{parse_intent, IntentExtractor};
pub use pipeline::{normalize_search_phrase, PlaceFinder};
pub use places::{rank_by_distance, PlaceSearchClient};
pub use providers::{ChatModel, PlaceSearchProvider, ReverseGeocoder};
pub use types::{
    AddressComponent, ChatPrompt, Coordinate, GeocodeResult, Place, PlaceCandidate,
    PlaceCategory, SearchIntent, SearchResult, TextSearchRequest,
};
pub use utils::logger::{init_logging, Logger};
