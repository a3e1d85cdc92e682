//! Web adaptor for Locus
//!
//! Exposes the place search pipeline over HTTP with axum. Validation failures
//! answer 400; pipeline failures answer with a generic notice, a status code
//! chosen from the failure kind and the stage that failed.
//!
//! ```no_run
//! use locus_adaptor_web::{build_router, SearchApiState};
//! use locus_core::testing::{FakeChatModel, FakeGeocoder, FakePlaceSearch};
//! use locus_core::{LocusConfig, PlaceFinder};
//! use std::sync::Arc;
//!
//! let finder = PlaceFinder::from_config(
//!     Arc::new(FakeGeocoder::empty()),
//!     Arc::new(FakeChatModel::intent("tacos", "Restaurant/Cafe", "")),
//!     Arc::new(FakePlaceSearch::empty()),
//!     &LocusConfig::default(),
//! );
//! let app = build_router(SearchApiState::new(finder), &["*".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{
    build_router, health_check, search_handler, LatLng, SearchApiState, SearchRequest,
    SearchResponse,
};
