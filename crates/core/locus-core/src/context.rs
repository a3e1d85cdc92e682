//! Location context resolution
//!
//! Turns the user's coordinate into a locality name ("San Francisco") that the
//! intent prompt and the search phrase can mention. Failures never propagate:
//! an unresolvable position simply yields an empty context.

use crate::providers::ReverseGeocoder;
use crate::types::{Coordinate, GeocodeResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Address component type for a city or town
pub const LOCALITY: &str = "locality";

/// Address component type for a state or region
pub const ADMIN_AREA_LEVEL_1: &str = "administrative_area_level_1";

/// Resolves a coordinate into a human-readable locality
pub struct LocationContextResolver {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationContextResolver {
    /// Create a resolver over a reverse geocoding provider
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Locality for the coordinate, or an empty string when none can be found
    pub async fn resolve_context(&self, coordinate: Coordinate) -> String {
        match self.geocoder.reverse_geocode(coordinate).await {
            Ok(results) => {
                let context = pick_locality(&results);
                if context.is_empty() {
                    debug!("No locality or region found for {}", coordinate);
                } else {
                    debug!("Resolved {} to '{}'", coordinate, context);
                }
                context
            }
            Err(e) => {
                warn!("Location context unavailable for {}: {}", coordinate, e);
                String::new()
            }
        }
    }
}

/// Locality of the first result, falling back to its first-level admin area
pub fn pick_locality(results: &[GeocodeResult]) -> String {
    let Some(first) = results.first() else {
        return String::new();
    };

    first
        .address_components
        .iter()
        .find(|c| c.has_type(LOCALITY))
        .or_else(|| {
            first
                .address_components
                .iter()
                .find(|c| c.has_type(ADMIN_AREA_LEVEL_1))
        })
        .map(|c| c.long_name.clone())
        .unwrap_or_default()
}
