//! Domain types shared by the pipeline, the providers and the transport layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe in decimal degrees
///
/// Ranges are not enforced here; callers validate at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components fall inside their valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Closed set of place categories the model may assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaceCategory {
    /// Restaurants and cafes
    RestaurantCafe,
    /// Shops and malls
    Shopping,
    /// Cinemas, arcades, venues
    Entertainment,
    /// Parks, trails, beaches
    OutdoorPark,
    /// Museums, galleries, landmarks
    Cultural,
    /// Bars and clubs
    Nightlife,
    /// Gyms, clinics, spas
    HealthFitness,
    /// Schools, libraries
    Education,
    /// Banks, repairs, salons and other services
    Services,
    /// Anything outside the set above
    #[default]
    Other,
}

impl PlaceCategory {
    /// Every category, in prompt order
    pub const ALL: [PlaceCategory; 10] = [
        PlaceCategory::RestaurantCafe,
        PlaceCategory::Shopping,
        PlaceCategory::Entertainment,
        PlaceCategory::OutdoorPark,
        PlaceCategory::Cultural,
        PlaceCategory::Nightlife,
        PlaceCategory::HealthFitness,
        PlaceCategory::Education,
        PlaceCategory::Services,
        PlaceCategory::Other,
    ];

    /// Label the model is asked to produce
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestaurantCafe => "Restaurant/Cafe",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::OutdoorPark => "Outdoor/Park",
            Self::Cultural => "Cultural",
            Self::Nightlife => "Nightlife",
            Self::HealthFitness => "Health/Fitness",
            Self::Education => "Education",
            Self::Services => "Services",
            Self::Other => "Other",
        }
    }

    /// Map a model-provided label onto the closed set; unknown labels become `Other`
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PlaceCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PlaceCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Structured interpretation of a free-text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIntent {
    /// Phrase to send to the place search provider (never empty)
    pub search_phrase: String,
    /// Category from the closed set
    pub category: PlaceCategory,
    /// Human-readable description of what the user is looking for
    pub description: String,
}

/// One typed component of a geocoded address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    /// Full name, e.g. "San Francisco"
    pub long_name: String,
    /// Abbreviated name, e.g. "SF"
    #[serde(default)]
    pub short_name: String,
    /// Component types, e.g. ["locality", "political"]
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    /// Whether this component carries the given type tag
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// One reverse-geocoding match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Address components, most specific first
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

/// Raw place record as returned by the place search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Display name
    pub name: String,
    /// Provider-formatted address
    pub formatted_address: String,
    /// Location of the place
    pub coordinate: Coordinate,
    /// Average user rating, when the provider has one
    pub rating: Option<f64>,
    /// Provider category tags, in provider order
    pub categories: Vec<String>,
    /// Provider-assigned identifier
    pub external_id: String,
}

/// A place ready to be shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Display name
    pub name: String,
    /// Formatted address
    pub address: String,
    /// Location of the place
    pub coordinate: Coordinate,
    /// Average user rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Provider category tags
    pub categories: Vec<String>,
    /// Provider-assigned identifier
    pub external_id: String,
    /// Great-circle distance from the search origin
    pub distance_km: f64,
    /// Distance formatted for display ("300 m", "1.2 km")
    pub distance_label: String,
}

impl Place {
    /// Build a place from a provider record and its distance from the origin
    pub fn from_candidate(candidate: PlaceCandidate, distance_km: f64) -> Self {
        Self {
            name: candidate.name,
            address: candidate.formatted_address,
            coordinate: candidate.coordinate,
            rating: candidate.rating,
            categories: candidate.categories,
            external_id: candidate.external_id,
            distance_km,
            distance_label: crate::distance::format_distance(distance_km),
        }
    }
}

/// Final answer for one query; never partially filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Phrase actually sent to the place search provider
    pub search_phrase_used: String,
    /// Category assigned by the model
    pub category: PlaceCategory,
    /// Description assigned by the model
    pub description: String,
    /// Places ordered by ascending distance
    pub places: Vec<Place>,
}

/// System and user messages for one chat completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    /// Fixed instruction
    pub system: String,
    /// Query plus location context
    pub user: String,
}

/// Parameters for one text-based place search
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearchRequest {
    /// Free-text query
    pub query: String,
    /// Center of the search area
    pub origin: Coordinate,
    /// Search radius in meters
    pub radius_m: u32,
}
