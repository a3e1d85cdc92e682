//! Pipeline orchestration
//!
//! One request runs a fixed sequence: resolve the user's locality, ask the model
//! what they are looking for, anchor the search phrase to the locality, then
//! search and rank. Every outbound stage is bounded by the same timeout. Context
//! failures degrade to an empty locality; intent and search failures abort the
//! request tagged with their [`PipelineStage`].

use crate::config::LocusConfig;
use crate::context::LocationContextResolver;
use crate::intent::IntentExtractor;
use crate::places::PlaceSearchClient;
use crate::providers::{ChatModel, PlaceSearchProvider, ReverseGeocoder};
use crate::types::{Coordinate, SearchResult};
use crate::{LocusError, PipelineStage, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Stage budget used when none is configured
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Anchor a search phrase to the user's locality
///
/// Appends `" near {context}"` unless the phrase already says where to look
/// (contains "near" or "in ", case-insensitive) or the context is blank.
pub fn normalize_search_phrase(phrase: &str, context: &str) -> String {
    let context = context.trim();
    if context.is_empty() {
        return phrase.to_string();
    }

    let lowered = phrase.to_lowercase();
    if lowered.contains("near") || lowered.contains("in ") {
        phrase.to_string()
    } else {
        format!("{phrase} near {context}")
    }
}

/// Runs the full query-to-places pipeline
pub struct PlaceFinder {
    resolver: LocationContextResolver,
    extractor: IntentExtractor,
    search: PlaceSearchClient,
    stage_timeout: Duration,
}

impl PlaceFinder {
    /// Assemble a finder from its three components
    pub fn new(
        resolver: LocationContextResolver,
        extractor: IntentExtractor,
        search: PlaceSearchClient,
    ) -> Self {
        Self {
            resolver,
            extractor,
            search,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Wire a finder over the three providers using the configured radius and timeout
    pub fn from_config(
        geocoder: Arc<dyn ReverseGeocoder>,
        model: Arc<dyn ChatModel>,
        places: Arc<dyn PlaceSearchProvider>,
        config: &LocusConfig,
    ) -> Self {
        Self::new(
            LocationContextResolver::new(geocoder),
            IntentExtractor::new(model),
            PlaceSearchClient::with_radius(places, config.places.radius_m),
        )
        .with_stage_timeout(config.pipeline.stage_timeout())
    }

    /// Override the per-stage timeout
    pub fn with_stage_timeout(mut self, stage_timeout: Duration) -> Self {
        self.stage_timeout = stage_timeout;
        self
    }

    /// Per-stage timeout
    pub fn stage_timeout(&self) -> Duration {
        self.stage_timeout
    }

    /// Interpret the query and return nearby matching places, nearest first
    ///
    /// # Errors
    /// A [`LocusError::Stage`] naming the failing stage and wrapping the
    /// collaborator's error (`IntentParse`, `IntentIncomplete`, `Provider`,
    /// `Timeout` or `NoResults`). No partial result is ever returned.
    pub async fn find_places(&self, query: &str, user_location: Coordinate) -> Result<SearchResult> {
        info!("Finding places for '{}' at {}", query, user_location);

        let context = match tokio::time::timeout(
            self.stage_timeout,
            self.resolver.resolve_context(user_location),
        )
        .await
        {
            Ok(context) => context,
            Err(_) => {
                warn!(
                    "{} timed out after {:?}; continuing without a locality",
                    PipelineStage::ContextResolution,
                    self.stage_timeout
                );
                String::new()
            }
        };

        let intent = self
            .run_stage(
                PipelineStage::IntentExtraction,
                self.extractor.extract_intent(query, &context),
            )
            .await?;

        let phrase = normalize_search_phrase(&intent.search_phrase, &context);
        info!(
            "Interpreted '{}' as '{}' ({})",
            query,
            phrase,
            intent.category.label()
        );

        let places = self
            .run_stage(
                PipelineStage::PlaceSearch,
                self.search.search_places(&phrase, user_location),
            )
            .await?;

        Ok(SearchResult {
            search_phrase_used: phrase,
            category: intent.category,
            description: intent.description,
            places,
        })
    }

    async fn run_stage<T, F>(&self, stage: PipelineStage, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let outcome = match tokio::time::timeout(self.stage_timeout, work).await {
            Ok(outcome) => outcome,
            Err(_) => Err(LocusError::provider(format!(
                "timed out after {:?}",
                self.stage_timeout
            ))),
        };

        outcome.map_err(|e| {
            warn!("{} failed: {}", stage, e);
            LocusError::at_stage(stage, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{north_of, place_candidate, FakeChatModel, FakeGeocoder, FakePlaceSearch};
    use crate::types::PlaceCategory;

    const SAN_FRANCISCO: Coordinate = Coordinate::new(37.7749, -122.4194);

    fn finder(
        geocoder: Arc<FakeGeocoder>,
        model: Arc<FakeChatModel>,
        places: Arc<FakePlaceSearch>,
    ) -> PlaceFinder {
        PlaceFinder::from_config(geocoder, model, places, &LocusConfig::default())
    }

    #[test]
    fn test_normalize_appends_locality() {
        assert_eq!(
            normalize_search_phrase("good pizza", "Springfield"),
            "good pizza near Springfield"
        );
    }

    #[test]
    fn test_normalize_keeps_explicit_location() {
        assert_eq!(
            normalize_search_phrase("pizza near the park", "Springfield"),
            "pizza near the park"
        );
        assert_eq!(
            normalize_search_phrase("Bagels in Brooklyn", "Springfield"),
            "Bagels in Brooklyn"
        );
        assert_eq!(
            normalize_search_phrase("Coffee NEAR me", "Springfield"),
            "Coffee NEAR me"
        );
    }

    #[test]
    fn test_normalize_skips_blank_context() {
        assert_eq!(normalize_search_phrase("good pizza", ""), "good pizza");
        assert_eq!(normalize_search_phrase("good pizza", "  "), "good pizza");
    }

    #[tokio::test]
    async fn test_tacos_end_to_end() {
        let geocoder = Arc::new(FakeGeocoder::locality("San Francisco"));
        let model = Arc::new(FakeChatModel::intent("tacos", "Restaurant/Cafe", "Taco places"));
        let places = Arc::new(FakePlaceSearch::returning(vec![
            place_candidate("Taqueria Far", north_of(SAN_FRANCISCO, 1.2)),
            place_candidate("Taqueria Near", north_of(SAN_FRANCISCO, 0.3)),
        ]));

        let result = finder(geocoder.clone(), model.clone(), places.clone())
            .find_places("tacos", SAN_FRANCISCO)
            .await
            .unwrap();

        assert_eq!(result.search_phrase_used, "tacos near San Francisco");
        assert_eq!(result.category, PlaceCategory::RestaurantCafe);
        assert_eq!(result.description, "Taco places");
        assert_eq!(result.places.len(), 2);
        assert_eq!(result.places[0].name, "Taqueria Near");
        assert!((result.places[0].distance_km - 0.3).abs() < 1e-6);
        assert!((result.places[1].distance_km - 1.2).abs() < 1e-6);

        assert_eq!(geocoder.calls(), vec![SAN_FRANCISCO]);
        assert!(model.prompts()[0].user.contains("San Francisco"));
        let requests = places.requests();
        assert_eq!(requests[0].query, "tacos near San Francisco");
        assert_eq!(requests[0].radius_m, 5_000);
        assert_eq!(requests[0].origin, SAN_FRANCISCO);
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_results() {
        let finder = finder(
            Arc::new(FakeGeocoder::locality("Springfield")),
            Arc::new(FakeChatModel::intent("good pizza", "Restaurant/Cafe", "Pizza")),
            Arc::new(FakePlaceSearch::returning(vec![
                place_candidate("A", north_of(SAN_FRANCISCO, 2.0)),
                place_candidate("B", north_of(SAN_FRANCISCO, 0.5)),
            ])),
        );

        let first = finder.find_places("pizza", SAN_FRANCISCO).await.unwrap();
        let second = finder.find_places("pizza", SAN_FRANCISCO).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.search_phrase_used, "good pizza near Springfield");
    }

    #[tokio::test]
    async fn test_context_failure_is_absorbed() {
        let places = Arc::new(FakePlaceSearch::returning(vec![place_candidate(
            "Corner Cafe",
            SAN_FRANCISCO,
        )]));
        let result = finder(
            Arc::new(FakeGeocoder::failing("REQUEST_DENIED")),
            Arc::new(FakeChatModel::intent("coffee", "Restaurant/Cafe", "Coffee")),
            places.clone(),
        )
        .find_places("coffee", SAN_FRANCISCO)
        .await
        .unwrap();

        assert_eq!(result.search_phrase_used, "coffee");
        assert_eq!(places.requests()[0].query, "coffee");
    }

    #[tokio::test]
    async fn test_incomplete_intent_is_tagged() {
        let places = Arc::new(FakePlaceSearch::empty());
        let err = finder(
            Arc::new(FakeGeocoder::locality("Springfield")),
            Arc::new(FakeChatModel::replying(r#"{"type":"Restaurant/Cafe"}"#)),
            places.clone(),
        )
        .find_places("food", SAN_FRANCISCO)
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::IntentExtraction));
        assert!(matches!(err.root_cause(), LocusError::IntentIncomplete(_)));
        assert!(places.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_results_is_tagged() {
        let err = finder(
            Arc::new(FakeGeocoder::locality("Springfield")),
            Arc::new(FakeChatModel::intent("unicorn stable", "Other", "")),
            Arc::new(FakePlaceSearch::empty()),
        )
        .find_places("unicorns", SAN_FRANCISCO)
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::PlaceSearch));
        assert!(matches!(err.root_cause(), LocusError::NoResults(_)));
    }

    #[tokio::test]
    async fn test_search_provider_failure_is_tagged() {
        let err = finder(
            Arc::new(FakeGeocoder::locality("Springfield")),
            Arc::new(FakeChatModel::intent("pizza", "Restaurant/Cafe", "")),
            Arc::new(FakePlaceSearch::failing("OVER_QUERY_LIMIT")),
        )
        .find_places("pizza", SAN_FRANCISCO)
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::PlaceSearch));
        assert!(matches!(err.root_cause(), LocusError::Provider(_)));
    }

    #[tokio::test]
    async fn test_slow_geocoder_degrades_to_empty_context() {
        let result = finder(
            Arc::new(FakeGeocoder::locality("Springfield").with_delay(Duration::from_millis(500))),
            Arc::new(FakeChatModel::intent("pizza", "Restaurant/Cafe", "")),
            Arc::new(FakePlaceSearch::returning(vec![place_candidate(
                "Slice",
                SAN_FRANCISCO,
            )])),
        )
        .with_stage_timeout(Duration::from_millis(50))
        .find_places("pizza", SAN_FRANCISCO)
        .await
        .unwrap();

        assert_eq!(result.search_phrase_used, "pizza");
    }

    #[tokio::test]
    async fn test_slow_model_times_out_as_provider_error() {
        let places = Arc::new(FakePlaceSearch::empty());
        let err = finder(
            Arc::new(FakeGeocoder::locality("Springfield")),
            Arc::new(
                FakeChatModel::intent("pizza", "Restaurant/Cafe", "")
                    .with_delay(Duration::from_millis(500)),
            ),
            places.clone(),
        )
        .with_stage_timeout(Duration::from_millis(50))
        .find_places("pizza", SAN_FRANCISCO)
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::IntentExtraction));
        assert!(matches!(err.root_cause(), LocusError::Provider(_)));
        assert!(err.to_string().contains("timed out"));
        assert!(places.requests().is_empty());
    }
}
