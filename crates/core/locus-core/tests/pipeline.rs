//! Pipeline behavior through the public API

use locus_core::testing::{north_of, place_candidate, FakeChatModel, FakeGeocoder, FakePlaceSearch};
use locus_core::{Coordinate, LocusConfig, LocusError, PipelineStage, PlaceFinder};
use std::sync::Arc;

const ORIGIN: Coordinate = Coordinate::new(40.7128, -74.0060);

fn config_with_radius(radius_m: u32) -> LocusConfig {
    let mut config = LocusConfig::default();
    config.places.radius_m = radius_m;
    config
}

#[tokio::test]
async fn result_serializes_in_camel_case() {
    let finder = PlaceFinder::from_config(
        Arc::new(FakeGeocoder::locality("New York")),
        Arc::new(FakeChatModel::intent("bagels", "Restaurant/Cafe", "Fresh bagels")),
        Arc::new(FakePlaceSearch::returning(vec![
            place_candidate("Bagel Two", north_of(ORIGIN, 1.5)),
            place_candidate("Bagel One", north_of(ORIGIN, 0.25)),
        ])),
        &LocusConfig::default(),
    );

    let result = finder.find_places("bagels", ORIGIN).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["searchPhraseUsed"], "bagels near New York");
    assert_eq!(json["category"], "Restaurant/Cafe");
    assert_eq!(json["description"], "Fresh bagels");
    assert_eq!(json["places"][0]["name"], "Bagel One");
    assert_eq!(json["places"][0]["distanceLabel"], "250 m");
    assert_eq!(json["places"][1]["distanceLabel"], "1.5 km");
    assert_eq!(json["places"][0]["externalId"], "place-bagel-one");
}

#[tokio::test]
async fn configured_radius_reaches_the_provider() {
    let places = Arc::new(FakePlaceSearch::returning(vec![place_candidate(
        "Deli", ORIGIN,
    )]));
    let finder = PlaceFinder::from_config(
        Arc::new(FakeGeocoder::empty()),
        Arc::new(FakeChatModel::intent("deli in Queens", "Restaurant/Cafe", "")),
        places.clone(),
        &config_with_radius(1_500),
    );

    let result = finder.find_places("a deli", ORIGIN).await.unwrap();
    assert_eq!(result.search_phrase_used, "deli in Queens");
    assert_eq!(places.requests()[0].radius_m, 1_500);
}

#[tokio::test]
async fn unparseable_reply_stops_before_search() {
    let places = Arc::new(FakePlaceSearch::empty());
    let finder = PlaceFinder::from_config(
        Arc::new(FakeGeocoder::locality("New York")),
        Arc::new(FakeChatModel::replying("Sorry, I can't help with that.")),
        places.clone(),
        &LocusConfig::default(),
    );

    let err = finder.find_places("???", ORIGIN).await.unwrap_err();
    assert_eq!(err.stage(), Some(PipelineStage::IntentExtraction));
    assert!(matches!(err.root_cause(), LocusError::IntentParse(_)));
    assert!(places.requests().is_empty());
}
