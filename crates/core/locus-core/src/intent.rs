//! Intent extraction
//!
//! Sends the user's query to a chat model and turns the reply into a
//! [`SearchIntent`]. The reply is free text that should contain one JSON object.
//! The first object is decoded and any text after it is ignored:
//!
//! ```text
//! {"searchQuery": "tacos", "type": "Restaurant/Cafe", "description": "Taco places"}
//! ```
//!
//! [`parse_intent`] is the single parse-or-fail boundary: it either yields a
//! complete intent or a tagged [`LocusError::IntentParse`] /
//! [`LocusError::IntentIncomplete`]. It never guesses a missing phrase.

use crate::providers::ChatModel;
use crate::types::{ChatPrompt, PlaceCategory, SearchIntent};
use crate::{LocusError, Result};
use serde_json::{Deserializer, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Field holding the phrase to search for
pub const SEARCH_QUERY_FIELD: &str = "searchQuery";

/// Field holding the category label
pub const TYPE_FIELD: &str = "type";

/// Field holding the human-readable description
pub const DESCRIPTION_FIELD: &str = "description";

/// Instruction sent as the system message
pub fn system_instruction() -> String {
    let categories = PlaceCategory::ALL
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You turn natural-language requests for nearby places into search parameters \
         for a place search service.\n\
         Respond with a single JSON object and nothing else, using exactly these fields:\n\
         - \"{SEARCH_QUERY_FIELD}\": a short search phrase describing what to look for\n\
         - \"{TYPE_FIELD}\": one of {categories}\n\
         - \"{DESCRIPTION_FIELD}\": one sentence describing what the user wants\n\
         Use \"Other\" when no category fits."
    )
}

/// User message pairing the query with the user's locality
pub fn user_message(query: &str, location_context: &str) -> String {
    if location_context.trim().is_empty() {
        format!("Query: {query}\nThe user's current location is unknown.")
    } else {
        format!("Query: {query}\nThe user is currently in {location_context}.")
    }
}

/// Parse a model reply into a search intent
pub fn parse_intent(reply: &str) -> Result<SearchIntent> {
    let start = reply
        .find('{')
        .ok_or_else(|| LocusError::intent_parse("model reply contains no JSON object"))?;

    // Decode one value from the first brace; whatever follows it is prose
    let value: Value = Deserializer::from_str(&reply[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| LocusError::intent_parse("model reply contains no JSON object"))?
        .map_err(|e| LocusError::intent_parse(format!("model reply is not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| LocusError::intent_parse("model reply JSON is not an object"))?;

    let search_phrase = object
        .get(SEARCH_QUERY_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            LocusError::intent_incomplete(format!("'{SEARCH_QUERY_FIELD}' is missing or empty"))
        })?
        .to_string();

    let category = object
        .get(TYPE_FIELD)
        .and_then(Value::as_str)
        .map(PlaceCategory::from_label)
        .unwrap_or_default();

    let description = object
        .get(DESCRIPTION_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(SearchIntent {
        search_phrase,
        category,
        description,
    })
}

/// Extracts a structured search intent from a free-text query
pub struct IntentExtractor {
    model: Arc<dyn ChatModel>,
}

impl IntentExtractor {
    /// Create an extractor over a chat model
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Ask the model to interpret the query; the phrase is returned exactly as the model wrote it
    pub async fn extract_intent(&self, query: &str, location_context: &str) -> Result<SearchIntent> {
        let prompt = ChatPrompt {
            system: system_instruction(),
            user: user_message(query, location_context),
        };

        let reply = self.model.complete(prompt).await?;
        debug!("Model reply: {} chars", reply.len());

        parse_intent(&reply).map_err(|e| {
            warn!("Could not interpret model reply for query '{}': {}", query, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockChatModel;

    #[test]
    fn test_parses_bare_object() {
        let intent = parse_intent(
            r#"{"searchQuery":"tacos","type":"Restaurant/Cafe","description":"Taco places"}"#,
        )
        .unwrap();
        assert_eq!(intent.search_phrase, "tacos");
        assert_eq!(intent.category, PlaceCategory::RestaurantCafe);
        assert_eq!(intent.description, "Taco places");
    }

    #[test]
    fn test_tolerates_surrounding_prose() {
        let reply = "Sure! Here is what I found:\n```json\n{\n  \"searchQuery\": \"quiet park\",\n  \"type\": \"Outdoor/Park\",\n  \"description\": \"A calm green space\"\n}\n```\nEnjoy!";
        let intent = parse_intent(reply).unwrap();
        assert_eq!(intent.search_phrase, "quiet park");
        assert_eq!(intent.category, PlaceCategory::OutdoorPark);
    }

    #[test]
    fn test_ignores_braces_after_the_object() {
        let reply = r#"{"searchQuery":"tacos","type":"Restaurant/Cafe","description":"Taco places"} Note: I used {type} as the category."#;
        let intent = parse_intent(reply).unwrap();
        assert_eq!(intent.search_phrase, "tacos");
        assert_eq!(intent.category, PlaceCategory::RestaurantCafe);
    }

    #[test]
    fn test_first_of_two_objects_wins() {
        let reply = "{\"searchQuery\":\"ramen\",\"type\":\"Restaurant/Cafe\"}\n{\"searchQuery\":\"sushi\",\"type\":\"Restaurant/Cafe\"}";
        let intent = parse_intent(reply).unwrap();
        assert_eq!(intent.search_phrase, "ramen");
    }

    #[test]
    fn test_missing_search_query_is_incomplete() {
        let err = parse_intent(r#"{"type":"Restaurant/Cafe"}"#).unwrap_err();
        assert!(matches!(err, LocusError::IntentIncomplete(_)), "got {err:?}");
    }

    #[test]
    fn test_blank_search_query_is_incomplete() {
        let err = parse_intent(r#"{"searchQuery":"   ","type":"Shopping"}"#).unwrap_err();
        assert!(matches!(err, LocusError::IntentIncomplete(_)));
    }

    #[test]
    fn test_non_string_search_query_is_incomplete() {
        let err = parse_intent(r#"{"searchQuery":42}"#).unwrap_err();
        assert!(matches!(err, LocusError::IntentIncomplete(_)));
    }

    #[test]
    fn test_no_object_is_parse_error() {
        let err = parse_intent("I could not understand that request.").unwrap_err();
        assert!(matches!(err, LocusError::IntentParse(_)));
    }

    #[test]
    fn test_malformed_object_is_parse_error() {
        let err = parse_intent(r#"{"searchQuery": "pizza", "type": }"#).unwrap_err();
        assert!(matches!(err, LocusError::IntentParse(_)));
    }

    #[test]
    fn test_unknown_category_and_missing_description() {
        let intent = parse_intent(r#"{"searchQuery":"rocket launch","type":"Space"}"#).unwrap();
        assert_eq!(intent.category, PlaceCategory::Other);
        assert_eq!(intent.description, "");
    }

    #[test]
    fn test_phrase_is_kept_verbatim() {
        let intent = parse_intent(r#"{"searchQuery":"Pizza in Brooklyn"}"#).unwrap();
        assert_eq!(intent.search_phrase, "Pizza in Brooklyn");
    }

    #[test]
    fn test_system_instruction_lists_every_category() {
        let instruction = system_instruction();
        for category in PlaceCategory::ALL {
            assert!(instruction.contains(category.label()));
        }
        assert!(instruction.contains(SEARCH_QUERY_FIELD));
    }

    #[test]
    fn test_user_message_mentions_locality() {
        assert!(user_message("tacos", "San Francisco").contains("currently in San Francisco"));
        assert!(user_message("tacos", "").contains("unknown"));
    }

    #[tokio::test]
    async fn test_extract_sends_query_and_context() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|p| p.user.contains("tacos") && p.user.contains("San Francisco"))
            .times(1)
            .returning(|_| {
                Ok(r#"{"searchQuery":"tacos","type":"Restaurant/Cafe","description":"Taco places"}"#
                    .to_string())
            });

        let extractor = IntentExtractor::new(Arc::new(model));
        let intent = extractor
            .extract_intent("tacos", "San Francisco")
            .await
            .unwrap();
        assert_eq!(intent.search_phrase, "tacos");
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Err(LocusError::provider("status 503")));

        let extractor = IntentExtractor::new(Arc::new(model));
        let err = extractor.extract_intent("tacos", "").await.unwrap_err();
        assert!(matches!(err, LocusError::Provider(_)));
    }
}
