//! Error types for the Locus pipeline

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Pipeline stage a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reverse geocoding of the user's position
    ContextResolution,
    /// Language-model interpretation of the query
    IntentExtraction,
    /// External place search and ranking
    PlaceSearch,
}

impl PipelineStage {
    /// Stable identifier used in logs and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContextResolution => "context_resolution",
            Self::IntentExtraction => "intent_extraction",
            Self::PlaceSearch => "place_search",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for Locus operations
#[derive(Debug, Error)]
pub enum LocusError {
    /// Model reply did not contain a parseable JSON object
    #[error("Intent parse error: {0}")]
    IntentParse(String),

    /// Model reply parsed but the search phrase was missing or empty
    #[error("Intent incomplete: {0}")]
    IntentIncomplete(String),

    /// External provider failed (network, status, malformed body)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider call succeeded with zero usable results
    #[error("No results: {0}")]
    NoResults(String),

    /// Outbound call exceeded its time budget
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Collaborator failure tagged with the stage that raised it
    #[error("{stage} failed: {source}")]
    Stage {
        /// Stage that failed
        stage: PipelineStage,
        /// Underlying failure
        #[source]
        source: Box<LocusError>,
    },
}

/// Convenient Result type using LocusError
pub type Result<T> = std::result::Result<T, LocusError>;

impl LocusError {
    /// Create an intent parse error
    pub fn intent_parse(msg: impl Into<String>) -> Self {
        LocusError::IntentParse(msg.into())
    }

    /// Create an intent incomplete error
    pub fn intent_incomplete(msg: impl Into<String>) -> Self {
        LocusError::IntentIncomplete(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        LocusError::Provider(msg.into())
    }

    /// Create a no-results error
    pub fn no_results(msg: impl Into<String>) -> Self {
        LocusError::NoResults(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        LocusError::Timeout(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        LocusError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        LocusError::Validation(msg.into())
    }

    /// Tag an error with the stage it came from
    pub fn at_stage(stage: PipelineStage, source: LocusError) -> Self {
        LocusError::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// Stage the error was raised in, if it has been tagged
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            LocusError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The tagged failure underneath any stage wrapping
    pub fn root_cause(&self) -> &LocusError {
        let mut current = self;
        while let LocusError::Stage { source, .. } = current {
            current = source;
        }
        current
    }
}
