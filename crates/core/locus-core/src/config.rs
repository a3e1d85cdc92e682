//! Configuration management and environment variable loading
//!
//! All settings live in one [`LocusConfig`] that is built once (usually with
//! [`LocusConfig::from_env`]) and handed to each collaborator's constructor.

use crate::places::DEFAULT_SEARCH_RADIUS_M;
use crate::{LocusError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Load environment variables from a .env file
///
/// A missing file is not an error; the process environment is used as-is.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(LocusError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::warn!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(LocusError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(LocusError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocusConfig {
    /// Reverse geocoding provider
    pub geocoding: GeocodingConfig,
    /// Language-model chat provider
    pub chat: ChatConfig,
    /// Place search provider
    pub places: PlaceSearchConfig,
    /// Pipeline behavior
    pub pipeline: PipelineConfig,
    /// HTTP server
    pub server: ServerConfig,
}

/// Default base URL for the Google Maps web services
pub const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Reverse geocoding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// Language-model chat provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
    /// Ask the provider for a JSON-object response format
    pub json_mode: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 256,
            json_mode: true,
        }
    }
}

/// Place search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSearchConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Search radius around the user in meters
    pub radius_m: u32,
}

impl Default for PlaceSearchConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
            api_key: None,
            radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

/// Pipeline behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Time budget for each outbound stage, in seconds
    pub stage_timeout_secs: u64,
}

impl PipelineConfig {
    /// Time budget for each outbound stage
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: 15,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origins ("*" for any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl LocusConfig {
    /// Build configuration from environment variables, falling back to defaults
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `GOOGLE_MAPS_API_KEY` | key for geocoding and places |
    /// | `GOOGLE_GEOCODING_API_KEY` / `GOOGLE_PLACES_API_KEY` | per-service overrides |
    /// | `GOOGLE_MAPS_BASE_URL` | Maps web service base URL |
    /// | `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL` | chat provider |
    /// | `LOCUS_SEARCH_RADIUS_M` | search radius (default 5000) |
    /// | `LOCUS_STAGE_TIMEOUT_SECS` | per-stage timeout (default 15) |
    /// | `LOCUS_HOST`, `LOCUS_PORT`, `LOCUS_CORS_ORIGINS` | HTTP server |
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let maps_key = non_empty_env("GOOGLE_MAPS_API_KEY");
        let maps_base = get_env_or("GOOGLE_MAPS_BASE_URL", GOOGLE_MAPS_BASE_URL);

        config.geocoding.api_key = non_empty_env("GOOGLE_GEOCODING_API_KEY").or(maps_key.clone());
        config.geocoding.base_url = maps_base.clone();

        config.places.api_key = non_empty_env("GOOGLE_PLACES_API_KEY").or(maps_key);
        config.places.base_url = maps_base;
        config.places.radius_m = get_env_int("LOCUS_SEARCH_RADIUS_M", DEFAULT_SEARCH_RADIUS_M);

        config.chat.api_key = non_empty_env("OPENAI_API_KEY");
        config.chat.model = get_env_or("OPENAI_MODEL", &config.chat.model);
        config.chat.base_url = get_env_or("OPENAI_BASE_URL", &config.chat.base_url);
        config.chat.json_mode = get_env_bool("OPENAI_JSON_MODE", config.chat.json_mode);

        config.pipeline.stage_timeout_secs = get_env_int(
            "LOCUS_STAGE_TIMEOUT_SECS",
            config.pipeline.stage_timeout_secs,
        );

        config.server.host = get_env_or("LOCUS_HOST", &config.server.host);
        config.server.port = get_env_int("LOCUS_PORT", config.server.port);
        if let Some(origins) = non_empty_env("LOCUS_CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }

    /// Check that every provider has the credentials and limits it needs
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.geocoding.api_key.is_none() {
            missing.push("GOOGLE_GEOCODING_API_KEY (or GOOGLE_MAPS_API_KEY)");
        }
        if self.places.api_key.is_none() {
            missing.push("GOOGLE_PLACES_API_KEY (or GOOGLE_MAPS_API_KEY)");
        }
        if self.chat.api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        if !missing.is_empty() {
            return Err(LocusError::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        if self.places.radius_m == 0 {
            return Err(LocusError::config("Search radius must be positive"));
        }
        if self.pipeline.stage_timeout_secs == 0 {
            return Err(LocusError::config("Stage timeout must be positive"));
        }
        Ok(())
    }
}
