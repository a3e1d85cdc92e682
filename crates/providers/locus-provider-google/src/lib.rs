//! Google Maps Platform providers for Locus
//!
//! [`GoogleGeocoder`] implements reverse geocoding against the Geocoding API and
//! [`GooglePlaceSearch`] implements radius-scoped text search against the Places
//! API. Both share one pooled HTTP client.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod geocoding;
pub mod places;

pub use geocoding::GoogleGeocoder;
pub use places::GooglePlaceSearch;

use locus_core::LocusError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Default timeout for a single Maps request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body status for a successful lookup
const STATUS_OK: &str = "OK";

/// Body status for a successful lookup that matched nothing
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Get or initialize the shared HTTP client
fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(20)
                .pool_idle_timeout(Duration::from_secs(300))
                .tcp_keepalive(Duration::from_secs(60))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default()
        })
        .clone()
}

fn transport_error(service: &str, e: reqwest::Error) -> LocusError {
    if e.is_timeout() {
        LocusError::timeout(format!("{service} request timed out"))
    } else {
        LocusError::provider(format!("{service} request failed: {e}"))
    }
}

/// Build `{base_url}/{path}` with URL-encoded query parameters
fn endpoint(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, LocusError> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse_with_params(&raw, params)
        .map_err(|e| LocusError::config(format!("invalid Maps API URL '{raw}': {e}")))
}

/// GET a Maps endpoint and decode its JSON body
async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    timeout: Duration,
    service: &str,
) -> Result<T, LocusError> {
    let resp = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport_error(service, e))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let error_text = resp.text().await.unwrap_or_default();
        return Err(LocusError::provider(format!(
            "{service} error ({status}): {error_text}"
        )));
    }

    resp.json::<T>()
        .await
        .map_err(|e| LocusError::provider(format!("{service} returned a malformed body: {e}")))
}

/// Interpret the `status` field every Maps web service response carries
///
/// Returns `false` for `ZERO_RESULTS` so callers can answer with an empty list.
fn check_status(service: &str, status: &str, error_message: Option<&str>) -> Result<bool, LocusError> {
    match status {
        STATUS_OK => Ok(true),
        STATUS_ZERO_RESULTS => Ok(false),
        other => Err(LocusError::provider(match error_message {
            Some(message) => format!("{service} returned {other}: {message}"),
            None => format!("{service} returned {other}"),
        })),
    }
}
