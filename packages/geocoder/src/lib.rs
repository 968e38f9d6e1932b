#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Memoizing bidirectional geocoder.
//!
//! Translates between coordinates and place names using a
//! Nominatim-style HTTP service, consulting a persistent key-value
//! cache before any network I/O. Cache entries are write-once: the
//! first resolution for a key wins, with no TTL and no invalidation.
//!
//! There is no retry and no request coalescing — two concurrent
//! identical lookups may both hit the network, which is acceptable
//! because the cache is per-process and writes are idempotent.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::sync::Arc;
use std::time::Duration;

use incident_map_report_models::LatLng;
use incident_map_storage::kv::KvStore;
use regex::Regex;
use thiserror::Error;

/// Public Nominatim instance used when no base URL is injected.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Fixed per-request timeout. No retry on expiry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(9);

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (transport, timeout, or non-2xx status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Cache key for a reverse (coordinate -> name) lookup.
///
/// The sort engine consults this key synchronously when ordering by
/// location, so the format is shared rather than private to the client.
#[must_use]
pub fn reverse_cache_key(location: LatLng) -> String {
    format!("location={}, {}", location.lat, location.lng)
}

/// Cache key for a forward (free text -> coordinate) lookup.
#[must_use]
pub fn forward_cache_key(query: &str) -> String {
    format!("namedLocation={query}")
}

/// Parses a strict `"lat, lng"` string (optional sign, optional
/// decimal) into a coordinate. Anything looser — including trailing
/// garbage — is `None` and goes through name-based geocoding instead.
#[must_use]
pub fn parse_lat_lng(text: &str) -> Option<LatLng> {
    let text = text.trim();
    let pattern =
        Regex::new(r"^[-]?((\d*[.]\d+)|(\d+([.]\d*)?))\s*,\s*[-]?((\d*[.]\d+)|(\d+([.]\d*)?))$")
            .unwrap_or_else(|_| unreachable!());

    if !pattern.is_match(text) {
        return None;
    }

    let (lat_str, lng_str) = text.split_once(',')?;
    let lat = lat_str.trim().parse::<f64>().ok()?;
    let lng = lng_str.trim().parse::<f64>().ok()?;
    Some(LatLng::new(lat, lng))
}

/// Memoizing geocoder client.
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn KvStore>,
}

impl Geocoder {
    /// Creates a geocoder against the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(store: Arc<dyn KvStore>) -> Result<Self, GeocodeError> {
        Self::with_base_url(store, DEFAULT_BASE_URL)
    }

    /// Creates a geocoder against a specific service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        store: Arc<dyn KvStore>,
        base_url: impl Into<String>,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            store,
        })
    }

    /// Resolves a coordinate to a place name.
    ///
    /// Cache hit resolves immediately with zero network I/O. Cache miss
    /// issues exactly one `GET /reverse` request and writes the result
    /// through before returning.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on timeout, non-2xx status, or a body
    /// without a `name` field. Callers fall back to displaying the raw
    /// coordinates.
    pub async fn resolve_name(&self, location: LatLng) -> Result<String, GeocodeError> {
        let key = reverse_cache_key(location);
        if let Some(cached) = self.store.get(&key) {
            return Ok(cached);
        }

        let resp = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lng.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        let name = parse_reverse_response(&body)?;

        self.store.set(&key, &name);
        Ok(name)
    }

    /// Resolves free text to a coordinate.
    ///
    /// A strict `"lat, lng"` numeric string is parsed directly, bypassing
    /// cache and network entirely. Otherwise the cache is consulted, then
    /// exactly one `GET /search` request is issued and the result written
    /// through before returning.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on timeout, non-2xx status, an empty
    /// result array, or a malformed body.
    pub async fn resolve_coord(&self, text: &str) -> Result<LatLng, GeocodeError> {
        if let Some(parsed) = parse_lat_lng(text) {
            return Ok(parsed);
        }

        let key = forward_cache_key(text);
        if let Some(cached) = self.store.get(&key) {
            if let Some(parsed) = parse_lat_lng(&cached) {
                return Ok(parsed);
            }
            log::warn!("ignoring corrupt forward cache entry for {key:?}");
        }

        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", text)])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        let location = parse_search_response(&body)?;

        self.store.set(&key, &location.to_string());
        Ok(location)
    }
}

/// Parses a reverse-geocode response body, expecting a `name` field.
fn parse_reverse_response(body: &serde_json::Value) -> Result<String, GeocodeError> {
    body["name"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| GeocodeError::Parse {
            message: "missing name in reverse geocode response".to_string(),
        })
}

/// Parses a forward-geocode response body: an array whose first element
/// carries `lat`/`lon` fields (strings on Nominatim).
fn parse_search_response(body: &serde_json::Value) -> Result<LatLng, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "search response is not an array".to_string(),
    })?;

    let first = results.first().ok_or_else(|| GeocodeError::Parse {
        message: "no results for search query".to_string(),
    })?;

    let lat = parse_coord_field(&first["lat"]).ok_or_else(|| GeocodeError::Parse {
        message: "missing lat in search response".to_string(),
    })?;
    let lon = parse_coord_field(&first["lon"]).ok_or_else(|| GeocodeError::Parse {
        message: "missing lon in search response".to_string(),
    })?;

    Ok(LatLng::new(lat, lon))
}

fn parse_coord_field(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())
}
