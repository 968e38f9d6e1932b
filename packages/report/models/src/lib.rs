#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core report and coordinate types for the incident map.
//!
//! These types define the persisted shape of a report. The JSON field
//! names (`reporterName`, `type`, ...) match the blob the original web
//! client wrote to browser storage, so existing persisted collections
//! deserialize unchanged.

use chrono::{Local, TimeZone as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate pair.
///
/// Equality is exact `f64` equality on both components. This is the sole
/// de-duplication rule used for viewport membership; near-duplicate
/// coordinates that differ by rounding are distinct on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    /// Renders as `"lat, lng"` — the raw-coordinate fallback shown when a
    /// reverse geocode fails, and the value format of forward cache entries.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Whether a report is still open or has been resolved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ReportStatus {
    /// Report has been filed and not yet handled.
    Open,
    /// Report has been handled.
    Resolved,
}

impl ReportStatus {
    /// Returns the other status. Transitions are only ever Open↔Resolved.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Resolved,
            Self::Resolved => Self::Open,
        }
    }

    /// Style class for rendering this status, derived purely from the
    /// value (green while open, red once resolved).
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Open => "green-colored",
            Self::Resolved => "red-colored",
        }
    }
}

/// A single incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Free-text incident type (e.g. "Flood").
    #[serde(rename = "type")]
    pub report_type: String,
    /// Where the incident happened. Reports created through the add flow
    /// always have a location once creation completes.
    pub location: Option<LatLng>,
    /// Name of the person filing the report.
    pub reporter_name: String,
    /// Phone number of the person filing the report.
    pub reporter_phone: String,
    /// When the report was filed, in milliseconds since the epoch.
    pub time: i64,
    /// Open/resolved state. Always `Open` at creation.
    pub status: ReportStatus,
    /// Optional free-text comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Optional image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Whether two reports are the same location entry.
///
/// Exact coordinate equality, nothing fuzzier. Two reports without a
/// location also compare equal here.
#[must_use]
pub fn same_location(a: &Report, b: &Report) -> bool {
    a.location == b.location
}

/// Formats an epoch-millisecond timestamp as `YYYY-MM-DD (HH:MM:SS)` in
/// local time. Falls back to the raw number if the timestamp is out of
/// range.
#[must_use]
pub fn format_time(ms: i64) -> String {
    Local.timestamp_millis_opt(ms).single().map_or_else(
        || ms.to_string(),
        |dt| dt.format("%Y-%m-%d (%H:%M:%S)").to_string(),
    )
}
