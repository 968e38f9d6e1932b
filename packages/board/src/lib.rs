#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident board core.
//!
//! Keeps the three overlapping views of the report collection in sync:
//! the persisted list ([`incident_map_storage::reports::ReportStore`]),
//! the map-visible subset ([`viewport::ViewportTracker`]), and the
//! sorted list ([`sort`]). The [`lifecycle::BoardController`]
//! orchestrates creation, viewing, status toggling, and deletion over
//! them.

pub mod lifecycle;
pub mod sort;
pub mod validate;
pub mod viewport;

use incident_map_geocoder::GeocodeError;
use thiserror::Error;

/// Errors surfaced to the initiating user action. Nothing here is
/// retried automatically.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A required form field is missing or malformed. Blocks submission;
    /// nothing is mutated.
    #[error("{field}: {message}")]
    Validation {
        /// Which form field failed.
        field: &'static str,
        /// User-facing description of the problem.
        message: String,
    },

    /// The location text could not be resolved to a coordinate. The form
    /// stays open for correction.
    #[error("Location '{query}' is invalid!")]
    InvalidLocation {
        /// The location text as entered.
        query: String,
        /// The underlying geocode failure.
        #[source]
        source: GeocodeError,
    },

    /// Wrong password for a gated operation. Nothing is mutated.
    #[error("Incorrect password!")]
    Auth,

    /// No report exists at the given index.
    #[error("no report at index {0}")]
    UnknownReport(usize),
}
