#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Persistence layer for the incident map.
//!
//! Everything durable goes through the [`kv::KvStore`] abstraction, the
//! stand-in for the browser storage the original web client used. On top
//! of it sit the authoritative report collection ([`reports::ReportStore`])
//! and the shared-password gate ([`password`]).

pub mod kv;
pub mod password;
pub mod reports;

use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The persisted report collection could not be deserialized.
    #[error("failed to deserialize persisted reports: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
