//! The authoritative ordered report collection.
//!
//! Persisted as one JSON array under the `reports` key. `add` and
//! `remove` persist the whole collection; `update_status` deliberately
//! does not — the caller decides when the toggle becomes durable and
//! calls [`ReportStore::persist`].

use std::sync::Arc;

use incident_map_report_models::{Report, ReportStatus};

use crate::StorageError;
use crate::kv::KvStore;

const REPORTS_KEY: &str = "reports";

/// Owns the canonical ordered report collection.
pub struct ReportStore {
    store: Arc<dyn KvStore>,
    reports: Vec<Report>,
}

impl ReportStore {
    /// Loads the collection from the key-value store. An absent or empty
    /// `reports` key initializes an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Deserialization`] if the persisted blob is
    /// malformed.
    pub fn load(store: Arc<dyn KvStore>) -> Result<Self, StorageError> {
        let reports = match store.get(REPORTS_KEY) {
            None => Vec::new(),
            Some(json) if json.trim().is_empty() => Vec::new(),
            Some(json) => serde_json::from_str(&json)?,
        };

        Ok(Self { store, reports })
    }

    /// Loads the collection, falling back to empty on a malformed blob
    /// instead of failing.
    #[must_use]
    pub fn load_or_default(store: Arc<dyn KvStore>) -> Self {
        match Self::load(Arc::clone(&store)) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("persisted reports are corrupt, starting empty: {e}");
                Self {
                    store,
                    reports: Vec::new(),
                }
            }
        }
    }

    /// Appends a report and persists the whole collection. Returns the
    /// stored report.
    pub fn add(&mut self, report: Report) -> &Report {
        let index = self.reports.len();
        self.reports.push(report);
        self.persist();
        &self.reports[index]
    }

    /// Splices out the report at `index` and persists. The password gate
    /// is the caller's responsibility; the store does not re-check.
    ///
    /// Returns the removed report, or `None` when `index` is out of
    /// bounds (nothing is persisted in that case).
    pub fn remove(&mut self, index: usize) -> Option<Report> {
        if index >= self.reports.len() {
            return None;
        }
        let removed = self.reports.remove(index);
        self.persist();
        Some(removed)
    }

    /// Mutates the status of the report at `index` in place.
    ///
    /// Does NOT persist. Call [`Self::persist`] if the toggle must
    /// survive the session.
    pub fn update_status(&mut self, index: usize, status: ReportStatus) -> bool {
        match self.reports.get_mut(index) {
            Some(report) => {
                report.status = status;
                true
            }
            None => false,
        }
    }

    /// Re-serializes and writes the full collection.
    pub fn persist(&self) {
        match serde_json::to_string(&self.reports) {
            Ok(json) => self.store.set(REPORTS_KEY, &json),
            Err(e) => log::error!("failed to serialize reports: {e}"),
        }
    }

    /// The full ordered collection.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// The report at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Report> {
        self.reports.get(index)
    }

    /// Number of reports in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
