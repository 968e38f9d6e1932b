//! Report lifecycle orchestration.
//!
//! The controller owns the report store, the viewport tracker, and the
//! geocoder, and keeps them consistent through creation, viewing,
//! status toggling, and deletion. All password-gated operations check
//! the shared secret at transition time, never at creation.

use std::sync::Arc;

use chrono::Utc;
use incident_map_geocoder::Geocoder;
use incident_map_report_models::{LatLng, Report, ReportStatus};
use incident_map_storage::kv::KvStore;
use incident_map_storage::password::is_correct_password;
use incident_map_storage::reports::ReportStore;

use crate::BoardError;
use crate::sort::{self, SortDirection};
use crate::validate::{ReportForm, validate};
use crate::viewport::{Bounds, ViewportTracker};

/// Where the add flow currently stands.
///
/// `Composing -> Resolving -> Idle` on success; a bad location lands in
/// `Invalid` and the form stays open for the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    /// No add flow in progress.
    #[default]
    Idle,
    /// The add form is open.
    Composing,
    /// A location lookup is in flight.
    Resolving,
    /// The entered location could not be resolved.
    Invalid,
}

/// Orchestrates the report collection, its map-visible subset, and the
/// geocoder.
pub struct BoardController {
    kv: Arc<dyn KvStore>,
    store: ReportStore,
    tracker: ViewportTracker,
    geocoder: Geocoder,
    state: FormState,
}

impl BoardController {
    /// Loads the persisted collection (malformed data starts empty with
    /// a warning) and, when it is non-empty, designates the first report
    /// as the one-time recenter target, matching the original startup
    /// behavior.
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>, geocoder: Geocoder) -> Self {
        let store = ReportStore::load_or_default(Arc::clone(&kv));
        let mut tracker = ViewportTracker::new();

        if let Some(first) = store.get(0) {
            tracker.designate(first.clone());
        }

        Self {
            kv,
            store,
            tracker,
            geocoder,
            state: FormState::Idle,
        }
    }

    /// The full persisted collection.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        self.store.reports()
    }

    /// The map-visible subset.
    #[must_use]
    pub fn visible(&self) -> &[Report] {
        self.tracker.visible()
    }

    /// Current add-flow state.
    #[must_use]
    pub const fn form_state(&self) -> FormState {
        self.state
    }

    /// Recomputes viewport membership for new bounds (pan/zoom).
    pub fn apply_bounds(&mut self, bounds: Bounds) {
        self.tracker.apply(bounds, self.store.reports());
    }

    /// Consumes the one-time recenter designation, if any: the visible
    /// set collapses to that report and its location is returned as the
    /// pan target.
    pub fn recenter(&mut self) -> Option<LatLng> {
        self.tracker.consume()
    }

    /// Sorts the visible subset by a column named in free text,
    /// returning the direction for the next invocation. Unknown columns
    /// are a no-op.
    pub fn sort_visible(&mut self, column: &str, direction: SortDirection) -> SortDirection {
        sort::sort_by_name(
            self.tracker.visible_mut(),
            column,
            direction,
            self.kv.as_ref(),
        )
    }

    /// Creates a report from the add form.
    ///
    /// Validates the fields, resolves the location (strict `"lat, lng"`
    /// text parses directly, anything else goes through the geocoder),
    /// appends to the store (which persists), and designates the new
    /// report as the one-time recenter target.
    ///
    /// # Errors
    ///
    /// [`BoardError::Validation`] for missing or malformed fields and
    /// [`BoardError::InvalidLocation`] when resolution fails; neither
    /// mutates any state.
    pub async fn submit(&mut self, form: ReportForm) -> Result<Report, BoardError> {
        self.state = FormState::Composing;
        validate(&form)?;

        self.state = FormState::Resolving;
        let query = form.location.trim();
        let location = match self.geocoder.resolve_coord(query).await {
            Ok(location) => location,
            Err(source) => {
                self.state = FormState::Invalid;
                return Err(BoardError::InvalidLocation {
                    query: query.to_string(),
                    source,
                });
            }
        };

        let report = Report {
            report_type: form.report_type.trim().to_string(),
            location: Some(location),
            reporter_name: form.reporter_name.trim().to_string(),
            reporter_phone: form.reporter_phone.trim().to_string(),
            time: Utc::now().timestamp_millis(),
            status: ReportStatus::Open,
            comment: non_empty(&form.comment),
            image: non_empty(&form.image),
        };

        let stored = self.store.add(report).clone();
        log::info!(
            "added {} report at {}",
            stored.report_type,
            location
        );

        self.tracker.designate(stored.clone());
        self.tracker.insert(&stored);

        self.state = FormState::Idle;
        Ok(stored)
    }

    /// Flips the status of the report at `index` behind the password
    /// gate and persists the full collection.
    ///
    /// # Errors
    ///
    /// [`BoardError::Auth`] on a wrong password and
    /// [`BoardError::UnknownReport`] for a bad index; no state changes
    /// in either case.
    pub fn toggle_status(
        &mut self,
        index: usize,
        entered_password: &str,
    ) -> Result<ReportStatus, BoardError> {
        if !is_correct_password(self.kv.as_ref(), entered_password) {
            return Err(BoardError::Auth);
        }

        let report = self
            .store
            .get(index)
            .ok_or(BoardError::UnknownReport(index))?
            .clone();
        let next = report.status.toggled();

        self.store.update_status(index, next);
        self.store.persist();
        self.tracker.sync_status(&report, next);

        Ok(next)
    }

    /// Deletes the report at `index` behind the password gate, removing
    /// it from both the store (which persists) and the visible set
    /// within the same action.
    ///
    /// # Errors
    ///
    /// [`BoardError::Auth`] on a wrong password and
    /// [`BoardError::UnknownReport`] for a bad index; no state changes
    /// in either case.
    pub fn delete(&mut self, index: usize, entered_password: &str) -> Result<Report, BoardError> {
        if !is_correct_password(self.kv.as_ref(), entered_password) {
            return Err(BoardError::Auth);
        }

        let removed = self
            .store
            .remove(index)
            .ok_or(BoardError::UnknownReport(index))?;
        self.tracker.remove_by_location(&removed);

        Ok(removed)
    }

    /// The place name for a report's location, falling back to the raw
    /// `"lat, lng"` text when the lookup fails. Never an error: the
    /// fallback absorbs any [`incident_map_geocoder::GeocodeError`].
    pub async fn display_location(&self, report: &Report) -> String {
        let Some(location) = report.location else {
            return "-".to_string();
        };

        match self.geocoder.resolve_name(location).await {
            Ok(name) => name,
            Err(e) => {
                log::debug!("reverse geocode failed for {location}: {e}");
                location.to_string()
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
