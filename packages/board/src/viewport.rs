//! Map-visible subset of the report collection.
//!
//! Recomputed as an incremental diff on every pan/zoom rather than a
//! rebuild, so insertion order survives viewport changes and is only
//! ever reordered by the sort engine.

use incident_map_report_models::{LatLng, Report, ReportStatus, same_location};

/// Axis-aligned viewport bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Southern latitude edge.
    pub south: f64,
    /// Western longitude edge.
    pub west: f64,
    /// Northern latitude edge.
    pub north: f64,
    /// Eastern longitude edge.
    pub east: f64,
}

impl Bounds {
    /// Creates bounds from the four edges.
    #[must_use]
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Point-in-bounds test, edges inclusive.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }
}

/// Tracks which reports fall inside the current viewport.
///
/// Membership is keyed by exact coordinate equality: two reports at the
/// same coordinates are one visible entry.
#[derive(Default)]
pub struct ViewportTracker {
    visible: Vec<Report>,
    one_time: Option<Report>,
}

impl ViewportTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible subset, in insertion order unless sorted.
    #[must_use]
    pub fn visible(&self) -> &[Report] {
        &self.visible
    }

    /// Mutable access for the sort engine.
    pub fn visible_mut(&mut self) -> &mut [Report] {
        &mut self.visible
    }

    /// Diffs the full collection against new viewport bounds.
    ///
    /// For each report: inside the bounds and not yet present (by
    /// coordinate) appends it; outside and present removes it. Reports
    /// without a location are never visible.
    pub fn apply(&mut self, bounds: Bounds, reports: &[Report]) {
        for report in reports {
            let Some(location) = report.location else {
                continue;
            };
            let present = self.visible.iter().position(|v| same_location(v, report));

            if bounds.contains(location) {
                if present.is_none() {
                    self.visible.push(report.clone());
                }
            } else if let Some(index) = present {
                self.visible.remove(index);
            }
        }
    }

    /// Adds a report to the visible set unless an entry with the same
    /// coordinates is already there.
    pub fn insert(&mut self, report: &Report) {
        if !self.visible.iter().any(|v| same_location(v, report)) {
            self.visible.push(report.clone());
        }
    }

    /// Removes the visible entry matching `report` by coordinate
    /// equality. Returns whether anything was removed.
    pub fn remove_by_location(&mut self, report: &Report) -> bool {
        match self.visible.iter().position(|v| same_location(v, report)) {
            Some(index) => {
                self.visible.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copies `status` onto the visible entry matching `report` by
    /// coordinate, keeping the table view in step with a toggle.
    pub fn sync_status(&mut self, report: &Report, status: ReportStatus) {
        if let Some(entry) = self.visible.iter_mut().find(|v| same_location(v, report)) {
            entry.status = status;
        }
    }

    /// Designates a report as the single-use recenter signal.
    pub fn designate(&mut self, report: Report) {
        self.one_time = Some(report);
    }

    /// Consumes the one-time designation, if any: resets the visible set
    /// to exactly that report and returns its location as the pan
    /// target. Subsequent calls return `None` until a new designation.
    pub fn consume(&mut self) -> Option<LatLng> {
        let report = self.one_time.take()?;
        let location = report.location?;
        self.visible = vec![report];
        Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_at(lat: f64, lng: f64) -> Report {
        Report {
            report_type: "Flood".to_string(),
            location: Some(LatLng::new(lat, lng)),
            reporter_name: "Jane".to_string(),
            reporter_phone: "604-555-1234".to_string(),
            time: 1_700_000_000_000,
            status: ReportStatus::Open,
            comment: None,
            image: None,
        }
    }

    #[test]
    fn bounds_contain_edges() {
        let bounds = Bounds::new(49.0, -124.0, 50.0, -122.0);
        assert!(bounds.contains(LatLng::new(49.0, -124.0)));
        assert!(bounds.contains(LatLng::new(50.0, -122.0)));
        assert!(!bounds.contains(LatLng::new(50.000_1, -123.0)));
    }

    #[test]
    fn pan_diff_matches_bounds_exactly() {
        let reports = vec![
            report_at(49.2, -123.0),
            report_at(49.5, -123.5),
            report_at(51.0, -120.0),
        ];
        let mut tracker = ViewportTracker::new();

        tracker.apply(Bounds::new(49.0, -124.0, 50.0, -122.0), &reports);
        assert_eq!(tracker.visible().len(), 2);

        // Pan away: only the third report is in the new box.
        tracker.apply(Bounds::new(50.5, -121.0, 51.5, -119.0), &reports);
        assert_eq!(tracker.visible().len(), 1);
        assert_eq!(
            tracker.visible()[0].location,
            Some(LatLng::new(51.0, -120.0))
        );
    }

    #[test]
    fn repeated_apply_does_not_duplicate() {
        let reports = vec![report_at(49.2, -123.0)];
        let mut tracker = ViewportTracker::new();
        let bounds = Bounds::new(49.0, -124.0, 50.0, -122.0);

        tracker.apply(bounds, &reports);
        tracker.apply(bounds, &reports);
        assert_eq!(tracker.visible().len(), 1);
    }

    #[test]
    fn identical_coordinates_are_one_entry() {
        let reports = vec![report_at(49.2, -123.0), report_at(49.2, -123.0)];
        let mut tracker = ViewportTracker::new();

        tracker.apply(Bounds::new(49.0, -124.0, 50.0, -122.0), &reports);
        assert_eq!(tracker.visible().len(), 1);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let reports = vec![
            report_at(49.9, -123.9),
            report_at(49.1, -123.1),
            report_at(49.5, -123.5),
        ];
        let mut tracker = ViewportTracker::new();
        tracker.apply(Bounds::new(49.0, -124.0, 50.0, -122.0), &reports);

        let lats: Vec<f64> = tracker
            .visible()
            .iter()
            .filter_map(|r| r.location.map(|l| l.lat))
            .collect();
        assert_eq!(lats, vec![49.9, 49.1, 49.5]);
    }

    #[test]
    fn one_time_designation_is_consumed_once() {
        let mut tracker = ViewportTracker::new();
        tracker.insert(&report_at(49.1, -123.1));
        tracker.insert(&report_at(49.2, -123.2));

        tracker.designate(report_at(50.0, -124.0));
        let target = tracker.consume().unwrap();
        assert!((target.lat - 50.0).abs() < f64::EPSILON);
        assert_eq!(tracker.visible().len(), 1);

        assert!(tracker.consume().is_none());
    }

    #[test]
    fn remove_by_location_matches_coordinates() {
        let mut tracker = ViewportTracker::new();
        tracker.insert(&report_at(49.1, -123.1));
        tracker.insert(&report_at(49.2, -123.2));

        assert!(tracker.remove_by_location(&report_at(49.1, -123.1)));
        assert!(!tracker.remove_by_location(&report_at(49.1, -123.1)));
        assert_eq!(tracker.visible().len(), 1);
    }

    #[test]
    fn sync_status_updates_visible_clone() {
        let mut tracker = ViewportTracker::new();
        tracker.insert(&report_at(49.1, -123.1));

        tracker.sync_status(&report_at(49.1, -123.1), ReportStatus::Resolved);
        assert_eq!(tracker.visible()[0].status, ReportStatus::Resolved);
    }
}
