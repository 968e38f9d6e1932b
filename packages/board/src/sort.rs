//! Column sorting for the visible report list.
//!
//! The direction is threaded explicitly: callers pass the current
//! direction in and store the returned one for the next invocation,
//! which yields the toggle-on-every-click behavior of the table
//! headers.

use std::cmp::Ordering;

use incident_map_geocoder::reverse_cache_key;
use incident_map_report_models::Report;
use incident_map_storage::kv::KvStore;
use strum_macros::{AsRefStr, Display, EnumString};

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum SortColumn {
    /// Resolved place name when cached, raw coordinates otherwise.
    Location,
    /// Free-text incident type.
    Type,
    /// Report timestamp.
    Time,
    /// Open/resolved status.
    Status,
}

/// Sort direction, threaded through successive invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The direction the next invocation should use.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sorts `reports` in place by `column` and returns the direction for
/// the next invocation.
///
/// The location comparator only ever consults the cache — it never
/// issues a geocode lookup. When both reports' resolved names are
/// cached they compare lexicographically; otherwise latitude compares
/// first and longitude breaks latitude ties, with no tertiary key.
pub fn sort_by(
    reports: &mut [Report],
    column: SortColumn,
    direction: SortDirection,
    store: &dyn KvStore,
) -> SortDirection {
    let apply = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };

    match column {
        SortColumn::Time => reports.sort_by(|a, b| apply(a.time.cmp(&b.time))),
        SortColumn::Type => reports.sort_by(|a, b| apply(a.report_type.cmp(&b.report_type))),
        SortColumn::Status => {
            reports.sort_by(|a, b| apply(a.status.as_ref().cmp(b.status.as_ref())));
        }
        SortColumn::Location => {
            reports.sort_by(|a, b| apply(compare_locations(a, b, store)));
        }
    }

    direction.toggled()
}

/// Sorts by a column named in free text (trimmed, case-insensitive).
///
/// An unknown column name is a no-op and returns the direction
/// unchanged.
pub fn sort_by_name(
    reports: &mut [Report],
    column: &str,
    direction: SortDirection,
    store: &dyn KvStore,
) -> SortDirection {
    column.trim().parse::<SortColumn>().map_or(direction, |col| {
        sort_by(reports, col, direction, store)
    })
}

fn compare_locations(a: &Report, b: &Report, store: &dyn KvStore) -> Ordering {
    let cached_name =
        |report: &Report| report.location.and_then(|l| store.get(&reverse_cache_key(l)));

    if let (Some(a_name), Some(b_name)) = (cached_name(a), cached_name(b)) {
        return a_name.cmp(&b_name);
    }

    match (a.location, b.location) {
        (Some(a_loc), Some(b_loc)) => a_loc
            .lat
            .total_cmp(&b_loc.lat)
            .then(a_loc.lng.total_cmp(&b_loc.lng)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_map_report_models::{LatLng, ReportStatus};
    use incident_map_storage::kv::MemoryStore;

    fn report(report_type: &str, time: i64, lat: f64, lng: f64) -> Report {
        Report {
            report_type: report_type.to_string(),
            location: Some(LatLng::new(lat, lng)),
            reporter_name: "Jane".to_string(),
            reporter_phone: "604-555-1234".to_string(),
            time,
            status: ReportStatus::Open,
            comment: None,
            image: None,
        }
    }

    fn times(reports: &[Report]) -> Vec<i64> {
        reports.iter().map(|r| r.time).collect()
    }

    #[test]
    fn sorting_time_twice_toggles_direction() {
        let store = MemoryStore::new();
        let mut reports = vec![
            report("Flood", 300, 49.1, -123.1),
            report("Fire", 100, 49.2, -123.2),
            report("Spill", 200, 49.3, -123.3),
        ];

        let next = sort_by(&mut reports, SortColumn::Time, SortDirection::Ascending, &store);
        assert_eq!(times(&reports), vec![100, 200, 300]);

        sort_by(&mut reports, SortColumn::Time, next, &store);
        assert_eq!(times(&reports), vec![300, 200, 100]);
    }

    #[test]
    fn sorts_type_lexicographically() {
        let store = MemoryStore::new();
        let mut reports = vec![
            report("Spill", 1, 49.1, -123.1),
            report("Fire", 2, 49.2, -123.2),
            report("Flood", 3, 49.3, -123.3),
        ];

        sort_by(&mut reports, SortColumn::Type, SortDirection::Ascending, &store);
        let types: Vec<&str> = reports.iter().map(|r| r.report_type.as_str()).collect();
        assert_eq!(types, vec!["Fire", "Flood", "Spill"]);
    }

    #[test]
    fn sorts_status_lexicographically() {
        let store = MemoryStore::new();
        let mut reports = vec![
            report("A", 1, 49.1, -123.1),
            report("B", 2, 49.2, -123.2),
        ];
        reports[0].status = ReportStatus::Resolved;

        sort_by(&mut reports, SortColumn::Status, SortDirection::Ascending, &store);
        assert_eq!(reports[0].status, ReportStatus::Open);
        assert_eq!(reports[1].status, ReportStatus::Resolved);
    }

    #[test]
    fn location_prefers_cached_names() {
        let store = MemoryStore::new();
        let a = LatLng::new(49.1, -123.1);
        let b = LatLng::new(48.0, -122.0);
        // Names invert the numeric order: the numerically-smaller
        // coordinate gets the lexicographically-larger name.
        store.set(&reverse_cache_key(a), "Aldergrove");
        store.set(&reverse_cache_key(b), "Zeballos");

        let mut reports = vec![report("A", 1, b.lat, b.lng), report("B", 2, a.lat, a.lng)];
        sort_by(
            &mut reports,
            SortColumn::Location,
            SortDirection::Ascending,
            &store,
        );
        assert_eq!(reports[0].location, Some(a));
        assert_eq!(reports[1].location, Some(b));
    }

    #[test]
    fn location_falls_back_to_coordinates_without_both_names() {
        let store = MemoryStore::new();
        let a = LatLng::new(49.1, -123.1);
        let b = LatLng::new(48.0, -122.0);
        // Only one name cached: numeric fallback applies.
        store.set(&reverse_cache_key(a), "Aldergrove");

        let mut reports = vec![report("A", 1, a.lat, a.lng), report("B", 2, b.lat, b.lng)];
        sort_by(
            &mut reports,
            SortColumn::Location,
            SortDirection::Ascending,
            &store,
        );
        assert_eq!(reports[0].location, Some(b));
        assert_eq!(reports[1].location, Some(a));
    }

    #[test]
    fn location_ties_break_on_longitude() {
        let store = MemoryStore::new();
        let mut reports = vec![
            report("A", 1, 49.0, -122.0),
            report("B", 2, 49.0, -123.0),
        ];

        sort_by(
            &mut reports,
            SortColumn::Location,
            SortDirection::Ascending,
            &store,
        );
        assert_eq!(reports[0].location, Some(LatLng::new(49.0, -123.0)));
    }

    #[test]
    fn unknown_column_is_a_no_op() {
        let store = MemoryStore::new();
        let mut reports = vec![
            report("Flood", 300, 49.1, -123.1),
            report("Fire", 100, 49.2, -123.2),
        ];

        let next = sort_by_name(&mut reports, "severity", SortDirection::Ascending, &store);
        assert_eq!(next, SortDirection::Ascending);
        assert_eq!(times(&reports), vec![300, 100]);
    }

    #[test]
    fn column_names_parse_case_insensitively() {
        let store = MemoryStore::new();
        let mut reports = vec![
            report("Flood", 300, 49.1, -123.1),
            report("Fire", 100, 49.2, -123.2),
        ];

        let next = sort_by_name(&mut reports, " TIME ", SortDirection::Ascending, &store);
        assert_eq!(next, SortDirection::Descending);
        assert_eq!(times(&reports), vec![100, 300]);
    }
}
