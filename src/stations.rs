//! Station selection: which stations a course will be assigned to.
//!
//! The selection is a plain set of station ids. Every operation that can
//! add ids takes the current roster and only admits stations that are not
//! offline at that moment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{SaveError, ValidationError};
use crate::model::Station;
use crate::storage::StorageError;

/// Read access to the live station roster.
pub trait StationRoster {
    fn stations(&self) -> Vec<Station>;
}

/// Records that a course should run on a station.
pub trait StationAssigner {
    fn assign_course_to_station(&self, course_id: Uuid, station_id: &str) -> Result<(), StorageError>;
}

impl<T: StationRoster + ?Sized> StationRoster for &T {
    fn stations(&self) -> Vec<Station> {
        (**self).stations()
    }
}

impl<T: StationAssigner + ?Sized> StationAssigner for &T {
    fn assign_course_to_station(&self, course_id: Uuid, station_id: &str) -> Result<(), StorageError> {
        (**self).assign_course_to_station(course_id, station_id)
    }
}

/// The selected subset of assignable stations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationAssignmentSet {
    selected: BTreeSet<String>,
}

impl StationAssignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the station if absent, remove it if present.
    ///
    /// Removal always succeeds. Adding requires the station to be in the
    /// roster and not offline.
    pub fn toggle(&mut self, station_id: &str, roster: &[Station]) -> Result<(), ValidationError> {
        if self.selected.remove(station_id) {
            return Ok(());
        }
        let assignable = roster
            .iter()
            .any(|s| s.id == station_id && s.is_assignable());
        if !assignable {
            return Err(ValidationError::StationUnavailable(station_id.to_string()));
        }
        self.selected.insert(station_id.to_string());
        Ok(())
    }

    /// Replace the selection with every assignable station in the roster.
    pub fn select_all(&mut self, roster: &[Station]) {
        self.selected = assignable_ids(roster);
    }

    pub fn clear(&mut self) {
        self.selected = BTreeSet::new();
    }

    /// Clear when every assignable station is already selected, otherwise
    /// select them all. One replacement either way.
    pub fn toggle_all(&mut self, roster: &[Station]) {
        let all = assignable_ids(roster);
        self.selected = if !all.is_empty() && self.selected == all {
            BTreeSet::new()
        } else {
            all
        };
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.selected.contains(station_id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }
}

/// Picking stations for an already saved course.
///
/// Started from the save confirmation, seeded with the new course id.
/// Independent of the draft, which is already cleared by then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationAssignmentFlow {
    course_id: Uuid,
    selection: StationAssignmentSet,
}

impl StationAssignmentFlow {
    pub fn new(course_id: Uuid) -> Self {
        Self {
            course_id,
            selection: StationAssignmentSet::new(),
        }
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn selection(&self) -> &StationAssignmentSet {
        &self.selection
    }

    pub fn toggle(&mut self, station_id: &str, roster: &[Station]) -> Result<(), ValidationError> {
        self.selection.toggle(station_id, roster)
    }

    pub fn toggle_all(&mut self, roster: &[Station]) {
        self.selection.toggle_all(roster);
    }

    /// Assign the course to every selected station, in id order.
    ///
    /// Stops at the first failure; stations before it stay assigned.
    pub fn confirm(&self, assigner: &impl StationAssigner) -> Result<Vec<String>, SaveError> {
        if self.selection.is_empty() {
            return Err(ValidationError::NoStations.into());
        }
        let ids = self.selection.ids();
        for station_id in &ids {
            assigner.assign_course_to_station(self.course_id, station_id)?;
        }
        info!(course_id = %self.course_id, count = ids.len(), "assigned course to stations");
        Ok(ids)
    }
}

fn assignable_ids(roster: &[Station]) -> BTreeSet<String> {
    roster
        .iter()
        .filter(|s| s.is_assignable())
        .map(|s| s.id.clone())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::cell::RefCell;

    use crate::model::StationStatus;

    /// Records assignments; fails for ids listed in `reject`.
    #[derive(Default)]
    pub(crate) struct RecordingAssigner {
        pub assigned: RefCell<Vec<(Uuid, String)>>,
        pub reject: Vec<String>,
    }

    impl StationAssigner for RecordingAssigner {
        fn assign_course_to_station(&self, course_id: Uuid, station_id: &str) -> Result<(), StorageError> {
            if self.reject.iter().any(|r| r == station_id) {
                return Err(StorageError::StationNotFound(station_id.to_string()));
            }
            self.assigned
                .borrow_mut()
                .push((course_id, station_id.to_string()));
            Ok(())
        }
    }

    /// Ten stations: eight assignable, two offline.
    pub(crate) fn sample_roster() -> Vec<Station> {
        (1..=10)
            .map(|n| Station {
                id: format!("ST-{n:02}"),
                name: format!("Lane {n}"),
                status: match n {
                    3 | 7 => StationStatus::Offline,
                    5 => StationStatus::InUse,
                    _ => StationStatus::Idle,
                },
                location: "Range A".into(),
                assigned_course_id: None,
            })
            .collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let roster = sample_roster();
        let mut set = StationAssignmentSet::new();

        set.toggle("ST-01", &roster).unwrap();
        assert!(set.contains("ST-01"));

        set.toggle("ST-01", &roster).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_refuses_offline_and_unknown_stations() {
        let roster = sample_roster();
        let mut set = StationAssignmentSet::new();

        assert_eq!(
            set.toggle("ST-03", &roster).unwrap_err(),
            ValidationError::StationUnavailable("ST-03".into())
        );
        assert!(set.toggle("ST-99", &roster).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn in_use_stations_are_assignable() {
        let roster = sample_roster();
        let mut set = StationAssignmentSet::new();
        set.toggle("ST-05", &roster).unwrap();
        assert!(set.contains("ST-05"));
    }

    #[test]
    fn toggle_all_selects_every_assignable_then_clears() {
        let roster = sample_roster();
        let mut set = StationAssignmentSet::new();

        set.toggle_all(&roster);
        assert_eq!(set.len(), 8);
        assert!(!set.contains("ST-03"));
        assert!(!set.contains("ST-07"));

        set.toggle_all(&roster);
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_all_from_partial_selects_all() {
        let roster = sample_roster();
        let mut set = StationAssignmentSet::new();
        set.toggle("ST-02", &roster).unwrap();

        set.toggle_all(&roster);
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn select_all_replaces_stale_selection() {
        let mut roster = sample_roster();
        let mut set = StationAssignmentSet::new();
        set.toggle("ST-01", &roster).unwrap();

        // ST-01 goes offline after it was selected.
        roster[0].status = StationStatus::Offline;
        set.select_all(&roster);

        assert_eq!(set.len(), 7);
        assert!(!set.contains("ST-01"));
    }

    #[test]
    fn ids_are_sorted() {
        let roster = sample_roster();
        let mut set = StationAssignmentSet::new();
        set.toggle("ST-09", &roster).unwrap();
        set.toggle("ST-02", &roster).unwrap();
        assert_eq!(set.ids(), vec!["ST-02".to_string(), "ST-09".to_string()]);
    }

    #[test]
    fn flow_assigns_selected_stations_to_course() {
        let roster = sample_roster();
        let course_id = Uuid::new_v4();
        let mut flow = StationAssignmentFlow::new(course_id);
        flow.toggle("ST-04", &roster).unwrap();
        flow.toggle("ST-01", &roster).unwrap();

        let assigner = RecordingAssigner::default();
        let ids = flow.confirm(&assigner).unwrap();

        assert_eq!(ids, vec!["ST-01".to_string(), "ST-04".to_string()]);
        assert_eq!(
            *assigner.assigned.borrow(),
            vec![(course_id, "ST-01".to_string()), (course_id, "ST-04".to_string())]
        );
    }

    #[test]
    fn flow_requires_a_station() {
        let flow = StationAssignmentFlow::new(Uuid::new_v4());
        let err = flow.confirm(&RecordingAssigner::default()).unwrap_err();
        assert!(matches!(err, SaveError::Validation(ValidationError::NoStations)));
    }

    #[test]
    fn flow_surfaces_assigner_failure() {
        let roster = sample_roster();
        let mut flow = StationAssignmentFlow::new(Uuid::new_v4());
        flow.toggle_all(&roster);

        let assigner = RecordingAssigner {
            reject: vec!["ST-02".into()],
            ..Default::default()
        };
        let err = flow.confirm(&assigner).unwrap_err();

        assert!(matches!(err, SaveError::Storage(StorageError::StationNotFound(_))));
        assert_eq!(assigner.assigned.borrow().len(), 1);
    }
}
