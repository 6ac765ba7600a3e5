//! The course draft: the single working aggregate an operator edits.
//!
//! Holds the ordered exercise list, the course name, the station
//! selection, and an optional schedule window. Every command either
//! applies fully or returns an error and leaves the draft untouched.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{IndexError, ValidationError};
use crate::model::{ConfiguredExercise, CourseTemplate, CourseTotals, ScheduleWindow, Station};
use crate::stations::StationAssignmentSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    name: String,
    exercises: Vec<ConfiguredExercise>,

    #[serde(default)]
    stations: StationAssignmentSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<ScheduleWindow>,
}

impl CourseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn exercises(&self) -> &[ConfiguredExercise] {
        &self.exercises
    }

    pub fn stations(&self) -> &StationAssignmentSet {
        &self.stations
    }

    pub fn schedule(&self) -> Option<ScheduleWindow> {
        self.schedule
    }

    // ── Exercises ──

    /// Append an exercise to the end of the sequence.
    pub fn add_exercise(&mut self, exercise: ConfiguredExercise) {
        debug!(id = %exercise.id, "added exercise to draft");
        self.exercises.push(exercise);
    }

    /// Remove the exercise with `id`. Returns whether anything was removed.
    pub fn remove_exercise(&mut self, id: Uuid) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != id);
        before != self.exercises.len()
    }

    /// Move the exercise at `from` so it ends up at `to`.
    ///
    /// Every other exercise keeps its relative order.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        let len = self.exercises.len();
        for index in [from, to] {
            if index >= len {
                return Err(IndexError { index, len });
            }
        }
        let moved = self.exercises.remove(from);
        self.exercises.insert(to, moved);
        debug!(from, to, "reordered draft");
        Ok(())
    }

    /// Append the template's exercises, each under a fresh id.
    ///
    /// Returns how many exercises were added.
    pub fn load_from_template(&mut self, template: &CourseTemplate) -> usize {
        self.exercises
            .extend(template.exercises.iter().map(|s| s.rekey()));
        debug!(template = %template.id, count = template.exercises.len(), "loaded template into draft");
        template.exercises.len()
    }

    /// Totals over the current sequence, computed on every call.
    pub fn derived_totals(&self) -> CourseTotals {
        CourseTotals::of(&self.exercises)
    }

    // ── Stations ──

    pub fn toggle_station(&mut self, station_id: &str, roster: &[Station]) -> Result<(), ValidationError> {
        self.stations.toggle(station_id, roster)
    }

    pub fn select_all_stations(&mut self, roster: &[Station]) {
        self.stations.select_all(roster);
    }

    pub fn toggle_all_stations(&mut self, roster: &[Station]) {
        self.stations.toggle_all(roster);
    }

    pub fn clear_stations(&mut self) {
        self.stations.clear();
    }

    // ── Schedule ──

    pub fn set_schedule_window(&mut self, start: Date, end: Date) -> Result<(), ValidationError> {
        self.schedule = Some(ScheduleWindow::new(start, end)?);
        Ok(())
    }

    pub fn clear_schedule(&mut self) {
        self.schedule = None;
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
