//! Course types: the persisted result of a saved draft.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

use super::ConfiguredExercise;

/// A saved course.
///
/// Holds a deep copy of the draft at save time. Courses are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<ConfiguredExercise>,
    pub created_at: Timestamp,
    pub total_time_minutes: u32,
    pub total_exercise_count: usize,
    pub status: CourseStatus,

    /// Station ids selected on the draft. Empty when none were chosen.
    #[serde(default)]
    pub assigned_stations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleWindow>,
}

/// Where a course stands once saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CourseStatus {
    /// Available immediately.
    Active,

    /// Bound to a schedule window.
    Scheduled,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Scheduled => "scheduled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "scheduled" => Some(Self::Scheduled),
            _ => None,
        }
    }
}

/// Inclusive date range during which an assigned course is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    start: Date,
    end: Date,
}

impl ScheduleWindow {
    /// Build a window, rejecting an end date before the start date.
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedSchedule { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }
}

/// Totals derived from an exercise sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CourseTotals {
    /// Sum of each exercise's scenario time, rounded up per exercise.
    pub total_time_minutes: u32,
    pub total_bullets: u32,
}

impl CourseTotals {
    pub fn of(exercises: &[ConfiguredExercise]) -> Self {
        exercises.iter().fold(Self::default(), |acc, e| Self {
            total_time_minutes: acc
                .total_time_minutes
                .saturating_add(e.config.scenario_minutes()),
            total_bullets: acc.total_bullets.saturating_add(e.config.bullet_count),
        })
    }
}
