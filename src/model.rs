//! Core data model for drill.
//!
//! These types describe what an operator works with: exercise types and
//! targets from the catalog, configured exercises, reusable templates,
//! persisted courses, and the station roster.

mod course;
mod exercise;
mod station;
mod template;

pub use course::{Course, CourseStatus, CourseTotals, ScheduleWindow};
pub use exercise::{
    Capabilities, ConfiguredExercise, ExerciseConfig, ExerciseSnapshot, ExerciseType,
    FiringPosition, TargetCategory, TargetDefinition,
};
pub use station::{Station, StationStatus};
pub use template::CourseTemplate;
