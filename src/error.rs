//! Errors shared by the course-building core.
//!
//! Validation errors are operator-facing and always recoverable: the
//! operation that produced one made no changes. Index errors signal a
//! caller that ignored the bounds of the list it was shown.

use jiff::civil::Date;

use crate::storage::StorageError;

/// A rejected input. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep {
        field: &'static str,
        value: u32,
        step: u32,
    },

    #[error("{field} does not apply to exercise type '{type_id}'")]
    UnexpectedField {
        field: &'static str,
        type_id: String,
    },

    #[error("{field} is required for exercise type '{type_id}'")]
    MissingField {
        field: &'static str,
        type_id: String,
    },

    #[error("target '{target_id}' is not allowed for exercise type '{type_id}'")]
    TargetNotAllowed { target_id: String, type_id: String },

    #[error("unknown target: {0}")]
    UnknownTarget(String),

    #[error("unknown exercise type: {0}")]
    UnknownExerciseType(String),

    #[error("name cannot be empty")]
    EmptyName,

    #[error("at least one exercise is required")]
    NoExercises,

    #[error("schedule ends ({end}) before it starts ({start})")]
    InvertedSchedule { start: Date, end: Date },

    #[error("station '{0}' is offline or not in the roster")]
    StationUnavailable(String),

    #[error("select at least one station")]
    NoStations,
}

/// A list position outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("index {index} is out of bounds for {len} exercise(s)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Why a save did not go through.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not persist: {0}")]
    Storage(#[from] StorageError),
}
