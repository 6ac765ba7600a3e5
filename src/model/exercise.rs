//! Exercise types: catalog definitions and configured instances.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capability flags that gate which optional parameters a type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Accepts a `speed_level`.
    pub has_speed: bool,

    /// Accepts a `grouping_threshold_cm`.
    pub has_grouping: bool,

    /// May engage vehicle targets.
    pub includes_vehicles: bool,
}

/// A drill category from the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseType {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: Capabilities,
}

/// Whether a target represents a person or a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCategory {
    Human,
    Vehicle,
}

impl fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// A target from the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TargetCategory,
}

/// Shooter stance for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FiringPosition {
    #[default]
    Standing,
    Crouching,
    Prone,
}

impl fmt::Display for FiringPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standing => write!(f, "standing"),
            Self::Crouching => write!(f, "crouching"),
            Self::Prone => write!(f, "prone"),
        }
    }
}

/// User-chosen parameters for one exercise.
///
/// The optional fields are present exactly when the owning type's
/// capabilities allow them. See `builder::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    pub scenario_time_seconds: u32,
    pub target_id: String,
    pub range_meters: u32,
    pub bullet_count: u32,
    pub position: FiringPosition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping_threshold_cm: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_level: Option<u32>,
}

impl ExerciseConfig {
    /// Scenario time rounded up to whole minutes.
    pub fn scenario_minutes(&self) -> u32 {
        self.scenario_time_seconds.div_ceil(60)
    }
}

/// One concrete, parameterized exercise, ready for sequencing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredExercise {
    pub id: Uuid,
    pub type_id: String,

    /// Type name at the time the exercise was configured.
    pub type_name: String,

    pub config: ExerciseConfig,
}

impl ConfiguredExercise {
    /// A by-value copy without the identity, for templates.
    pub fn snapshot(&self) -> ExerciseSnapshot {
        ExerciseSnapshot {
            type_id: self.type_id.clone(),
            type_name: self.type_name.clone(),
            config: self.config.clone(),
        }
    }
}

/// An exercise detached from any identity or live catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSnapshot {
    pub type_id: String,
    pub type_name: String,
    pub config: ExerciseConfig,
}

impl ExerciseSnapshot {
    /// Materialize the snapshot as a new exercise with a fresh id.
    pub fn rekey(&self) -> ConfiguredExercise {
        ConfiguredExercise {
            id: Uuid::new_v4(),
            type_id: self.type_id.clone(),
            type_name: self.type_name.clone(),
            config: self.config.clone(),
        }
    }
}
