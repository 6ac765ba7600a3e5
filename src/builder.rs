//! Exercise configuration: defaults, validation, and commit.
//!
//! A caller instantiates a config for an exercise type, edits it, and
//! commits it into a `ConfiguredExercise`. The config is checked against
//! the type's capabilities on every commit; the catalog is never touched.

use tracing::debug;
use uuid::Uuid;

use crate::catalog;
use crate::error::ValidationError;
use crate::model::{ConfiguredExercise, ExerciseConfig, ExerciseType, FiringPosition, TargetCategory};

/// Inclusive numeric bounds for one config field.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub field: &'static str,
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Bounds {
    fn check(&self, value: u32) -> Result<(), ValidationError> {
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        if (value - self.min) % self.step != 0 {
            return Err(ValidationError::OffStep {
                field: self.field,
                value,
                step: self.step,
            });
        }
        Ok(())
    }
}

pub const SCENARIO_TIME: Bounds = Bounds {
    field: "scenarioTimeSeconds",
    min: 15,
    max: 300,
    step: 15,
};

pub const RANGE: Bounds = Bounds {
    field: "rangeMeters",
    min: 25,
    max: 800,
    step: 25,
};

pub const BULLETS: Bounds = Bounds {
    field: "bulletCount",
    min: 1,
    max: 30,
    step: 1,
};

pub const GROUPING_THRESHOLD: Bounds = Bounds {
    field: "groupingThresholdCm",
    min: 5,
    max: 50,
    step: 1,
};

pub const SPEED: Bounds = Bounds {
    field: "speedLevel",
    min: 1,
    max: 10,
    step: 1,
};

const DEFAULT_SCENARIO_TIME: u32 = 60;
const DEFAULT_RANGE: u32 = 100;
const DEFAULT_BULLETS: u32 = 5;
const DEFAULT_GROUPING_THRESHOLD: u32 = 10;
const DEFAULT_SPEED: u32 = 5;

/// A config seeded with the defaults for `exercise_type`.
pub fn instantiate(exercise_type: &ExerciseType) -> ExerciseConfig {
    let caps = exercise_type.capabilities;
    ExerciseConfig {
        scenario_time_seconds: DEFAULT_SCENARIO_TIME,
        target_id: catalog::default_target(exercise_type).id.to_string(),
        range_meters: DEFAULT_RANGE,
        bullet_count: DEFAULT_BULLETS,
        position: FiringPosition::Standing,
        grouping_threshold_cm: caps.has_grouping.then_some(DEFAULT_GROUPING_THRESHOLD),
        speed_level: caps.has_speed.then_some(DEFAULT_SPEED),
    }
}

/// Check every field of `config` against the bounds and capabilities of
/// `exercise_type`. Returns the first violation found.
pub fn validate(exercise_type: &ExerciseType, config: &ExerciseConfig) -> Result<(), ValidationError> {
    SCENARIO_TIME.check(config.scenario_time_seconds)?;
    RANGE.check(config.range_meters)?;
    BULLETS.check(config.bullet_count)?;

    let caps = exercise_type.capabilities;
    check_gated(
        exercise_type,
        &GROUPING_THRESHOLD,
        caps.has_grouping,
        config.grouping_threshold_cm,
    )?;
    check_gated(exercise_type, &SPEED, caps.has_speed, config.speed_level)?;

    let target = catalog::find_target(&config.target_id)
        .ok_or_else(|| ValidationError::UnknownTarget(config.target_id.clone()))?;
    if target.category == TargetCategory::Vehicle && !caps.includes_vehicles {
        return Err(ValidationError::TargetNotAllowed {
            target_id: config.target_id.clone(),
            type_id: exercise_type.id.to_string(),
        });
    }

    Ok(())
}

/// An optional field must be present exactly when its capability is set.
fn check_gated(
    exercise_type: &ExerciseType,
    bounds: &Bounds,
    enabled: bool,
    value: Option<u32>,
) -> Result<(), ValidationError> {
    match (enabled, value) {
        (true, Some(v)) => bounds.check(v),
        (true, None) => Err(ValidationError::MissingField {
            field: bounds.field,
            type_id: exercise_type.id.to_string(),
        }),
        (false, Some(_)) => Err(ValidationError::UnexpectedField {
            field: bounds.field,
            type_id: exercise_type.id.to_string(),
        }),
        (false, None) => Ok(()),
    }
}

/// Validate `config` and freeze it into a new exercise with a fresh id.
///
/// The caller owns resetting its working config afterwards.
pub fn commit(
    exercise_type: &ExerciseType,
    config: &ExerciseConfig,
) -> Result<ConfiguredExercise, ValidationError> {
    validate(exercise_type, config)?;
    let exercise = ConfiguredExercise {
        id: Uuid::new_v4(),
        type_id: exercise_type.id.to_string(),
        type_name: exercise_type.name.to_string(),
        config: config.clone(),
    };
    debug!(id = %exercise.id, type_id = exercise_type.id, "committed exercise");
    Ok(exercise)
}

/// Re-check a config read back from storage against the live catalog.
///
/// Stored exercises only carry a type id, so the type must still exist.
pub fn revalidate(type_id: &str, config: &ExerciseConfig) -> Result<(), ValidationError> {
    let exercise_type = catalog::find_type(type_id)
        .ok_or_else(|| ValidationError::UnknownExerciseType(type_id.to_string()))?;
    validate(exercise_type, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::{EXERCISE_TYPES, find_type};

    #[test]
    fn defaults_validate_for_every_type() {
        for t in EXERCISE_TYPES {
            validate(t, &instantiate(t)).unwrap();
        }
    }

    #[test]
    fn defaults_follow_capabilities() {
        let grouping = instantiate(find_type("grouping").unwrap());
        assert_eq!(grouping.grouping_threshold_cm, Some(10));
        assert_eq!(grouping.speed_level, None);

        let moving = instantiate(find_type("moving-target").unwrap());
        assert_eq!(moving.grouping_threshold_cm, None);
        assert_eq!(moving.speed_level, Some(5));

        assert_eq!(moving.scenario_time_seconds, 60);
        assert_eq!(moving.range_meters, 100);
        assert_eq!(moving.bullet_count, 5);
        assert_eq!(moving.position, FiringPosition::Standing);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let t = find_type("qualification").unwrap();

        let mut config = instantiate(t);
        config.scenario_time_seconds = 315;
        assert!(matches!(
            validate(t, &config),
            Err(ValidationError::OutOfRange { field: "scenarioTimeSeconds", .. })
        ));

        let mut config = instantiate(t);
        config.range_meters = 0;
        assert!(matches!(
            validate(t, &config),
            Err(ValidationError::OutOfRange { field: "rangeMeters", .. })
        ));

        let mut config = instantiate(t);
        config.bullet_count = 31;
        assert!(matches!(
            validate(t, &config),
            Err(ValidationError::OutOfRange { field: "bulletCount", .. })
        ));
    }

    #[test]
    fn rejects_values_off_step() {
        let t = find_type("qualification").unwrap();

        let mut config = instantiate(t);
        config.scenario_time_seconds = 70;
        assert!(matches!(
            validate(t, &config),
            Err(ValidationError::OffStep { step: 15, .. })
        ));

        let mut config = instantiate(t);
        config.range_meters = 110;
        assert!(matches!(
            validate(t, &config),
            Err(ValidationError::OffStep { step: 25, .. })
        ));
    }

    #[test]
    fn bounds_are_inclusive() {
        let t = find_type("grouping").unwrap();
        let mut config = instantiate(t);
        config.scenario_time_seconds = 300;
        config.range_meters = 800;
        config.bullet_count = 1;
        config.grouping_threshold_cm = Some(50);
        validate(t, &config).unwrap();
    }

    #[test]
    fn rejects_optional_field_without_capability() {
        let t = find_type("qualification").unwrap();
        let mut config = instantiate(t);
        config.speed_level = Some(3);

        let err = validate(t, &config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnexpectedField { field: "speedLevel", .. }
        ));
    }

    #[test]
    fn rejects_missing_optional_field_with_capability() {
        let t = find_type("grouping").unwrap();
        let mut config = instantiate(t);
        config.grouping_threshold_cm = None;

        let err = validate(t, &config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingField { field: "groupingThresholdCm", .. }
        ));
    }

    #[test]
    fn rejects_vehicle_target_for_human_only_type() {
        let t = find_type("moving-target").unwrap();
        let mut config = instantiate(t);
        config.target_id = "truck".into();

        let err = validate(t, &config).unwrap_err();
        assert!(matches!(err, ValidationError::TargetNotAllowed { .. }));

        let vehicles = find_type("vehicle-engagement").unwrap();
        let mut config = instantiate(vehicles);
        config.target_id = "truck".into();
        validate(vehicles, &config).unwrap();
    }

    #[test]
    fn rejects_unknown_target() {
        let t = find_type("qualification").unwrap();
        let mut config = instantiate(t);
        config.target_id = "balloon".into();

        let err = validate(t, &config).unwrap_err();
        assert_eq!(err, ValidationError::UnknownTarget("balloon".into()));
    }

    #[test]
    fn commit_snapshots_type_and_assigns_fresh_ids() {
        let t = find_type("grouping").unwrap();
        let config = instantiate(t);

        let a = commit(t, &config).unwrap();
        let b = commit(t, &config).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.type_id, "grouping");
        assert_eq!(a.type_name, "Grouping");
        assert_eq!(a.config, config);
    }

    #[test]
    fn commit_refuses_invalid_config() {
        let t = find_type("grouping").unwrap();
        let mut config = instantiate(t);
        config.bullet_count = 0;
        assert!(commit(t, &config).is_err());
    }

    #[test]
    fn revalidate_checks_type_and_config() {
        let t = find_type("qualification").unwrap();
        let mut config = instantiate(t);
        revalidate("qualification", &config).unwrap();

        assert_eq!(
            revalidate("nope", &config).unwrap_err(),
            ValidationError::UnknownExerciseType("nope".into())
        );

        config.speed_level = Some(99);
        assert!(revalidate("qualification", &config).is_err());
    }
}
