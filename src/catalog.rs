//! The exercise-type and target catalog.
//!
//! A fixed registry. Nothing in drill mutates it; exercises and templates
//! copy what they need out of it at configuration time.

use crate::model::{Capabilities, ExerciseType, TargetCategory, TargetDefinition};

const NONE: Capabilities = Capabilities {
    has_speed: false,
    has_grouping: false,
    includes_vehicles: false,
};

pub const EXERCISE_TYPES: &[ExerciseType] = &[
    ExerciseType {
        id: "grouping",
        name: "Grouping",
        description: "Fixed-target precision drill scored by shot group size.",
        capabilities: Capabilities {
            has_grouping: true,
            ..NONE
        },
    },
    ExerciseType {
        id: "qualification",
        name: "Qualification",
        description: "Standard qualification string against static targets.",
        capabilities: NONE,
    },
    ExerciseType {
        id: "rapid-fire",
        name: "Rapid Fire",
        description: "Timed engagement of multiple static targets.",
        capabilities: NONE,
    },
    ExerciseType {
        id: "moving-target",
        name: "Moving Target",
        description: "Engagement of targets crossing the lane at a set speed.",
        capabilities: Capabilities {
            has_speed: true,
            ..NONE
        },
    },
    ExerciseType {
        id: "vehicle-engagement",
        name: "Vehicle Engagement",
        description: "Moving vehicle and dismount targets at extended range.",
        capabilities: Capabilities {
            has_speed: true,
            includes_vehicles: true,
            ..NONE
        },
    },
    ExerciseType {
        id: "mixed-threat",
        name: "Mixed Threat",
        description: "Static human and vehicle targets scored by grouping.",
        capabilities: Capabilities {
            has_grouping: true,
            includes_vehicles: true,
            ..NONE
        },
    },
];

pub const TARGETS: &[TargetDefinition] = &[
    TargetDefinition {
        id: "silhouette-standing",
        name: "Standing silhouette",
        category: TargetCategory::Human,
    },
    TargetDefinition {
        id: "silhouette-kneeling",
        name: "Kneeling silhouette",
        category: TargetCategory::Human,
    },
    TargetDefinition {
        id: "silhouette-prone",
        name: "Prone silhouette",
        category: TargetCategory::Human,
    },
    TargetDefinition {
        id: "hostage",
        name: "Hostage scenario",
        category: TargetCategory::Human,
    },
    TargetDefinition {
        id: "light-vehicle",
        name: "Light vehicle",
        category: TargetCategory::Vehicle,
    },
    TargetDefinition {
        id: "truck",
        name: "Cargo truck",
        category: TargetCategory::Vehicle,
    },
    TargetDefinition {
        id: "apc",
        name: "Armored personnel carrier",
        category: TargetCategory::Vehicle,
    },
];

pub fn find_type(id: &str) -> Option<&'static ExerciseType> {
    EXERCISE_TYPES.iter().find(|t| t.id == id)
}

pub fn find_target(id: &str) -> Option<&'static TargetDefinition> {
    TARGETS.iter().find(|t| t.id == id)
}

/// Targets an exercise of the given type may engage, in catalog order.
///
/// Human targets always; vehicles only when the type includes them.
pub fn allowed_targets(exercise_type: &ExerciseType) -> impl Iterator<Item = &'static TargetDefinition> {
    let vehicles = exercise_type.capabilities.includes_vehicles;
    TARGETS
        .iter()
        .filter(move |t| vehicles || t.category == TargetCategory::Human)
}

/// The target a freshly instantiated exercise starts with.
pub fn default_target(exercise_type: &ExerciseType) -> &'static TargetDefinition {
    // The catalog always leads with human targets, which every type allows.
    allowed_targets(exercise_type).next().unwrap_or(&TARGETS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let types: HashSet<_> = EXERCISE_TYPES.iter().map(|t| t.id).collect();
        assert_eq!(types.len(), EXERCISE_TYPES.len());

        let targets: HashSet<_> = TARGETS.iter().map(|t| t.id).collect();
        assert_eq!(targets.len(), TARGETS.len());
    }

    #[test]
    fn vehicles_only_allowed_when_type_includes_them() {
        let grouping = find_type("grouping").unwrap();
        assert!(allowed_targets(grouping).all(|t| t.category == TargetCategory::Human));

        let vehicle = find_type("vehicle-engagement").unwrap();
        assert!(allowed_targets(vehicle).any(|t| t.id == "apc"));
        assert_eq!(allowed_targets(vehicle).count(), TARGETS.len());
    }

    #[test]
    fn default_target_is_first_allowed() {
        for t in EXERCISE_TYPES {
            assert_eq!(default_target(t).id, "silhouette-standing");
        }
    }

    #[test]
    fn lookup_misses_return_none() {
        assert!(find_type("juggling").is_none());
        assert!(find_target("balloon").is_none());
    }
}
