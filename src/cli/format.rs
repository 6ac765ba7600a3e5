//! Output formatting for CLI display.

use crate::model::{ConfiguredExercise, Course, ExerciseConfig, ScheduleWindow, Station};

use super::short_id;

/// One line per exercise: position, short id, type, and parameters.
pub(super) fn format_exercise(position: usize, exercise: &ConfiguredExercise) -> String {
    format!(
        "{position:>2}. {}  {:<20} {}",
        short_id(exercise.id),
        exercise.type_name,
        format_config(&exercise.config)
    )
}

/// Compact parameter summary, e.g. `60s  silhouette-standing @ 100m  5 rds  standing`.
pub(super) fn format_config(config: &ExerciseConfig) -> String {
    let mut parts = vec![
        format!("{}s", config.scenario_time_seconds),
        format!("{} @ {}m", config.target_id, config.range_meters),
        format!("{} rds", config.bullet_count),
        config.position.to_string(),
    ];
    if let Some(cm) = config.grouping_threshold_cm {
        parts.push(format!("group {cm}cm"));
    }
    if let Some(speed) = config.speed_level {
        parts.push(format!("speed {speed}"));
    }
    parts.join("  ")
}

pub(super) fn format_minutes(minutes: u32) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}

pub(super) fn format_schedule(window: &ScheduleWindow) -> String {
    format!("{} to {}", window.start(), window.end())
}

pub(super) fn format_station(station: &Station) -> String {
    let course = station
        .assigned_course_id
        .map(|id| format!("  course {}", short_id(id)))
        .unwrap_or_default();
    format!(
        "{}  {:<12} [{}]  {}{course}",
        station.id,
        station.name,
        station.status.as_str(),
        station.location
    )
}

pub(super) fn format_course(course: &Course) -> String {
    let mut line = format!(
        "{}  [{}]  {}  ({} exercises, {})",
        short_id(course.id),
        course.status.as_str(),
        course.name,
        course.total_exercise_count,
        format_minutes(course.total_time_minutes)
    );
    if !course.assigned_stations.is_empty() {
        line.push_str(&format!("  stations: {}", course.assigned_stations.join(", ")));
    }
    if let Some(window) = &course.schedule {
        line.push_str(&format!("  {}", format_schedule(window)));
    }
    line
}
