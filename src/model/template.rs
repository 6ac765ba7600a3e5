//! Template types: named, reusable exercise lists.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExerciseSnapshot;

/// A named snapshot of an exercise list.
///
/// Exercises are stored by value, so later catalog changes never
/// alter a saved template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseTemplate {
    pub id: Uuid,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub exercises: Vec<ExerciseSnapshot>,
    pub created_at: Timestamp,
}
