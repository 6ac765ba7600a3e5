//! Station types: physical training terminals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A training terminal that courses can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub status: StationStatus,
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_course_id: Option<Uuid>,
}

impl Station {
    /// Offline stations cannot receive a course.
    pub fn is_assignable(&self) -> bool {
        self.status != StationStatus::Offline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StationStatus {
    Idle,
    InUse,
    Offline,
}

impl StationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InUse => "in-use",
            Self::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "in-use" => Some(Self::InUse),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}
