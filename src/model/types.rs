//! Roster records as the gateway returns them and as callers submit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned student identity.
pub type StudentId = Uuid;

/// Course identity, owned by the course catalog.
pub type CourseId = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Absent on older catalog schemas.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub cohort: String,
    pub status: bool,
    pub date_joined: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Input for creating a student. Identity and timestamps come from the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub cohort: String,
    pub status: bool,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
}

/// Partial update. `course_ids: Some(vec![])` clears every association,
/// `None` leaves associations untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_ids: Option<Vec<CourseId>>,
}

impl StudentPatch {
    pub fn has_scalar_fields(&self) -> bool {
        self.name.is_some() || self.cohort.is_some() || self.status.is_some()
    }
}
