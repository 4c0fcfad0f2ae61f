use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Semester;

/// A single student-submitted review of one course instance (year + semester).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub review_id: Uuid,
    pub course_id: String,
    pub reviewer_id: Uuid,
    pub year: i32,
    pub semester: Semester,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    /// Hours per week
    pub workload: f64,
    pub difficulty: i16,
    pub overall: i16,
    pub staff_support: Option<i16>,
    pub preparation: Option<i16>,
    pub body: String,
    pub is_recommended: Option<bool>,
    pub is_pairable: Option<bool>,
    pub has_group_projects: Option<bool>,
    pub has_writing_assignments: Option<bool>,
    pub has_exams_quizzes: Option<bool>,
    pub has_mandatory_readings: Option<bool>,
    pub has_provided_dev_env: Option<bool>,
    pub oms_courses_taken: Option<i32>,
    pub programming_languages: Vec<String>,
    pub reviewer_program: Option<String>,
    pub reviewer_specialization: Option<String>,
}

impl Review {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.reviewer_id == user_id
    }
}
