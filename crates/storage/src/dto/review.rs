use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use crate::models::{Review, Semester};

/// Request payload for submitting a review
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 32, message = "Course id is required"))]
    pub course_id: String,

    #[validate(range(min = 2014, max = 2100, message = "Year is out of range"))]
    pub year: i32,

    pub semester: Semester,

    #[validate(range(min = 0.0, max = 100.0, message = "Workload must be between 0 and 100 hours"))]
    pub workload: f64,

    #[validate(range(min = 1, max = 5))]
    pub difficulty: i16,

    #[validate(range(min = 1, max = 5))]
    pub overall: i16,

    #[validate(range(min = 1, max = 5))]
    pub staff_support: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub preparation: Option<i16>,

    #[validate(length(min = 1, max = 20000, message = "Review body must not be empty"))]
    pub body: String,

    pub is_recommended: Option<bool>,
    pub is_pairable: Option<bool>,
    pub has_group_projects: Option<bool>,
    pub has_writing_assignments: Option<bool>,
    pub has_exams_quizzes: Option<bool>,
    pub has_mandatory_readings: Option<bool>,
    pub has_provided_dev_env: Option<bool>,

    #[validate(range(min = 0, max = 50))]
    pub oms_courses_taken: Option<i32>,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub programming_languages: Vec<String>,

    #[validate(length(max = 64))]
    pub reviewer_program: Option<String>,

    #[validate(length(max = 128))]
    pub reviewer_specialization: Option<String>,
}

/// Request payload for editing a review. Course and reviewer are fixed.
///
/// Omitted fields are kept. Optional review fields can be cleared by sending
/// an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 2014, max = 2100))]
    pub year: Option<i32>,

    pub semester: Option<Semester>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub workload: Option<f64>,

    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub overall: Option<i16>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i16>)]
    #[validate(range(min = 1, max = 5))]
    pub staff_support: Option<Option<i16>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i16>)]
    #[validate(range(min = 1, max = 5))]
    pub preparation: Option<Option<i16>>,

    #[validate(length(min = 1, max = 20000))]
    pub body: Option<String>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub is_recommended: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub is_pairable: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub has_group_projects: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub has_writing_assignments: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub has_exams_quizzes: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub has_mandatory_readings: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<bool>)]
    pub has_provided_dev_env: Option<Option<bool>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i32>)]
    #[validate(range(min = 0, max = 50))]
    pub oms_courses_taken: Option<Option<i32>>,

    #[validate(length(max = 20))]
    pub programming_languages: Option<Vec<String>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 64))]
    pub reviewer_program: Option<Option<String>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 128))]
    pub reviewer_specialization: Option<Option<String>>,
}

/// Keeps an explicit `null` apart from an absent field: absent is `None`,
/// `null` is `Some(None)`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RecentReviewsFilter {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    /// Case-insensitive substring matched against the review body
    pub query: Option<String>,
}

fn default_limit() -> u32 {
    PaginationParams::default().limit
}

impl Default for RecentReviewsFilter {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            query: None,
        }
    }
}

impl RecentReviewsFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()?;

        if let Some(ref query) = self.query {
            if query.len() > 200 {
                return Err("query must be at most 200 characters".to_string());
            }
        }

        Ok(())
    }

    /// Normalized search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CourseReviewsFilter {
    pub year: Option<i32>,
    pub semester: Option<Semester>,
}

impl CreateReviewRequest {
    /// Builds the stored review for `reviewer_id`, stamped with `now`
    pub fn into_review(self, reviewer_id: Uuid, now: DateTime<Utc>) -> Review {
        Review {
            review_id: Uuid::new_v4(),
            course_id: self.course_id,
            reviewer_id,
            year: self.year,
            semester: self.semester,
            created_at: now,
            modified_at: None,
            workload: self.workload,
            difficulty: self.difficulty,
            overall: self.overall,
            staff_support: self.staff_support,
            preparation: self.preparation,
            body: self.body,
            is_recommended: self.is_recommended,
            is_pairable: self.is_pairable,
            has_group_projects: self.has_group_projects,
            has_writing_assignments: self.has_writing_assignments,
            has_exams_quizzes: self.has_exams_quizzes,
            has_mandatory_readings: self.has_mandatory_readings,
            has_provided_dev_env: self.has_provided_dev_env,
            oms_courses_taken: self.oms_courses_taken,
            programming_languages: self.programming_languages,
            reviewer_program: self.reviewer_program,
            reviewer_specialization: self.reviewer_specialization,
        }
    }
}

impl UpdateReviewRequest {
    /// Returns `existing` with every provided field replaced, stamped as modified at `now`
    pub fn apply_to(&self, existing: &Review, now: DateTime<Utc>) -> Review {
        Review {
            year: self.year.unwrap_or(existing.year),
            semester: self.semester.unwrap_or(existing.semester),
            modified_at: Some(now),
            workload: self.workload.unwrap_or(existing.workload),
            difficulty: self.difficulty.unwrap_or(existing.difficulty),
            overall: self.overall.unwrap_or(existing.overall),
            staff_support: self.staff_support.unwrap_or(existing.staff_support),
            preparation: self.preparation.unwrap_or(existing.preparation),
            body: self.body.clone().unwrap_or_else(|| existing.body.clone()),
            is_recommended: self.is_recommended.unwrap_or(existing.is_recommended),
            is_pairable: self.is_pairable.unwrap_or(existing.is_pairable),
            has_group_projects: self.has_group_projects.unwrap_or(existing.has_group_projects),
            has_writing_assignments: self
                .has_writing_assignments
                .unwrap_or(existing.has_writing_assignments),
            has_exams_quizzes: self.has_exams_quizzes.unwrap_or(existing.has_exams_quizzes),
            has_mandatory_readings: self
                .has_mandatory_readings
                .unwrap_or(existing.has_mandatory_readings),
            has_provided_dev_env: self.has_provided_dev_env.unwrap_or(existing.has_provided_dev_env),
            oms_courses_taken: self.oms_courses_taken.unwrap_or(existing.oms_courses_taken),
            programming_languages: self
                .programming_languages
                .clone()
                .unwrap_or_else(|| existing.programming_languages.clone()),
            reviewer_program: self
                .reviewer_program
                .clone()
                .unwrap_or_else(|| existing.reviewer_program.clone()),
            reviewer_specialization: self
                .reviewer_specialization
                .clone()
                .unwrap_or_else(|| existing.reviewer_specialization.clone()),
            ..existing.clone()
        }
    }
}
