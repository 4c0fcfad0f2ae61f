//! Builders for reviews and courses shared by unit tests across the workspace.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{Course, Review, Semester};

/// Fixed point in time every fixture timestamp is derived from
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A review for `course_id` created `minutes` after [`base_time`]
pub fn review(course_id: &str, minutes: i64) -> Review {
    Review {
        review_id: Uuid::new_v4(),
        course_id: course_id.to_string(),
        reviewer_id: Uuid::new_v4(),
        year: 2023,
        semester: Semester::Fall,
        created_at: base_time() + Duration::minutes(minutes),
        modified_at: None,
        workload: 12.0,
        difficulty: 3,
        overall: 4,
        staff_support: None,
        preparation: None,
        body: format!("Review number {}", minutes),
        is_recommended: Some(true),
        is_pairable: None,
        has_group_projects: Some(false),
        has_writing_assignments: None,
        has_exams_quizzes: Some(true),
        has_mandatory_readings: None,
        has_provided_dev_env: None,
        oms_courses_taken: Some(2),
        programming_languages: vec!["C".to_string()],
        reviewer_program: Some("omscs".to_string()),
        reviewer_specialization: None,
    }
}

pub fn course(course_id: &str) -> Course {
    Course {
        course_id: course_id.to_string(),
        name: format!("Course {}", course_id),
        department_id: course_id.split('-').next().unwrap_or_default().to_string(),
        course_number: course_id.split('-').nth(1).unwrap_or_default().to_string(),
        url: None,
        aliases: vec![],
        is_foundational: false,
        is_deprecated: false,
    }
}
