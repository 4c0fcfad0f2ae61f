use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Course;
use crate::services::payload::SortDirection;

/// Fields accepted by the `sort` parameter of the course listing
pub const SORTABLE_COURSE_FIELDS: &[&str] = &[
    "course_id",
    "name",
    "department_id",
    "review_count",
    "avg_workload",
    "avg_difficulty",
    "avg_overall",
    "avg_staff_support",
];

/// Per-course statistics derived from the review set.
///
/// Means are `None` when no review carries the value, so "no data" is never
/// reported as a zero rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseStats {
    pub course_id: String,
    pub review_count: u32,
    pub avg_workload: Option<f64>,
    pub avg_difficulty: Option<f64>,
    pub avg_overall: Option<f64>,
    pub avg_staff_support: Option<f64>,
    /// year -> semester term (1 spring, 2 summer, 3 fall) -> review count
    #[schema(value_type = Object)]
    pub reviews_by_term: BTreeMap<i32, BTreeMap<u8, u32>>,
}

impl CourseStats {
    pub fn empty(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            review_count: 0,
            avg_workload: None,
            avg_difficulty: None,
            avg_overall: None,
            avg_staff_support: None,
            reviews_by_term: BTreeMap::new(),
        }
    }

    /// Rounds every mean to two decimals for display
    pub fn rounded(self) -> Self {
        Self {
            avg_workload: self.avg_workload.map(round_2dp),
            avg_difficulty: self.avg_difficulty.map(round_2dp),
            avg_overall: self.avg_overall.map(round_2dp),
            avg_staff_support: self.avg_staff_support.map(round_2dp),
            ..self
        }
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Static course fields merged with the derived statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseWithStats {
    #[serde(flatten)]
    pub course: Course,
    pub stats: CourseStats,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CourseListFilter {
    /// One of the sortable course fields
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortDirection,
}

impl CourseListFilter {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref sort) = self.sort {
            if !SORTABLE_COURSE_FIELDS.contains(&sort.as_str()) {
                return Err(format!(
                    "sort must be one of: {}",
                    SORTABLE_COURSE_FIELDS.join(", ")
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_keeps_missing_means() {
        let stats = CourseStats {
            avg_workload: Some(12.3456),
            avg_difficulty: Some(10.0 / 3.0),
            ..CourseStats::empty("CS-6200")
        }
        .rounded();

        assert_eq!(stats.avg_workload, Some(12.35));
        assert_eq!(stats.avg_difficulty, Some(3.33));
        assert_eq!(stats.avg_overall, None);
    }

    #[test]
    fn test_filter_rejects_unknown_sort_field() {
        let filter = CourseListFilter {
            sort: Some("password".to_string()),
            order: SortDirection::Asc,
        };
        assert!(filter.validate().is_err());

        let filter = CourseListFilter {
            sort: Some("avg_overall".to_string()),
            order: SortDirection::Desc,
        };
        assert!(filter.validate().is_ok());
    }
}
