use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use storage::models::Course;
use storage::services::payload::{SortField, SortValue};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_id: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub program_id: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterInfo {
    pub semester_id: String,
    /// 1 spring, 2 summer, 3 fall
    pub term: u8,
    pub name: String,
}

/// A course entry as published in the static catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCourse {
    pub course_id: String,
    pub name: String,
    pub department_id: String,
    pub course_number: String,
    pub url: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub is_foundational: bool,
    #[serde(default)]
    pub is_deprecated: bool,
}

impl From<CatalogCourse> for Course {
    fn from(course: CatalogCourse) -> Self {
        Self {
            course_id: course.course_id,
            name: course.name,
            department_id: course.department_id,
            course_number: course.course_number,
            url: course.url,
            aliases: course.aliases,
            is_foundational: course.is_foundational,
            is_deprecated: course.is_deprecated,
        }
    }
}

impl SortField for Department {
    fn sort_value(&self, field: &str) -> Option<SortValue<'_>> {
        match field {
            "department_id" => Some(SortValue::Text(Cow::Borrowed(&self.department_id))),
            "name" => Some(SortValue::Text(Cow::Borrowed(&self.name))),
            _ => None,
        }
    }
}

impl SortField for Program {
    fn sort_value(&self, field: &str) -> Option<SortValue<'_>> {
        match field {
            "program_id" => Some(SortValue::Text(Cow::Borrowed(&self.program_id))),
            "name" => Some(SortValue::Text(Cow::Borrowed(&self.name))),
            _ => None,
        }
    }
}

impl SortField for SemesterInfo {
    fn sort_value(&self, field: &str) -> Option<SortValue<'_>> {
        match field {
            "semester_id" => Some(SortValue::Text(Cow::Borrowed(&self.semester_id))),
            "term" => Some(SortValue::Number(f64::from(self.term))),
            "name" => Some(SortValue::Text(Cow::Borrowed(&self.name))),
            _ => None,
        }
    }
}
