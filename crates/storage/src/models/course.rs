use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Static course fields, sourced from the catalog repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub course_id: String,
    pub name: String,
    pub department_id: String,
    pub course_number: String,
    pub url: Option<String>,
    pub aliases: Vec<String>,
    pub is_foundational: bool,
    pub is_deprecated: bool,
}
