use async_trait::async_trait;
use sqlx::PgPool;

use super::CourseStore;
use crate::Database;
use crate::error::{Result, StorageError};
use crate::models::Course;

const COURSE_COLUMNS: &str = r#"
    course_id, name, department_id, course_number, url, aliases, is_foundational, is_deprecated
"#;

pub struct CourseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CourseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all courses ordered by course id
    pub async fn list(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY course_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn find_by_id(&self, course_id: &str) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = $1"
        ))
        .bind(course_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(course)
    }

    /// Insert a course or refresh its static fields
    pub async fn upsert(&self, course: &Course) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses (course_id, name, department_id, course_number, url, aliases,
                                 is_foundational, is_deprecated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (course_id) DO UPDATE
            SET name = EXCLUDED.name,
                department_id = EXCLUDED.department_id,
                course_number = EXCLUDED.course_number,
                url = EXCLUDED.url,
                aliases = EXCLUDED.aliases,
                is_foundational = EXCLUDED.is_foundational,
                is_deprecated = EXCLUDED.is_deprecated
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(&course.course_id)
        .bind(&course.name)
        .bind(&course.department_id)
        .bind(&course.course_number)
        .bind(&course.url)
        .bind(&course.aliases)
        .bind(course.is_foundational)
        .bind(course.is_deprecated)
        .fetch_one(self.pool)
        .await?;

        Ok(course)
    }
}

#[async_trait]
impl CourseStore for Database {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        CourseRepository::new(self.pool()).list().await
    }

    async fn find_course(&self, course_id: &str) -> Result<Course> {
        CourseRepository::new(self.pool()).find_by_id(course_id).await
    }

    async fn upsert_course(&self, course: &Course) -> Result<Course> {
        CourseRepository::new(self.pool()).upsert(course).await
    }
}
