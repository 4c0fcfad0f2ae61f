use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::ReviewStore;
use crate::Database;
use crate::dto::review::{CourseReviewsFilter, RecentReviewsFilter};
use crate::error::{Result, StorageError};
use crate::models::{Review, Semester};

const REVIEW_COLUMNS: &str = r#"
    review_id, course_id, reviewer_id, year, semester, created_at, modified_at,
    workload, difficulty, overall, staff_support, preparation, body,
    is_recommended, is_pairable, has_group_projects, has_writing_assignments,
    has_exams_quizzes, has_mandatory_readings, has_provided_dev_env,
    oms_courses_taken, programming_languages, reviewer_program, reviewer_specialization
"#;

#[derive(FromRow)]
struct ReviewRow {
    review_id: Uuid,
    course_id: String,
    reviewer_id: Uuid,
    year: i32,
    semester: String,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
    workload: f64,
    difficulty: i16,
    overall: i16,
    staff_support: Option<i16>,
    preparation: Option<i16>,
    body: String,
    is_recommended: Option<bool>,
    is_pairable: Option<bool>,
    has_group_projects: Option<bool>,
    has_writing_assignments: Option<bool>,
    has_exams_quizzes: Option<bool>,
    has_mandatory_readings: Option<bool>,
    has_provided_dev_env: Option<bool>,
    oms_courses_taken: Option<i32>,
    programming_languages: Vec<String>,
    reviewer_program: Option<String>,
    reviewer_specialization: Option<String>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = StorageError;

    fn try_from(row: ReviewRow) -> Result<Self> {
        let semester: Semester = row
            .semester
            .parse()
            .map_err(|e| StorageError::InvalidRecord(format!("review {}: {}", row.review_id, e)))?;

        Ok(Review {
            review_id: row.review_id,
            course_id: row.course_id,
            reviewer_id: row.reviewer_id,
            year: row.year,
            semester,
            created_at: row.created_at,
            modified_at: row.modified_at,
            workload: row.workload,
            difficulty: row.difficulty,
            overall: row.overall,
            staff_support: row.staff_support,
            preparation: row.preparation,
            body: row.body,
            is_recommended: row.is_recommended,
            is_pairable: row.is_pairable,
            has_group_projects: row.has_group_projects,
            has_writing_assignments: row.has_writing_assignments,
            has_exams_quizzes: row.has_exams_quizzes,
            has_mandatory_readings: row.has_mandatory_readings,
            has_provided_dev_env: row.has_provided_dev_env,
            oms_courses_taken: row.oms_courses_taken,
            programming_languages: row.programming_languages,
            reviewer_program: row.reviewer_program,
            reviewer_specialization: row.reviewer_specialization,
        })
    }
}

fn into_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>> {
    rows.into_iter().map(Review::try_from).collect()
}

/// Escapes LIKE wildcards so the search term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!("SELECT {REVIEW_COLUMNS} FROM reviews"))
            .fetch_all(self.pool)
            .await?;

        into_reviews(rows)
    }

    pub async fn find_by_id(&self, review_id: Uuid) -> Result<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1"
        ))
        .bind(review_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Review::try_from(row)
    }

    pub async fn list_for_course(
        &self,
        course_id: &str,
        filter: &CourseReviewsFilter,
    ) -> Result<Vec<Review>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE course_id = "));
        query.push_bind(course_id);

        if let Some(year) = filter.year {
            query.push(" AND year = ");
            query.push_bind(year);
        }

        if let Some(semester) = filter.semester {
            query.push(" AND semester = ");
            query.push_bind(semester.as_str());
        }

        query.push(" ORDER BY created_at DESC");

        let rows: Vec<ReviewRow> = query.build_query_as().fetch_all(self.pool).await?;

        into_reviews(rows)
    }

    pub async fn list_for_reviewer(&self, reviewer_id: Uuid) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE reviewer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(reviewer_id)
        .fetch_all(self.pool)
        .await?;

        into_reviews(rows)
    }

    pub async fn list_recent(&self, filter: &RecentReviewsFilter) -> Result<(Vec<Review>, i64)> {
        let total = self.count_recent(filter).await?;

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE 1=1"));

        if let Some(term) = filter.search_term() {
            query.push(" AND body ILIKE ");
            query.push_bind(like_pattern(term));
        }

        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(i64::from(filter.limit));
        query.push(" OFFSET ");
        query.push_bind(i64::from(filter.offset));

        let rows: Vec<ReviewRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok((into_reviews(rows)?, total))
    }

    async fn count_recent(&self, filter: &RecentReviewsFilter) -> Result<i64> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM reviews WHERE 1=1");

        if let Some(term) = filter.search_term() {
            query.push(" AND body ILIKE ");
            query.push_bind(like_pattern(term));
        }

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn insert(&self, review: &Review) -> Result<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            INSERT INTO reviews (
                review_id, course_id, reviewer_id, year, semester, created_at, modified_at,
                workload, difficulty, overall, staff_support, preparation, body,
                is_recommended, is_pairable, has_group_projects, has_writing_assignments,
                has_exams_quizzes, has_mandatory_readings, has_provided_dev_env,
                oms_courses_taken, programming_languages, reviewer_program, reviewer_specialization
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(review.review_id)
        .bind(&review.course_id)
        .bind(review.reviewer_id)
        .bind(review.year)
        .bind(review.semester.as_str())
        .bind(review.created_at)
        .bind(review.modified_at)
        .bind(review.workload)
        .bind(review.difficulty)
        .bind(review.overall)
        .bind(review.staff_support)
        .bind(review.preparation)
        .bind(&review.body)
        .bind(review.is_recommended)
        .bind(review.is_pairable)
        .bind(review.has_group_projects)
        .bind(review.has_writing_assignments)
        .bind(review.has_exams_quizzes)
        .bind(review.has_mandatory_readings)
        .bind(review.has_provided_dev_env)
        .bind(review.oms_courses_taken)
        .bind(&review.programming_languages)
        .bind(&review.reviewer_program)
        .bind(&review.reviewer_specialization)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).with_constraint_context("Review"))?;

        Review::try_from(row)
    }

    /// Overwrite the mutable fields of an existing review
    pub async fn update(&self, review: &Review) -> Result<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            UPDATE reviews
            SET year = $2,
                semester = $3,
                modified_at = $4,
                workload = $5,
                difficulty = $6,
                overall = $7,
                staff_support = $8,
                preparation = $9,
                body = $10,
                is_recommended = $11,
                is_pairable = $12,
                has_group_projects = $13,
                has_writing_assignments = $14,
                has_exams_quizzes = $15,
                has_mandatory_readings = $16,
                has_provided_dev_env = $17,
                oms_courses_taken = $18,
                programming_languages = $19,
                reviewer_program = $20,
                reviewer_specialization = $21
            WHERE review_id = $1
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(review.review_id)
        .bind(review.year)
        .bind(review.semester.as_str())
        .bind(review.modified_at)
        .bind(review.workload)
        .bind(review.difficulty)
        .bind(review.overall)
        .bind(review.staff_support)
        .bind(review.preparation)
        .bind(&review.body)
        .bind(review.is_recommended)
        .bind(review.is_pairable)
        .bind(review.has_group_projects)
        .bind(review.has_writing_assignments)
        .bind(review.has_exams_quizzes)
        .bind(review.has_mandatory_readings)
        .bind(review.has_provided_dev_env)
        .bind(review.oms_courses_taken)
        .bind(&review.programming_languages)
        .bind(&review.reviewer_program)
        .bind(&review.reviewer_specialization)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Review::try_from(row)
    }

    pub async fn delete(&self, review_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl ReviewStore for Database {
    async fn list_all_reviews(&self) -> Result<Vec<Review>> {
        ReviewRepository::new(self.pool()).list_all().await
    }

    async fn find_review(&self, review_id: Uuid) -> Result<Review> {
        ReviewRepository::new(self.pool()).find_by_id(review_id).await
    }

    async fn list_course_reviews(
        &self,
        course_id: &str,
        filter: &CourseReviewsFilter,
    ) -> Result<Vec<Review>> {
        ReviewRepository::new(self.pool())
            .list_for_course(course_id, filter)
            .await
    }

    async fn list_user_reviews(&self, reviewer_id: Uuid) -> Result<Vec<Review>> {
        ReviewRepository::new(self.pool())
            .list_for_reviewer(reviewer_id)
            .await
    }

    async fn list_recent_reviews(&self, filter: &RecentReviewsFilter) -> Result<(Vec<Review>, i64)> {
        ReviewRepository::new(self.pool()).list_recent(filter).await
    }

    async fn insert_review(&self, review: &Review) -> Result<Review> {
        ReviewRepository::new(self.pool()).insert(review).await
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        ReviewRepository::new(self.pool()).update(review).await
    }

    async fn delete_review(&self, review_id: Uuid) -> Result<()> {
        ReviewRepository::new(self.pool()).delete(review_id).await
    }
}
