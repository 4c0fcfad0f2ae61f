//! Store interfaces and their PostgreSQL implementations.

pub mod course;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod review;
pub mod user;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::review::{CourseReviewsFilter, RecentReviewsFilter};
use crate::error::Result;
use crate::models::{Course, Review, User};

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_all_reviews(&self) -> Result<Vec<Review>>;

    async fn find_review(&self, review_id: Uuid) -> Result<Review>;

    /// Reviews of one course, newest first
    async fn list_course_reviews(
        &self,
        course_id: &str,
        filter: &CourseReviewsFilter,
    ) -> Result<Vec<Review>>;

    /// Reviews written by one user, newest first
    async fn list_user_reviews(&self, reviewer_id: Uuid) -> Result<Vec<Review>>;

    /// One page of reviews, newest first, plus the total number of matches
    async fn list_recent_reviews(&self, filter: &RecentReviewsFilter) -> Result<(Vec<Review>, i64)>;

    async fn insert_review(&self, review: &Review) -> Result<Review>;

    async fn update_review(&self, review: &Review) -> Result<Review>;

    async fn delete_review(&self, review_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>>;

    async fn find_course(&self, course_id: &str) -> Result<Course>;

    async fn upsert_course(&self, course: &Course) -> Result<Course>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<User>;

    async fn create_user(&self, user: &User) -> Result<User>;
}

/// Everything the service needs from persistence
pub trait Store: ReviewStore + CourseStore + UserStore {}

impl<T: ReviewStore + CourseStore + UserStore> Store for T {}
