//! In-process store used by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CourseStore, ReviewStore, UserStore};
use crate::dto::review::{CourseReviewsFilter, RecentReviewsFilter};
use crate::error::{Result, StorageError};
use crate::models::{Course, Review, User};

#[derive(Default)]
pub struct MemoryStore {
    courses: RwLock<BTreeMap<String, Course>>,
    reviews: RwLock<Vec<Review>>,
    users: RwLock<BTreeMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            courses: RwLock::new(
                courses
                    .into_iter()
                    .map(|c| (c.course_id.clone(), c))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reviews
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list_all_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.reviews.read().await.clone())
    }

    async fn find_review(&self, review_id: Uuid) -> Result<Review> {
        self.reviews
            .read()
            .await
            .iter()
            .find(|r| r.review_id == review_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_course_reviews(
        &self,
        course_id: &str,
        filter: &CourseReviewsFilter,
    ) -> Result<Vec<Review>> {
        let reviews = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|r| r.course_id == course_id)
            .filter(|r| filter.year.is_none_or(|year| r.year == year))
            .filter(|r| filter.semester.is_none_or(|semester| r.semester == semester))
            .cloned()
            .collect();

        Ok(newest_first(reviews))
    }

    async fn list_user_reviews(&self, reviewer_id: Uuid) -> Result<Vec<Review>> {
        let reviews = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|r| r.reviewer_id == reviewer_id)
            .cloned()
            .collect();

        Ok(newest_first(reviews))
    }

    async fn list_recent_reviews(&self, filter: &RecentReviewsFilter) -> Result<(Vec<Review>, i64)> {
        let term = filter.search_term().map(str::to_lowercase);
        let matching: Vec<Review> = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|r| {
                term.as_deref()
                    .is_none_or(|t| r.body.to_lowercase().contains(t))
            })
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let page = newest_first(matching)
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn insert_review(&self, review: &Review) -> Result<Review> {
        if !self.courses.read().await.contains_key(&review.course_id) {
            return Err(StorageError::ConstraintViolation(
                "Review references an unknown record".to_string(),
            ));
        }

        let mut reviews = self.reviews.write().await;
        if reviews.iter().any(|r| r.review_id == review.review_id) {
            return Err(StorageError::ConstraintViolation(
                "Review already exists".to_string(),
            ));
        }
        reviews.push(review.clone());

        Ok(review.clone())
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        let mut reviews = self.reviews.write().await;
        let existing = reviews
            .iter_mut()
            .find(|r| r.review_id == review.review_id)
            .ok_or(StorageError::NotFound)?;
        *existing = review.clone();

        Ok(review.clone())
    }

    async fn delete_review(&self, review_id: Uuid) -> Result<()> {
        let mut reviews = self.reviews.write().await;
        let before = reviews.len();
        reviews.retain(|r| r.review_id != review_id);

        if reviews.len() == before {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        Ok(self.courses.read().await.values().cloned().collect())
    }

    async fn find_course(&self, course_id: &str) -> Result<Course> {
        self.courses
            .read()
            .await
            .get(course_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_course(&self, course: &Course) -> Result<Course> {
        self.courses
            .write()
            .await
            .insert(course.course_id.clone(), course.clone());

        Ok(course.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user_id) {
            return Err(StorageError::ConstraintViolation(
                "User already exists".to_string(),
            ));
        }
        users.insert(user.user_id, user.clone());

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{course, review};

    #[tokio::test]
    async fn test_recent_reviews_paginated_and_searched() {
        let store = MemoryStore::with_courses([course("CS-6200")]);
        for n in 0..25 {
            let mut r = review("CS-6200", n);
            if n % 5 == 0 {
                r.body = format!("Exams were brutal ({})", n);
            }
            store.insert_review(&r).await.unwrap();
        }

        let filter = RecentReviewsFilter {
            limit: 10,
            offset: 20,
            query: None,
        };
        let (page, total) = store.list_recent_reviews(&filter).await.unwrap();
        assert_eq!(total, 25);
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].created_at, review("CS-6200", 4).created_at);

        let filter = RecentReviewsFilter {
            query: Some("EXAMS".to_string()),
            ..Default::default()
        };
        let (page, total) = store.list_recent_reviews(&filter).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page[0].created_at, review("CS-6200", 20).created_at);
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_course() {
        let store = MemoryStore::new();
        let result = store.insert_review(&review("CS-0000", 1)).await;

        assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_review_is_not_found() {
        let store = MemoryStore::new();
        let result = store.delete_review(Uuid::new_v4()).await;

        assert!(matches!(result, Err(StorageError::NotFound)));
    }
}
