use std::time::Duration;

use storage::services::recency::RecencyWindow;
use tokio::task::JoinHandle;

use crate::error::WebResult;
use crate::state::AppState;

/// Rebuilds the recency window from the full review set and swaps it in.
/// Returns the number of reviews in the new window.
///
/// Rebuilds run one at a time: a rebuild that starts after a mutation always
/// swaps in after any older snapshot still in flight.
pub async fn rebuild(state: &AppState) -> WebResult<usize> {
    let _guard = state.rebuild_guard.lock().await;

    let reviews = state.store.list_all_reviews().await?;

    let (size, buffer) = {
        let window = state.recents.read().await;
        (window.size, window.buffer)
    };

    let window = RecencyWindow::rebuild(reviews, size, buffer);
    let retained = window.reviews.len();
    *state.recents.write().await = window;

    Ok(retained)
}

/// Rebuild after a review was created, edited or deleted. Failures only delay
/// the feed until the next periodic rebuild.
pub async fn refresh_after_mutation(state: &AppState) {
    if let Err(e) = rebuild(state).await {
        tracing::warn!("Recency window rebuild after mutation failed: {}", e);
    }
}

/// Rebuilds the window immediately and then every `every`
pub fn spawn(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match rebuild(&state).await {
                Ok(retained) => tracing::debug!("Recency window rebuilt with {} reviews", retained),
                Err(e) => tracing::error!("Recency window rebuild failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use catalog::CatalogClient;
    use storage::{
        dto::review::{CourseReviewsFilter, RecentReviewsFilter},
        models::{Course, Review, User},
        repository::{CourseStore, ReviewStore, UserStore, memory::MemoryStore},
        test_fixtures,
    };
    use tokio::sync::Notify;
    use uuid::Uuid;

    use super::*;
    use crate::middleware::auth::Moderators;
    use crate::session::testing::StaticSessions;

    /// Memory store whose first full read stalls after taking its snapshot
    struct SlowFirstSnapshot {
        inner: MemoryStore,
        stalled: AtomicBool,
        snapshot_taken: Notify,
    }

    #[async_trait]
    impl ReviewStore for SlowFirstSnapshot {
        async fn list_all_reviews(&self) -> storage::Result<Vec<Review>> {
            let snapshot = self.inner.list_all_reviews().await?;
            if !self.stalled.swap(true, Ordering::SeqCst) {
                self.snapshot_taken.notify_one();
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Ok(snapshot)
        }

        async fn find_review(&self, review_id: Uuid) -> storage::Result<Review> {
            self.inner.find_review(review_id).await
        }

        async fn list_course_reviews(
            &self,
            course_id: &str,
            filter: &CourseReviewsFilter,
        ) -> storage::Result<Vec<Review>> {
            self.inner.list_course_reviews(course_id, filter).await
        }

        async fn list_user_reviews(&self, reviewer_id: Uuid) -> storage::Result<Vec<Review>> {
            self.inner.list_user_reviews(reviewer_id).await
        }

        async fn list_recent_reviews(
            &self,
            filter: &RecentReviewsFilter,
        ) -> storage::Result<(Vec<Review>, i64)> {
            self.inner.list_recent_reviews(filter).await
        }

        async fn insert_review(&self, review: &Review) -> storage::Result<Review> {
            self.inner.insert_review(review).await
        }

        async fn update_review(&self, review: &Review) -> storage::Result<Review> {
            self.inner.update_review(review).await
        }

        async fn delete_review(&self, review_id: Uuid) -> storage::Result<()> {
            self.inner.delete_review(review_id).await
        }
    }

    #[async_trait]
    impl CourseStore for SlowFirstSnapshot {
        async fn list_courses(&self) -> storage::Result<Vec<Course>> {
            self.inner.list_courses().await
        }

        async fn find_course(&self, course_id: &str) -> storage::Result<Course> {
            self.inner.find_course(course_id).await
        }

        async fn upsert_course(&self, course: &Course) -> storage::Result<Course> {
            self.inner.upsert_course(course).await
        }
    }

    #[async_trait]
    impl UserStore for SlowFirstSnapshot {
        async fn find_user(&self, user_id: Uuid) -> storage::Result<User> {
            self.inner.find_user(user_id).await
        }

        async fn create_user(&self, user: &User) -> storage::Result<User> {
            self.inner.create_user(user).await
        }
    }

    fn state_over(store: Arc<SlowFirstSnapshot>) -> AppState {
        let catalog = CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(60)).unwrap();

        AppState::new(
            store,
            Arc::new(StaticSessions::default()),
            Arc::new(catalog),
            Moderators::default(),
            5,
            2,
        )
    }

    #[tokio::test]
    async fn test_slow_periodic_rebuild_does_not_hide_new_review() {
        let store = Arc::new(SlowFirstSnapshot {
            inner: MemoryStore::with_courses([test_fixtures::course("CS-6200")]),
            stalled: AtomicBool::new(false),
            snapshot_taken: Notify::new(),
        });
        let state = state_over(store.clone());

        let tick = tokio::spawn({
            let state = state.clone();
            async move { rebuild(&state).await }
        });
        store.snapshot_taken.notified().await;

        let review = store
            .insert_review(&test_fixtures::review("CS-6200", 1))
            .await
            .unwrap();
        refresh_after_mutation(&state).await;
        tick.await.unwrap().unwrap();

        let window = state.recents.read().await;
        assert_eq!(window.reviews.len(), 1);
        assert_eq!(window.reviews[0].review_id, review.review_id);
    }

    #[tokio::test]
    async fn test_rebuild_drops_deleted_review() {
        let store = Arc::new(SlowFirstSnapshot {
            inner: MemoryStore::with_courses([test_fixtures::course("CS-6200")]),
            stalled: AtomicBool::new(true),
            snapshot_taken: Notify::new(),
        });
        let state = state_over(store.clone());
        let review = store
            .insert_review(&test_fixtures::review("CS-6200", 1))
            .await
            .unwrap();

        assert_eq!(rebuild(&state).await.unwrap(), 1);

        store.delete_review(review.review_id).await.unwrap();
        refresh_after_mutation(&state).await;

        assert!(state.recents.read().await.reviews.is_empty());
        assert!(state.recents.read().await.latest_for_course("CS-6200", 5).is_empty());
    }
}
