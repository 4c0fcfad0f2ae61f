use chrono::Utc;
use storage::{
    Store,
    dto::review::{CreateReviewRequest, RecentReviewsFilter, UpdateReviewRequest},
    error::StorageError,
    models::Review,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Moderators;
use crate::session::AuthUser;

/// Get a review by id
pub async fn get_review(store: &dyn Store, review_id: Uuid) -> WebResult<Review> {
    Ok(store.find_review(review_id).await?)
}

/// Page through reviews, newest first
pub async fn list_recent_reviews(
    store: &dyn Store,
    filter: &RecentReviewsFilter,
) -> WebResult<(Vec<Review>, i64)> {
    Ok(store.list_recent_reviews(filter).await?)
}

/// Create a review authored by the caller
pub async fn create_review(
    store: &dyn Store,
    caller: &AuthUser,
    request: CreateReviewRequest,
) -> WebResult<Review> {
    match store.find_course(&request.course_id).await {
        Ok(_) => {}
        Err(StorageError::NotFound) => {
            return Err(WebError::BadRequest(format!(
                "Unknown course '{}'",
                request.course_id
            )));
        }
        Err(e) => return Err(e.into()),
    }

    let review = request.into_review(caller.user_id, Utc::now());
    let created = store.insert_review(&review).await?;

    tracing::info!(
        review_id = %created.review_id,
        course_id = %created.course_id,
        "Review created"
    );

    Ok(created)
}

/// Edit a review; only its author may do so
pub async fn update_review(
    store: &dyn Store,
    caller: &AuthUser,
    review_id: Uuid,
    request: &UpdateReviewRequest,
) -> WebResult<Review> {
    let existing = store.find_review(review_id).await?;

    if !existing.is_owned_by(caller.user_id) {
        tracing::warn!(
            review_id = %review_id,
            caller = %caller.user_id,
            "Rejected edit of a review owned by another user"
        );
        return Err(WebError::Forbidden);
    }

    let updated = request.apply_to(&existing, Utc::now());
    Ok(store.update_review(&updated).await?)
}

/// Delete a review; allowed for its author and for moderators
pub async fn delete_review(
    store: &dyn Store,
    moderators: &Moderators,
    caller: &AuthUser,
    review_id: Uuid,
) -> WebResult<()> {
    let existing = store.find_review(review_id).await?;

    let is_moderator = moderators.contains(caller.user_id);
    if !existing.is_owned_by(caller.user_id) && !is_moderator {
        tracing::warn!(
            review_id = %review_id,
            caller = %caller.user_id,
            "Rejected delete of a review owned by another user"
        );
        return Err(WebError::Forbidden);
    }

    store.delete_review(review_id).await?;

    if is_moderator && !existing.is_owned_by(caller.user_id) {
        tracing::info!(review_id = %review_id, moderator = %caller.user_id, "Review removed by moderator");
    }

    Ok(())
}
