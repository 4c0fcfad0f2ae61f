use chrono::Utc;
use storage::{
    Store,
    models::{Review, User, is_gt_email},
};

use crate::error::{WebError, WebResult};
use crate::session::AuthUser;

pub async fn get_profile(store: &dyn Store, caller: &AuthUser) -> WebResult<User> {
    Ok(store.find_user(caller.user_id).await?)
}

/// Create the caller's profile from their session
pub async fn create_profile(store: &dyn Store, caller: &AuthUser) -> WebResult<User> {
    let email = caller
        .email
        .clone()
        .ok_or_else(|| WebError::BadRequest("Session has no email address".to_string()))?;

    let user = User {
        user_id: caller.user_id,
        has_gt_email: is_gt_email(&email),
        email,
        created_at: Utc::now(),
    };

    let created = store.create_user(&user).await?;
    tracing::info!(user_id = %created.user_id, has_gt_email = created.has_gt_email, "User profile created");

    Ok(created)
}

/// The caller's own reviews, newest first
pub async fn list_own_reviews(store: &dyn Store, caller: &AuthUser) -> WebResult<Vec<Review>> {
    Ok(store.list_user_reviews(caller.user_id).await?)
}
