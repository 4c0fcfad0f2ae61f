use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::models::{Review, User};

use crate::error::WebError;
use crate::session::AuthUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile of the caller", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile yet")
    ),
    tag = "users"
)]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let profile = services::get_profile(state.store.as_ref(), &user).await?;

    Ok(Json(profile).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Profile created", body = User),
        (status = 400, description = "Session carries no email address"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Profile already exists")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let profile = services::create_profile(state.store.as_ref(), &user).await?;

    Ok((StatusCode::CREATED, Json(profile)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/me/reviews",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Reviews written by the caller", body = Vec<Review>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn list_my_reviews(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let reviews = services::list_own_reviews(state.store.as_ref(), &user).await?;

    Ok(Json(reviews).into_response())
}
