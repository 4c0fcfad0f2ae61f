use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        common::PaginatedResponse,
        review::{CreateReviewRequest, RecentReviewsFilter, UpdateReviewRequest},
    },
    models::Review,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::recents::refresher;
use crate::session::AuthUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/reviews/recent",
    params(RecentReviewsFilter),
    responses(
        (status = 200, description = "Newest reviews, optionally filtered by body text", body = PaginatedResponse<Review>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "reviews"
)]
pub async fn list_recent_reviews(
    State(state): State<AppState>,
    Query(filter): Query<RecentReviewsFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let (reviews, total) = services::list_recent_reviews(state.store.as_ref(), &filter).await?;

    let response = PaginatedResponse::new(reviews, filter.offset, filter.limit, total);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let review = services::get_review(state.store.as_ref(), review_id).await?;

    Ok(Json(review).into_response())
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Validation error or unknown course"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let review = services::create_review(state.store.as_ref(), &user, req).await?;
    refresher::refresh_after_mutation(&state).await;

    Ok((StatusCode::CREATED, Json(review)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    request_body = UpdateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Review belongs to another user"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<Uuid>,
    Json(update_req): Json<UpdateReviewRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated =
        services::update_review(state.store.as_ref(), &user, review_id, &update_req).await?;
    refresher::refresh_after_mutation(&state).await;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Review belongs to another user"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_review(state.store.as_ref(), &state.moderators, &user, review_id).await?;
    refresher::refresh_after_mutation(&state).await;

    Ok(StatusCode::NO_CONTENT.into_response())
}
