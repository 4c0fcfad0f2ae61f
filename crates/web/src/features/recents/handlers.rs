use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::models::Review;
use utoipa::IntoParams;

use crate::error::WebError;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct WindowQuery {
    /// At most this many reviews; capped at the window size
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/recents",
    params(WindowQuery),
    responses(
        (status = 200, description = "Newest reviews across all courses", body = Vec<Review>)
    ),
    tag = "recents"
)]
pub async fn get_recents(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Response, WebError> {
    let window = state.recents.read().await;
    let limit = query.limit.unwrap_or(window.size).min(window.size);

    Ok(Json(window.latest(limit).to_vec()).into_response())
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/recents",
    params(
        ("course_id" = String, Path, description = "Course id, e.g. CS-6200"),
        WindowQuery
    ),
    responses(
        (status = 200, description = "Newest reviews for the course", body = Vec<Review>)
    ),
    tag = "recents"
)]
pub async fn get_course_recents(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Response, WebError> {
    let window = state.recents.read().await;
    let limit = query.limit.unwrap_or(window.size).min(window.size);

    Ok(Json(window.latest_for_course(&course_id, limit).to_vec()).into_response())
}
