use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        course::{CourseListFilter, CourseStats, CourseWithStats},
        review::CourseReviewsFilter,
    },
    models::Review,
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseListFilter),
    responses(
        (status = 200, description = "Course catalog with review statistics", body = Vec<CourseWithStats>),
        (status = 400, description = "Unknown sort field")
    ),
    tag = "courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseListFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let courses = services::list_courses(state.store.as_ref(), &filter).await?;

    Ok(Json(courses).into_response())
}

#[utoipa::path(
    get,
    path = "/api/courses/stats",
    responses(
        (status = 200, description = "Review statistics keyed by course id", body = std::collections::BTreeMap<String, CourseStats>)
    ),
    tag = "courses"
)]
pub async fn get_course_stats(State(state): State<AppState>) -> Result<Response, WebError> {
    let stats = services::course_stats(state.store.as_ref()).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    params(
        ("course_id" = String, Path, description = "Course id, e.g. CS-6200")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseWithStats),
        (status = 404, description = "Course not found")
    ),
    tag = "courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Response, WebError> {
    let course = services::get_course(state.store.as_ref(), &course_id).await?;

    Ok(Json(course).into_response())
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/reviews",
    params(
        ("course_id" = String, Path, description = "Course id, e.g. CS-6200"),
        CourseReviewsFilter
    ),
    responses(
        (status = 200, description = "Reviews for the course, newest first", body = Vec<Review>),
        (status = 404, description = "Course not found")
    ),
    tag = "courses"
)]
pub async fn list_course_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(filter): Query<CourseReviewsFilter>,
) -> Result<Response, WebError> {
    let reviews =
        services::list_course_reviews(state.store.as_ref(), &course_id, &filter).await?;

    Ok(Json(reviews).into_response())
}
