use axum::{Router, routing::get};

use super::handlers::{get_course, get_course_stats, list_course_reviews, list_courses};
use crate::features::recents::handlers::get_course_recents;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/stats", get(get_course_stats))
        .route("/:course_id", get(get_course))
        .route("/:course_id/reviews", get(list_course_reviews))
        .route("/:course_id/recents", get(get_course_recents))
}
