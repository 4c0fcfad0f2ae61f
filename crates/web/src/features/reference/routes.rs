use axum::{Router, routing::get};

use super::handlers::{list_departments, list_programs, list_semesters};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments))
        .route("/programs", get(list_programs))
        .route("/semesters", get(list_semesters))
}
