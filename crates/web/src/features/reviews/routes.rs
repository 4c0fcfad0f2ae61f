use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{create_review, delete_review, get_review, list_recent_reviews, update_review};
use crate::middleware::auth::require_user;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_review))
        .route("/:review_id", put(update_review))
        .route("/:review_id", delete(delete_review))
        .route_layer(middleware::from_fn_with_state(state, require_user));

    Router::new()
        .route("/recent", get(list_recent_reviews))
        .route("/:review_id", get(get_review))
        .merge(protected)
}
