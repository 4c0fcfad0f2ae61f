use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{create_user, get_me, list_my_reviews};
use crate::middleware::auth::require_user;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/me", get(get_me))
        .route("/me/reviews", get(list_my_reviews))
        .route_layer(middleware::from_fn_with_state(state, require_user))
}
