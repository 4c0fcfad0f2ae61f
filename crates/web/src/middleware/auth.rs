use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::session::SessionError;
use crate::state::AppState;

/// Resolves the bearer token to an [`AuthUser`](crate::session::AuthUser) and
/// stores it in the request extensions.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .ok_or(WebError::Unauthorized)?;

    let user = state.sessions.verify(&token).await.map_err(|e| match e {
        SessionError::InvalidToken => {
            tracing::warn!("Rejected invalid session token");
            WebError::Unauthorized
        }
        SessionError::Provider(msg) => WebError::InternalServerError(msg),
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Users allowed to delete reviews they do not own
#[derive(Clone, Default)]
pub struct Moderators {
    ids: Arc<HashSet<Uuid>>,
}

impl Moderators {
    pub fn from_comma_separated(ids_str: &str) -> Self {
        let ids = ids_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match s.parse::<Uuid>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!("Ignoring malformed moderator id: {}", s);
                    None
                }
            })
            .collect();

        Self { ids: Arc::new(ids) }
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.ids.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderators_parsed_from_list() {
        let id = Uuid::new_v4();
        let moderators = Moderators::from_comma_separated(&format!(" {} , not-a-uuid,,", id));

        assert!(moderators.contains(id));
        assert!(!moderators.contains(Uuid::new_v4()));
    }
}
