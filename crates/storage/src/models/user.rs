use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

const GT_EMAIL_DOMAIN: &str = "@gatech.edu";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub has_gt_email: bool,
    pub created_at: DateTime<Utc>,
}

/// True when the address belongs to the Georgia Tech institutional domain.
pub fn is_gt_email(email: &str) -> bool {
    let email = email.trim().to_lowercase();
    match email.strip_suffix(GT_EMAIL_DOMAIN) {
        Some(local) => !local.is_empty() && !local.contains('@'),
        None => false,
    }
}
