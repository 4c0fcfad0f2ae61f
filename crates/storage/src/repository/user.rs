use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::Database;
use crate::error::{Result, StorageError};
use crate::models::User;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, has_gt_email, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn create(&self, user: &User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, has_gt_email, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, email, has_gt_email, created_at
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(user.has_gt_email)
        .bind(user.created_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).with_constraint_context("User"))?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for Database {
    async fn find_user(&self, user_id: Uuid) -> Result<User> {
        UserRepository::new(self.pool()).find_by_id(user_id).await
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        UserRepository::new(self.pool()).create(user).await
    }
}
