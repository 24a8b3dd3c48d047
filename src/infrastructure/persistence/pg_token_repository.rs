//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AUTH_TOKENS_TABLE, AuthToken, NewAuthToken};
use crate::domain::repositories::TokenRepository;
use crate::domain::retention::InsertObserver;
use crate::error::AppError;

/// PostgreSQL repository for login tokens.
///
/// Stores hashed tokens only. Deleting a user cascades to their tokens.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
    observer: Arc<dyn InsertObserver>,
}

impl PgTokenRepository {
    /// Creates a new repository reporting inserts to `observer`.
    pub fn new(pool: Arc<PgPool>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { pool, observer }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create(&self, new_token: NewAuthToken) -> Result<AuthToken, AppError> {
        let token = sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (user_id, token_hash)
            VALUES ($1, $2)
            RETURNING id, user_id, token_hash, created_at
            "#,
        )
        .bind(new_token.user_id)
        .bind(&new_token.token_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.observer.on_insert(AUTH_TOKENS_TABLE);

        Ok(token)
    }

    async fn find_user_id(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        let user_id: Option<i64> =
            sqlx::query_scalar("SELECT user_id FROM auth_tokens WHERE token_hash = $1")
                .bind(token_hash)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(user_id)
    }
}
