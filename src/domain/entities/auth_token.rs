//! Login token entity.

use chrono::{DateTime, Utc};

/// Table issued login tokens are stored in.
pub const AUTH_TOKENS_TABLE: &str = "auth_tokens";

/// A bearer token issued at login.
///
/// Only the HMAC of the token is persisted. The raw value is returned to
/// the client once and cannot be recovered.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for storing a new token.
#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub user_id: i64,
    pub token_hash: String,
}
