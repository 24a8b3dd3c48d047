//! User entity.

use chrono::{DateTime, Utc};

/// Table the user entity is stored in.
pub const USERS_TABLE: &str = "users";

/// A registered author.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new user.
///
/// `password_hash` is already salted and keyed; raw passwords never reach
/// a repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Stored login credentials of one user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub password_hash: String,
}
