//! Repository trait for login tokens.

use crate::domain::entities::{AuthToken, NewAuthToken};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for issued login tokens.
///
/// Tokens are stored as HMAC-SHA256 hashes; the raw value never reaches
/// this layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::memory::MemoryTokenRepository`] - in-memory store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stores a token and reports the insert to the retention tracker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the hash is already stored.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_token: NewAuthToken) -> Result<AuthToken, AppError>;

    /// Resolves a token hash to the user it was issued for.
    ///
    /// Returns `Ok(None)` if the token is unknown or has been evicted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_user_id(&self, token_hash: &str) -> Result<Option<i64>, AppError>;
}
