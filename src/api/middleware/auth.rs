//! Bearer token authentication.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// The user a request was authenticated as.
///
/// Add it as a handler argument to require a valid login token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// Rejects with `401 Unauthorized` (and `WWW-Authenticate: Bearer`) if:
/// - Authorization header is missing or not a Bearer token
/// - Token is unknown or has been evicted
///
/// # Example
///
/// ```rust,ignore
/// async fn me_handler(AuthenticatedUser(user_id): AuthenticatedUser) -> String {
///     user_id.to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i64);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthBearer(token) = AuthBearer::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Authorization header is missing or invalid"}),
                )
            })?;

        let user_id = state.auth_service.authenticate(&token).await?;

        Ok(Self(user_id))
    }
}
