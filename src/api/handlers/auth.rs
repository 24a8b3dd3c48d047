//! Handlers for login and the authenticated user.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse};
use crate::api::dto::user::UserItem;
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges a username and password for a bearer token.
///
/// # Endpoint
///
/// `POST /api/login`
///
/// # Request Body
///
/// ```json
/// { "username": "ada", "password": "correct horse" }
/// ```
///
/// # Response
///
/// ```json
/// { "token": "q3Xb...", "token_type": "Bearer", "user_id": 1 }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 401 if the credentials do not match.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let issued = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(issued.into()))
}

/// Returns the user the bearer token was issued for.
///
/// # Endpoint
///
/// `GET /api/me`
///
/// # Errors
///
/// Returns 401 without a valid token.
/// Returns 404 if the user was deleted after the token was checked.
pub async fn me_handler(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<UserItem>, AppError> {
    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(user.into()))
}
