//! DTOs for login.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::IssuedToken;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// A freshly issued bearer token.
///
/// The token is shown once; only its hash is stored.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub user_id: i64,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer",
            user_id: issued.user_id,
        }
    }
}
