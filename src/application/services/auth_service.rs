//! Password hashing, login and bearer token validation.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::NewAuthToken;
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Random salt length per password.
const SALT_BYTES: usize = 16;

/// Random bytes per issued token before base64 encoding.
const TOKEN_BYTES: usize = 32;

/// Keyed hashing for passwords and login tokens.
///
/// Every digest is an HMAC-SHA256 keyed by the server signing secret, so a
/// copy of the database alone is not enough to check a guessed password or
/// forge a token. Passwords are additionally salted per user and stored as
/// `<salt hex>$<mac hex>`.
pub struct CredentialHasher {
    signing_secret: String,
}

impl CredentialHasher {
    /// Creates a hasher keyed by `signing_secret`.
    ///
    /// The secret must stay the same across restarts, otherwise stored
    /// passwords and issued tokens stop verifying.
    pub fn new(signing_secret: String) -> Self {
        Self { signing_secret }
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|_| AppError::internal("Invalid signing key", json!({})))
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the system random source fails.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = random_bytes::<SALT_BYTES>()?;

        let mut mac = self.mac()?;
        mac.update(&salt);
        mac.update(password.as_bytes());

        Ok(format!(
            "{}${}",
            hex::encode(salt),
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Checks a password against a stored `<salt>$<mac>` value.
    ///
    /// Malformed stored values never verify. The MAC comparison is constant
    /// time.
    pub fn verify_password(&self, password: &str, stored: &str) -> bool {
        let Some((salt_hex, mac_hex)) = stored.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(mac_hex)) else {
            return false;
        };
        let Ok(mut mac) = self.mac() else {
            return false;
        };

        mac.update(&salt);
        mac.update(password.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Hashes a raw bearer token. Returns 64 lowercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the signing key is rejected.
    pub fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = self.mac()?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Generates a random bearer token, URL-safe base64 without padding.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn generate_token() -> Result<String, AppError> {
    let bytes = random_bytes::<TOKEN_BYTES>()?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

fn random_bytes<const N: usize>() -> Result<[u8; N], AppError> {
    let mut buffer = [0u8; N];
    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "Random source failed");
        AppError::internal("Failed to generate random bytes", json!({}))
    })?;
    Ok(buffer)
}

/// A token handed out by [`AuthService::login`].
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: i64,
}

/// Service for logging users in and authenticating bearer tokens.
///
/// Every successful login inserts one row into `auth_tokens`, so tokens are
/// subject to the same retention policy as any other table: once evicted, a
/// token simply stops authenticating.
pub struct AuthService<U: UserRepository + ?Sized, T: TokenRepository + ?Sized> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<CredentialHasher>,
}

impl<U: UserRepository + ?Sized, T: TokenRepository + ?Sized> AuthService<U, T> {
    /// Creates a new authentication service.
    pub fn new(users: Arc<U>, tokens: Arc<T>, hasher: Arc<CredentialHasher>) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Verifies a username and password and issues a new bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the username is unknown or the
    /// password does not match. Both cases produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AppError> {
        let credentials = self.users.find_credentials(username.trim()).await?;

        let user_id = match credentials {
            Some(c) if self.hasher.verify_password(password, &c.password_hash) => c.id,
            _ => {
                tracing::info!(username = %username.trim(), "Login rejected");
                return Err(AppError::unauthorized(
                    "Invalid username or password",
                    json!({}),
                ));
            }
        };

        let token = generate_token()?;
        self.tokens
            .create(NewAuthToken {
                user_id,
                token_hash: self.hasher.hash_token(&token)?,
            })
            .await?;

        tracing::info!(user_id, "Login succeeded");

        Ok(IssuedToken { token, user_id })
    }

    /// Resolves a raw bearer token to the id of the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or evicted.
    pub async fn authenticate(&self, token: &str) -> Result<i64, AppError> {
        let token_hash = self.hasher.hash_token(token)?;

        self.tokens
            .find_user_id(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or expired token" }),
                )
            })
    }
}
