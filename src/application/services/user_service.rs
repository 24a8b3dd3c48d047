//! User management service.

use std::sync::Arc;

use super::auth_service::CredentialHasher;
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use serde_json::json;

/// Service for creating, reading and deleting users.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    hasher: Arc<CredentialHasher>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    /// Creates a new user service hashing passwords with `hasher`.
    pub fn new(repository: Arc<R>, hasher: Arc<CredentialHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Creates a user.
    ///
    /// The username is trimmed and the email lowercased before storage. Only
    /// the salted hash of the password is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the trimmed username is empty.
    /// Returns [`AppError::Conflict`] if the username is taken.
    pub async fn create_user(
        &self,
        username: String,
        email: String,
        password: &str,
    ) -> Result<User, AppError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::bad_request(
                "Username must not be blank",
                json!({ "field": "username" }),
            ));
        }

        self.repository
            .create(NewUser {
                username,
                email: email.trim().to_lowercase(),
                password_hash: self.hasher.hash_password(password)?,
            })
            .await
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this id.
    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    /// Returns one page of users and the total count.
    pub async fn list_users(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), AppError> {
        let users = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;
        Ok((users, total))
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this id.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;

    fn hasher() -> Arc<CredentialHasher> {
        Arc::new(CredentialHasher::new("test-signing-secret".to_string()))
    }

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_normalizes_input() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create()
            .withf(|new_user| {
                new_user.username == "ada"
                    && new_user.email == "ada@example.com"
                    && hasher().verify_password("hunter22", &new_user.password_hash)
            })
            .times(1)
            .returning(|_| Ok(user(1, "ada")));

        let service = UserService::new(Arc::new(mock_repo), hasher());

        let result = service
            .create_user("  ada ".to_string(), "ADA@Example.com".to_string(), "hunter22")
            .await;

        assert_eq!(result.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_create_user_blank_username() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().times(0);

        let service = UserService::new(Arc::new(mock_repo), hasher());

        let result = service
            .create_user("   ".to_string(), "a@example.com".to_string(), "hunter22")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(mock_repo), hasher());

        assert!(matches!(
            service.get_user(42).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_users_returns_total() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_list()
            .withf(|offset, limit| *offset == 25 && *limit == 25)
            .returning(|_, _| Ok(vec![user(26, "bob")]));
        mock_repo.expect_count().returning(|| Ok(26));

        let service = UserService::new(Arc::new(mock_repo), hasher());

        let (users, total) = service.list_users(25, 25).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(total, 26);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = UserService::new(Arc::new(mock_repo), hasher());

        assert!(matches!(
            service.delete_user(3).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
