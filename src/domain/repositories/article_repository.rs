//! Repository trait for article data access.

use crate::domain::entities::{Article, NewArticle};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing articles.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgArticleRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::memory::MemoryArticleRepository`] - in-memory store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Creates a new article and reports the insert to the retention tracker.
    ///
    /// Referenced category and author are expected to exist; the service
    /// layer checks them first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a reference vanished in between.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_article: NewArticle) -> Result<Article, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, AppError>;

    /// Lists articles, newest first, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(
        &self,
        offset: i64,
        limit: i64,
        category_id: Option<i64>,
    ) -> Result<Vec<Article>, AppError>;

    /// Counts articles, optionally restricted to one category.
    async fn count(&self, category_id: Option<i64>) -> Result<i64, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
