//! Repository trait for category data access.

use crate::domain::entities::{Category, NewCategory};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing categories.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCategoryRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::memory::MemoryCategoryRepository`] - in-memory store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Creates a new category and reports the insert to the retention tracker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is taken.
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;

    /// Lists categories, newest first.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Category>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Deletes a category. Articles referencing it lose their category.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
