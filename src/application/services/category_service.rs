//! Category management service.

use std::sync::Arc;

use crate::domain::entities::{Category, NewCategory};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;
use serde_json::json;

/// Service for creating, reading and deleting categories.
pub struct CategoryService<R: CategoryRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: CategoryRepository + ?Sized> CategoryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a category. An empty description is stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the trimmed name is empty.
    /// Returns [`AppError::Conflict`] if the name is taken.
    pub async fn create_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, AppError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request(
                "Category name must not be blank",
                json!({ "field": "name" }),
            ));
        }

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        self.repository
            .create(NewCategory { name, description })
            .await
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "id": id })))
    }

    pub async fn list_categories(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64), AppError> {
        let categories = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;
        Ok((categories, total))
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(
                "Category not found",
                json!({ "id": id }),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCategoryRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_blank_description_is_dropped() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_create()
            .withf(|c| c.name == "rust" && c.description.is_none())
            .times(1)
            .returning(|c| {
                Ok(Category {
                    id: 1,
                    name: c.name,
                    description: c.description,
                    create_time: Utc::now(),
                })
            });

        let service = CategoryService::new(Arc::new(mock_repo));

        let category = service
            .create_category(" rust ".to_string(), Some("  ".to_string()))
            .await
            .unwrap();

        assert_eq!(category.name, "rust");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let service = CategoryService::new(Arc::new(MockCategoryRepository::new()));

        let result = service.create_category(String::new(), None).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
