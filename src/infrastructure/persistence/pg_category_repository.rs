//! PostgreSQL implementation of category repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{CATEGORIES_TABLE, Category, NewCategory};
use crate::domain::repositories::CategoryRepository;
use crate::domain::retention::InsertObserver;
use crate::error::AppError;

/// PostgreSQL repository for categories.
pub struct PgCategoryRepository {
    pool: Arc<PgPool>,
    observer: Arc<dyn InsertObserver>,
}

impl PgCategoryRepository {
    /// Creates a new repository reporting inserts to `observer`.
    pub fn new(pool: Arc<PgPool>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { pool, observer }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, create_time
            "#,
        )
        .bind(&new_category.name)
        .bind(&new_category.description)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.observer.on_insert(CATEGORIES_TABLE);

        Ok(category)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, create_time FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(category)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, create_time
            FROM categories
            ORDER BY create_time DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(categories)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
