//! PostgreSQL implementation of article repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ARTICLES_TABLE, Article, NewArticle};
use crate::domain::repositories::ArticleRepository;
use crate::domain::retention::InsertObserver;
use crate::error::AppError;

/// PostgreSQL repository for articles.
///
/// Foreign keys use `ON DELETE SET NULL`, so evicting a category or user
/// never cascades into article deletion.
pub struct PgArticleRepository {
    pool: Arc<PgPool>,
    observer: Arc<dyn InsertObserver>,
}

impl PgArticleRepository {
    /// Creates a new repository reporting inserts to `observer`.
    pub fn new(pool: Arc<PgPool>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { pool, observer }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn create(&self, new_article: NewArticle) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, body, category_id, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, category_id, author_id, created_at
            "#,
        )
        .bind(&new_article.title)
        .bind(&new_article.body)
        .bind(new_article.category_id)
        .bind(new_article.author_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.observer.on_insert(ARTICLES_TABLE);

        Ok(article)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, body, category_id, author_id, created_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(article)
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
        category_id: Option<i64>,
    ) -> Result<Vec<Article>, AppError> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, body, category_id, author_id, created_at
            FROM articles
            WHERE ($1::bigint IS NULL OR category_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(articles)
    }

    async fn count(&self, category_id: Option<i64>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM articles WHERE ($1::bigint IS NULL OR category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
