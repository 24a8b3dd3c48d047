//! Article publishing service.

use std::sync::Arc;

use crate::domain::entities::{Article, NewArticle};
use crate::domain::repositories::{ArticleRepository, CategoryRepository, UserRepository};
use crate::error::AppError;
use serde_json::json;

/// Service for publishing and browsing articles.
///
/// Checks that the referenced category and author exist before inserting,
/// so a dangling reference is reported as a validation error rather than a
/// database constraint failure.
pub struct ArticleService<A, C, U>
where
    A: ArticleRepository + ?Sized,
    C: CategoryRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    article_repository: Arc<A>,
    category_repository: Arc<C>,
    user_repository: Arc<U>,
}

impl<A, C, U> ArticleService<A, C, U>
where
    A: ArticleRepository + ?Sized,
    C: CategoryRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub fn new(
        article_repository: Arc<A>,
        category_repository: Arc<C>,
        user_repository: Arc<U>,
    ) -> Self {
        Self {
            article_repository,
            category_repository,
            user_repository,
        }
    }

    /// Publishes an article.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the title is blank or the category
    /// or author does not exist.
    pub async fn create_article(&self, new_article: NewArticle) -> Result<Article, AppError> {
        let title = new_article.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::bad_request(
                "Article title must not be blank",
                json!({ "field": "title" }),
            ));
        }

        if let Some(category_id) = new_article.category_id
            && self
                .category_repository
                .find_by_id(category_id)
                .await?
                .is_none()
        {
            return Err(AppError::bad_request(
                "Category does not exist",
                json!({ "category_id": category_id }),
            ));
        }

        if let Some(author_id) = new_article.author_id
            && self.user_repository.find_by_id(author_id).await?.is_none()
        {
            return Err(AppError::bad_request(
                "Author does not exist",
                json!({ "author_id": author_id }),
            ));
        }

        self.article_repository
            .create(NewArticle {
                title,
                ..new_article
            })
            .await
    }

    pub async fn get_article(&self, id: i64) -> Result<Article, AppError> {
        self.article_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Article not found", json!({ "id": id })))
    }

    /// Returns one page of articles, newest first, and the matching total.
    pub async fn list_articles(
        &self,
        offset: i64,
        limit: i64,
        category_id: Option<i64>,
    ) -> Result<(Vec<Article>, i64), AppError> {
        let articles = self
            .article_repository
            .list(offset, limit, category_id)
            .await?;
        let total = self.article_repository.count(category_id).await?;
        Ok((articles, total))
    }

    pub async fn delete_article(&self, id: i64) -> Result<(), AppError> {
        if !self.article_repository.delete(id).await? {
            return Err(AppError::not_found("Article not found", json!({ "id": id })));
        }
        Ok(())
    }
}
