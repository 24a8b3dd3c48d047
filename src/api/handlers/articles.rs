//! Handlers for article endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::article::{
    ArticleItem, ArticleQueryParams, ArticleSummary, CreateArticleRequest,
};
use crate::api::dto::pagination::Page;
use crate::error::AppError;
use crate::state::AppState;

/// Publishes an article.
///
/// # Endpoint
///
/// `POST /api/articles`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Hello",
///   "body": "First post",
///   "category_id": 1,   // optional
///   "author_id": 2      // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails or a referenced category/author does not exist.
pub async fn create_article_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleItem>), AppError> {
    payload.validate()?;

    let article = state.article_service.create_article(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// Lists articles, newest first, with body excerpts.
///
/// # Endpoint
///
/// `GET /api/articles`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 100)
/// - `category_id` (optional): Only articles in this category
pub async fn list_articles_handler(
    State(state): State<AppState>,
    Query(params): Query<ArticleQueryParams>,
) -> Result<Json<Page<ArticleSummary>>, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (articles, total) = state
        .article_service
        .list_articles(offset, limit, params.category_id)
        .await?;

    Ok(Json(Page {
        pagination: params.pagination.meta(total),
        items: articles.into_iter().map(ArticleSummary::from).collect(),
    }))
}

/// `GET /api/articles/{id}`
pub async fn get_article_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ArticleItem>, AppError> {
    let article = state.article_service.get_article(id).await?;
    Ok(Json(article.into()))
}

/// `DELETE /api/articles/{id}`
pub async fn delete_article_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.article_service.delete_article(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
