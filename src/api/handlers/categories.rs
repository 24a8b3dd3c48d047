//! Handlers for category endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::category::{CategoryItem, CreateCategoryRequest};
use crate::api::dto::pagination::{Page, PaginationParams};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a category.
///
/// # Endpoint
///
/// `POST /api/categories`
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if the name is taken.
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryItem>), AppError> {
    payload.validate()?;

    let category = state
        .category_service
        .create_category(payload.name, payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// `GET /api/categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<CategoryItem>>, AppError> {
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (categories, total) = state
        .category_service
        .list_categories(offset, limit)
        .await?;

    Ok(Json(Page {
        pagination: params.meta(total),
        items: categories.into_iter().map(CategoryItem::from).collect(),
    }))
}

/// `GET /api/categories/{id}`
pub async fn get_category_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CategoryItem>, AppError> {
    let category = state.category_service.get_category(id).await?;
    Ok(Json(category.into()))
}

/// `DELETE /api/categories/{id}`
pub async fn delete_category_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
