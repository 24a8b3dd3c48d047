//! Handlers for retention status and manual eviction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::retention::{EvictResponse, RetentionStatusResponse, TableStatusItem};
use crate::error::AppError;
use crate::state::AppState;

/// Reports the retention policy and every table's row count and counter.
///
/// # Endpoint
///
/// `GET /api/retention`
///
/// A table whose rows could not be counted is listed with `"rows": null`.
pub async fn retention_status_handler(
    State(state): State<AppState>,
) -> Result<Json<RetentionStatusResponse>, AppError> {
    let service = &state.retention_service;
    let policy = service.policy();
    let tables = service.status().await?;

    Ok(Json(RetentionStatusResponse {
        threshold: policy.threshold(),
        batch_size: policy.batch_size(),
        floor: policy.floor(),
        worker_running: service.is_worker_running(),
        tables: tables
            .into_iter()
            .map(|t| TableStatusItem::new(t, &policy))
            .collect(),
    }))
}

/// Evicts one batch of the oldest rows from a table right away.
///
/// # Endpoint
///
/// `POST /api/retention/{table}/evict`
///
/// The table's insert counter is reset, as after any eviction.
///
/// # Errors
///
/// Returns 404 if the table does not exist.
pub async fn evict_table_handler(
    Path(table): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<EvictResponse>, AppError> {
    let removed = state.retention_service.evict_now(&table).await?;
    Ok(Json(EvictResponse { table, removed }))
}
