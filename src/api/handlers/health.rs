//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Storage**: Lists the tables in the store
/// 2. **Eviction Queue**: Checks that the eviction worker still accepts jobs
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "3 tables" },
///     "eviction_queue": { "status": "ok", "message": "Threshold 500, batch 250" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let eviction_queue = check_eviction_queue(&state);

    let all_healthy = storage.is_ok() && eviction_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            eviction_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.retention_service.check_storage().await {
        Ok(tables) => CheckStatus::ok(format!("{tables} tables")),
        Err(e) => CheckStatus::error(format!("Storage error: {e}")),
    }
}

fn check_eviction_queue(state: &AppState) -> CheckStatus {
    let service = &state.retention_service;
    if service.is_worker_running() {
        let policy = service.policy();
        CheckStatus::ok(format!(
            "Threshold {}, batch {}",
            policy.threshold(),
            policy.batch_size()
        ))
    } else {
        CheckStatus::error("Eviction queue is closed")
    }
}
