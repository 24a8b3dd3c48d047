//! DTOs for retention endpoints.

use serde::Serialize;

use crate::application::services::TableStatus;
use crate::domain::retention::RetentionPolicy;

/// Retention policy and the state of every table.
#[derive(Debug, Serialize)]
pub struct RetentionStatusResponse {
    pub threshold: u64,
    pub batch_size: u64,
    pub floor: u64,
    pub worker_running: bool,
    pub tables: Vec<TableStatusItem>,
}

#[derive(Debug, Serialize)]
pub struct TableStatusItem {
    pub table: String,
    pub rows: Option<u64>,
    pub counter: u64,
    pub over_threshold: bool,
}

impl TableStatusItem {
    pub fn new(status: TableStatus, policy: &RetentionPolicy) -> Self {
        Self {
            over_threshold: status.rows.is_some_and(|rows| policy.is_over(rows)),
            table: status.table,
            rows: status.rows,
            counter: status.counter,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvictResponse {
    pub table: String,
    pub removed: u64,
}
