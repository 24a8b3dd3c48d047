//! Removes the oldest rows of a table.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::RetentionError;
use super::policy::RECENCY_KEY_CANDIDATES;
use crate::domain::repositories::RetentionRepository;

/// Deletes one batch of the oldest rows from a table.
///
/// Shared by the eviction worker, startup reconciliation and manual
/// eviction requests.
pub struct Evictor {
    repository: Arc<dyn RetentionRepository>,
}

impl Evictor {
    pub fn new(repository: Arc<dyn RetentionRepository>) -> Self {
        Self { repository }
    }

    /// Removes up to `batch_size` rows of `table`, oldest first.
    ///
    /// Returns the number of rows removed. An empty table (or a zero batch)
    /// is a no-op that returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::Query`] if the oldest rows could not be
    /// selected and [`RetentionError::Delete`] if removing them failed.
    pub async fn evict_oldest(&self, table: &str, batch_size: u64) -> Result<u64, RetentionError> {
        if batch_size == 0 {
            return Ok(0);
        }

        info!(table, batch_size, "Eviction started");

        let rows = self
            .repository
            .find_oldest(table, batch_size, RECENCY_KEY_CANDIDATES)
            .await
            .map_err(|source| RetentionError::Query {
                table: table.to_owned(),
                source,
            })?;

        if rows.is_empty() {
            debug!(table, "No rows to evict");
            return Ok(0);
        }

        let removed = self
            .repository
            .delete_rows(table, &rows)
            .await
            .map_err(|source| RetentionError::Delete {
                table: table.to_owned(),
                source,
            })?;

        info!(table, removed, "Eviction completed");
        metrics::counter!("retention_evicted_rows_total", "table" => table.to_owned())
            .increment(removed);

        Ok(removed)
    }
}
