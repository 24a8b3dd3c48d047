//! Retention status and administrative eviction.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use crate::domain::repositories::RetentionRepository;
use crate::domain::retention::{
    Evictor, ReconciliationReport, RetentionError, RetentionPolicy, RetentionTracker,
    reconcile_known_tables,
};
use crate::error::AppError;

/// Row count and counter of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    pub table: String,
    /// `None` if the table could not be counted.
    pub rows: Option<u64>,
    pub counter: u64,
}

/// Facade over the tracker, evictor and retention repository.
///
/// The insert path does not go through this service: repositories talk to
/// the tracker directly. This is what the server uses at startup and what
/// the HTTP retention endpoints call.
pub struct RetentionService {
    tracker: Arc<RetentionTracker>,
    evictor: Arc<Evictor>,
    repository: Arc<dyn RetentionRepository>,
}

impl RetentionService {
    pub fn new(
        tracker: Arc<RetentionTracker>,
        evictor: Arc<Evictor>,
        repository: Arc<dyn RetentionRepository>,
    ) -> Self {
        Self {
            tracker,
            evictor,
            repository,
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.tracker.policy()
    }

    /// Whether the eviction worker is still accepting jobs.
    pub fn is_worker_running(&self) -> bool {
        self.tracker.is_dispatch_open()
    }

    /// Runs startup reconciliation over every table in the store.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::Catalog`] if the table list cannot be read.
    pub async fn reconcile(&self) -> Result<ReconciliationReport, RetentionError> {
        reconcile_known_tables(self.repository.as_ref(), &self.evictor, &self.tracker).await
    }

    /// Lists every table with its current row count and counter.
    ///
    /// A table that cannot be counted is reported with `rows: None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the table list cannot be read.
    pub async fn status(&self) -> Result<Vec<TableStatus>, AppError> {
        let tables = self.repository.list_tables().await?;
        let mut statuses = Vec::with_capacity(tables.len());

        for table in tables {
            let rows = match self.repository.count(&table).await {
                Ok(rows) => Some(rows),
                Err(e) => {
                    error!(table = %table, error = %e, "Failed to count rows for status");
                    None
                }
            };
            let counter = self.tracker.counter(&table);
            statuses.push(TableStatus {
                table,
                rows,
                counter,
            });
        }

        Ok(statuses)
    }

    /// Evicts one batch from `table` immediately and resets its counter.
    ///
    /// The counter is reset whether or not the eviction succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for a table the store does not know,
    /// or the underlying store error if the eviction failed.
    pub async fn evict_now(&self, table: &str) -> Result<u64, AppError> {
        let tables = self.repository.list_tables().await?;
        if !tables.iter().any(|t| t == table) {
            return Err(AppError::not_found(
                "Unknown table",
                json!({ "table": table }),
            ));
        }

        let result = self
            .evictor
            .evict_oldest(table, self.policy().batch_size())
            .await;
        self.tracker.reset(table);

        let removed = result?;
        info!(table, removed, "Manual eviction finished");
        Ok(removed)
    }

    /// Checks that the store answers a metadata query.
    pub async fn check_storage(&self) -> Result<usize, AppError> {
        Ok(self.repository.list_tables().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockRetentionRepository, RowHandle};
    use tokio::sync::mpsc;

    fn service(repo: MockRetentionRepository) -> (RetentionService, Arc<RetentionTracker>) {
        let repo: Arc<dyn RetentionRepository> = Arc::new(repo);
        let (tx, _rx) = mpsc::channel(4);
        let tracker = Arc::new(RetentionTracker::new(RetentionPolicy::default(), tx));
        let evictor = Arc::new(Evictor::new(repo.clone()));
        (RetentionService::new(tracker.clone(), evictor, repo), tracker)
    }

    #[tokio::test]
    async fn test_status_reports_rows_and_counters() {
        let mut repo = MockRetentionRepository::new();
        repo.expect_list_tables()
            .returning(|| Ok(vec!["articles".to_string(), "users".to_string()]));
        repo.expect_count()
            .withf(|t| t == "articles")
            .returning(|_| Ok(320));
        repo.expect_count()
            .withf(|t| t == "users")
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (service, tracker) = service(repo);
        tracker.seed("articles", 320);

        let statuses = service.status().await.unwrap();

        assert_eq!(
            statuses,
            vec![
                TableStatus {
                    table: "articles".to_string(),
                    rows: Some(320),
                    counter: 320,
                },
                TableStatus {
                    table: "users".to_string(),
                    rows: None,
                    counter: 0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_evict_now_unknown_table() {
        let mut repo = MockRetentionRepository::new();
        repo.expect_list_tables()
            .returning(|| Ok(vec!["articles".to_string()]));
        repo.expect_find_oldest().times(0);

        let (service, _) = service(repo);

        assert!(matches!(
            service.evict_now("comments").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_evict_now_resets_counter_even_on_failure() {
        let mut repo = MockRetentionRepository::new();
        repo.expect_list_tables()
            .returning(|| Ok(vec!["articles".to_string()]));
        repo.expect_find_oldest()
            .returning(|_, _, _| Ok(vec![RowHandle(1)]));
        repo.expect_delete_rows()
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let (service, tracker) = service(repo);
        tracker.seed("articles", 120);

        assert!(service.evict_now("articles").await.is_err());
        assert_eq!(tracker.counter("articles"), 0);
    }
}
