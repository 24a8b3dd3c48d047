//! Startup pass aligning in-memory counters with the rows actually stored.

use serde::Serialize;
use tracing::{error, info, warn};

use super::error::RetentionError;
use super::evictor::Evictor;
use super::tracker::RetentionTracker;
use crate::domain::repositories::RetentionRepository;

/// Outcome of reconciling one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReconciliation {
    pub table: String,
    /// Row count observed before any eviction; `None` if counting failed.
    pub count: Option<u64>,
    /// Rows removed by the eviction this pass triggered, if it ran and succeeded.
    pub evicted: Option<u64>,
    /// Counter value the tracker was seeded with.
    pub seeded: Option<u64>,
    pub error: Option<String>,
}

/// Per-table outcomes of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub tables: Vec<TableReconciliation>,
}

impl ReconciliationReport {
    /// Total rows removed across all tables.
    pub fn total_evicted(&self) -> u64 {
        self.tables.iter().filter_map(|t| t.evicted).sum()
    }

    /// Number of tables whose reconciliation hit an error.
    pub fn failures(&self) -> usize {
        self.tables.iter().filter(|t| t.error.is_some()).count()
    }

    pub fn get(&self, table: &str) -> Option<&TableReconciliation> {
        self.tables.iter().find(|t| t.table == table)
    }
}

/// Reconciles every table in `tables`, one after another.
///
/// For each table the true row count is read. A table at or above the
/// threshold gets exactly one eviction batch, even if it stays above the
/// threshold afterwards. The tracker is then seeded from the count observed
/// *before* that eviction.
///
/// Failures never abort the pass: a count failure skips the table, and an
/// eviction failure is recorded while the counter is still seeded.
pub async fn reconcile_all(
    repository: &dyn RetentionRepository,
    evictor: &Evictor,
    tracker: &RetentionTracker,
    tables: &[String],
) -> ReconciliationReport {
    let policy = tracker.policy();
    let mut report = ReconciliationReport::default();

    for table in tables {
        let mut outcome = TableReconciliation {
            table: table.clone(),
            count: None,
            evicted: None,
            seeded: None,
            error: None,
        };

        let count = match repository.count(table).await {
            Ok(count) => count,
            Err(source) => {
                let err = RetentionError::Count {
                    table: table.clone(),
                    source,
                };
                error!(table = %table, error = %err, "Reconciliation could not count rows");
                outcome.error = Some(err.to_string());
                report.tables.push(outcome);
                continue;
            }
        };
        outcome.count = Some(count);

        if policy.is_over(count) {
            warn!(
                table = %table,
                count,
                threshold = policy.threshold(),
                "Table over retention threshold at startup"
            );

            match evictor.evict_oldest(table, policy.batch_size()).await {
                Ok(removed) => outcome.evicted = Some(removed),
                Err(err) => {
                    error!(table = %table, error = %err, "Startup eviction failed");
                    outcome.error = Some(err.to_string());
                }
            }
        }

        tracker.seed(table, count);
        outcome.seeded = Some(policy.normalize(count));
        report.tables.push(outcome);
    }

    info!(
        tables = report.tables.len(),
        evicted = report.total_evicted(),
        failures = report.failures(),
        "Retention reconciliation finished"
    );

    report
}

/// Enumerates the store's tables and reconciles all of them.
///
/// # Errors
///
/// Returns [`RetentionError::Catalog`] if the table list cannot be read.
pub async fn reconcile_known_tables(
    repository: &dyn RetentionRepository,
    evictor: &Evictor,
    tracker: &RetentionTracker,
) -> Result<ReconciliationReport, RetentionError> {
    let tables = repository
        .list_tables()
        .await
        .map_err(|source| RetentionError::Catalog { source })?;

    Ok(reconcile_all(repository, evictor, tracker, &tables).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockRetentionRepository, RowHandle};
    use crate::domain::retention::RetentionPolicy;
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn tracker() -> (RetentionTracker, mpsc::Receiver<crate::domain::retention::EvictionJob>) {
        let (tx, rx) = mpsc::channel(8);
        (RetentionTracker::new(RetentionPolicy::default(), tx), rx)
    }

    fn tables(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_over_threshold_table_is_evicted_once_and_seeded_from_pre_count() {
        let mut counting = MockRetentionRepository::new();
        counting
            .expect_count()
            .withf(|table| table == "articles")
            .times(1)
            .returning(|_| Ok(1240));

        let mut evicting = MockRetentionRepository::new();
        evicting
            .expect_find_oldest()
            .withf(|table, limit, _| table == "articles" && *limit == 250)
            .times(1)
            .returning(|_, limit, _| Ok((0..limit as i64).map(RowHandle).collect()));
        evicting
            .expect_delete_rows()
            .times(1)
            .returning(|_, rows| Ok(rows.len() as u64));

        let evictor = Evictor::new(Arc::new(evicting));
        let (tracker, _rx) = tracker();

        let report = reconcile_all(&counting, &evictor, &tracker, &tables(&["articles"])).await;

        let outcome = report.get("articles").unwrap();
        assert_eq!(outcome.count, Some(1240));
        assert_eq!(outcome.evicted, Some(250));
        assert_eq!(outcome.seeded, Some(240));
        assert!(outcome.error.is_none());
        assert_eq!(tracker.counter("articles"), 240);
    }

    #[tokio::test]
    async fn test_under_threshold_table_is_only_seeded() {
        let mut counting = MockRetentionRepository::new();
        counting.expect_count().returning(|_| Ok(42));

        let mut evicting = MockRetentionRepository::new();
        evicting.expect_find_oldest().times(0);

        let evictor = Evictor::new(Arc::new(evicting));
        let (tracker, _rx) = tracker();

        let report = reconcile_all(&counting, &evictor, &tracker, &tables(&["users"])).await;

        assert_eq!(report.get("users").unwrap().evicted, None);
        assert_eq!(tracker.counter("users"), 42);
        assert_eq!(report.total_evicted(), 0);
    }

    #[tokio::test]
    async fn test_count_failure_skips_table_and_continues() {
        let mut counting = MockRetentionRepository::new();
        counting
            .expect_count()
            .withf(|table| table == "users")
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        counting
            .expect_count()
            .withf(|table| table == "categories")
            .returning(|_| Ok(7));

        let evictor = Evictor::new(Arc::new(MockRetentionRepository::new()));
        let (tracker, _rx) = tracker();

        let report = reconcile_all(
            &counting,
            &evictor,
            &tracker,
            &tables(&["users", "categories"]),
        )
        .await;

        assert_eq!(report.failures(), 1);
        assert!(report.get("users").unwrap().seeded.is_none());
        assert_eq!(tracker.counter("users"), 0);
        assert_eq!(tracker.counter("categories"), 7);
    }

    #[tokio::test]
    async fn test_eviction_failure_still_seeds_counter() {
        let mut counting = MockRetentionRepository::new();
        counting.expect_count().returning(|_| Ok(500));

        let mut evicting = MockRetentionRepository::new();
        evicting
            .expect_find_oldest()
            .returning(|_, _, _| Err(AppError::internal("Database error", json!({}))));

        let evictor = Evictor::new(Arc::new(evicting));
        let (tracker, _rx) = tracker();

        let report = reconcile_all(&counting, &evictor, &tracker, &tables(&["articles"])).await;

        let outcome = report.get("articles").unwrap();
        assert!(outcome.error.is_some());
        assert_eq!(outcome.evicted, None);
        assert_eq!(outcome.seeded, Some(0));
        assert_eq!(tracker.counter("articles"), 0);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_reported() {
        let mut repo = MockRetentionRepository::new();
        repo.expect_list_tables()
            .returning(|| Err(AppError::internal("Database error", json!({}))));

        let evictor = Evictor::new(Arc::new(MockRetentionRepository::new()));
        let (tracker, _rx) = tracker();

        let result = reconcile_known_tables(&repo, &evictor, &tracker).await;

        assert!(matches!(result, Err(RetentionError::Catalog { .. })));
    }
}
