//! Background task that runs queued evictions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use super::evictor::Evictor;
use super::tracker::EvictionJob;

/// Drains eviction jobs until every sender is dropped.
///
/// Jobs run one at a time. A failed eviction is logged and abandoned; the
/// tracker has already reset the counter, so the next threshold crossing
/// retries naturally.
pub async fn run_eviction_worker(mut rx: mpsc::Receiver<EvictionJob>, evictor: Arc<Evictor>) {
    while let Some(job) = rx.recv().await {
        if let Err(e) = evictor.evict_oldest(&job.table, job.batch_size).await {
            error!(table = %job.table, error = %e, "Eviction failed");
            metrics::counter!("retention_eviction_failures_total", "table" => job.table.clone())
                .increment(1);
        }
    }

    info!("Eviction worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockRetentionRepository, RowHandle};
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::Mutex;

    fn job(table: &str) -> EvictionJob {
        EvictionJob {
            table: table.to_string(),
            batch_size: 2,
        }
    }

    #[tokio::test]
    async fn test_failed_jobs_are_abandoned_and_later_jobs_run() {
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let mut repo = MockRetentionRepository::new();

        repo.expect_find_oldest()
            .withf(|table, _, _| table == "bad")
            .times(1)
            .returning(|_, _, _| Err(AppError::internal("Database error", json!({}))));
        repo.expect_find_oldest()
            .withf(|table, _, _| table == "broken" || table == "good")
            .times(2)
            .returning(|_, _, _| Ok(vec![RowHandle(1), RowHandle(2)]));
        repo.expect_delete_rows()
            .withf(|table, _| table == "broken")
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));
        let recorder = deleted.clone();
        repo.expect_delete_rows()
            .withf(|table, _| table == "good")
            .times(1)
            .returning(move |table, rows| {
                recorder.lock().unwrap().push(table.to_string());
                Ok(rows.len() as u64)
            });

        let evictor = Arc::new(Evictor::new(Arc::new(repo)));
        let (tx, rx) = mpsc::channel(8);
        tx.send(job("bad")).await.unwrap();
        tx.send(job("broken")).await.unwrap();
        tx.send(job("good")).await.unwrap();
        drop(tx);

        run_eviction_worker(rx, evictor).await;

        assert_eq!(*deleted.lock().unwrap(), vec!["good"]);
    }

    #[tokio::test]
    async fn test_worker_stops_when_senders_drop() {
        let repo = MockRetentionRepository::new();
        let evictor = Arc::new(Evictor::new(Arc::new(repo)));
        let (tx, rx) = mpsc::channel::<EvictionJob>(1);

        drop(tx);

        run_eviction_worker(rx, evictor).await;
    }
}
