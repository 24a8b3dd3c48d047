//! Per-table insert counters that trigger eviction.

use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error};

use super::policy::RetentionPolicy;

/// Receives a notification after every successful row insert.
///
/// Repositories take an `Arc<dyn InsertObserver>` at construction and call
/// [`InsertObserver::on_insert`] once per inserted row. Implementations must
/// return quickly: the call happens on the request path.
pub trait InsertObserver: Send + Sync {
    fn on_insert(&self, table: &str);
}

/// Observer that ignores every insert.
///
/// Used when retention is disabled by configuration.
pub struct NullInsertObserver;

impl InsertObserver for NullInsertObserver {
    fn on_insert(&self, _table: &str) {}
}

/// Request for the eviction worker to remove one batch from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionJob {
    pub table: String,
    pub batch_size: u64,
}

/// Counts inserts per table and hands eviction off to a background worker.
///
/// Counters live in a sharded [`DashMap`], so the increment, threshold check
/// and reset for one table happen under that table's shard lock only. The
/// query and delete never run on the caller's task: crossing the threshold
/// enqueues an [`EvictionJob`] with `try_send` and returns.
pub struct RetentionTracker {
    policy: RetentionPolicy,
    counters: DashMap<String, u64>,
    jobs: mpsc::Sender<EvictionJob>,
}

impl RetentionTracker {
    pub fn new(policy: RetentionPolicy, jobs: mpsc::Sender<EvictionJob>) -> Self {
        Self {
            policy,
            counters: DashMap::new(),
            jobs,
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Counts one insert into `table`.
    ///
    /// Returns `true` when this insert crossed the threshold. In that case
    /// the counter has already been reset to 0 and an eviction was handed to
    /// the worker (or dropped and logged if the queue was unavailable).
    pub fn record_insert(&self, table: &str) -> bool {
        let crossed = {
            let mut counter = match self.counters.get_mut(table) {
                Some(counter) => counter,
                None => self.counters.entry(table.to_owned()).or_insert(0),
            };

            *counter += 1;
            if *counter >= self.policy.threshold() {
                *counter = 0;
                true
            } else {
                false
            }
        };

        if crossed {
            self.dispatch(table);
        }

        crossed
    }

    /// Sets the counter for `table` from a true row count.
    pub fn seed(&self, table: &str, count: u64) {
        self.counters
            .insert(table.to_owned(), self.policy.normalize(count));
    }

    /// Zeroes the counter after an eviction triggered outside the insert path.
    pub fn reset(&self, table: &str) {
        self.counters.insert(table.to_owned(), 0);
    }

    /// Inserts observed for `table` since its last eviction.
    pub fn counter(&self, table: &str) -> u64 {
        self.counters.get(table).map(|c| *c).unwrap_or(0)
    }

    /// All counters, sorted by table name.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort();
        entries
    }

    /// Returns `false` once the eviction worker has stopped.
    pub fn is_dispatch_open(&self) -> bool {
        !self.jobs.is_closed()
    }

    fn dispatch(&self, table: &str) {
        let job = EvictionJob {
            table: table.to_owned(),
            batch_size: self.policy.batch_size(),
        };

        match self.jobs.try_send(job) {
            Ok(()) => debug!(table, "Eviction dispatched"),
            Err(TrySendError::Full(_)) => {
                error!(table, "Eviction queue is full, trigger dropped");
                metrics::counter!("retention_dispatch_dropped_total", "table" => table.to_owned())
                    .increment(1);
            }
            Err(TrySendError::Closed(_)) => {
                error!(table, "Eviction worker is not running, trigger dropped");
                metrics::counter!("retention_dispatch_dropped_total", "table" => table.to_owned())
                    .increment(1);
            }
        }
    }
}

impl InsertObserver for RetentionTracker {
    fn on_insert(&self, table: &str) {
        self.record_insert(table);
    }
}
