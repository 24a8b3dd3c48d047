//! Bounded-retention eviction.
//!
//! Keeps every persisted table bounded: once a table has seen `threshold`
//! inserts since its last eviction, its `batch_size` oldest rows are deleted.
//!
//! # Pieces
//!
//! - [`RetentionTracker`] - per-table insert counters, fed by repositories
//!   through [`InsertObserver`]
//! - [`Evictor`] - deletes one batch of the oldest rows of a table
//! - [`run_eviction_worker`] - background task executing dispatched evictions
//! - [`reconcile_all`] - startup pass seeding counters from real row counts
//!
//! # Flow
//!
//! 1. A repository inserts a row and calls [`InsertObserver::on_insert`]
//! 2. The tracker increments the table's counter under its shard lock
//! 3. On reaching the threshold the counter resets to 0 and an
//!    [`EvictionJob`] is queued
//! 4. The worker runs [`Evictor::evict_oldest`] and logs the outcome

pub mod error;
pub mod evictor;
pub mod policy;
pub mod reconcile;
pub mod tracker;
pub mod worker;

pub use error::RetentionError;
pub use evictor::Evictor;
pub use policy::{DEFAULT_BATCH_SIZE, DEFAULT_THRESHOLD, RECENCY_KEY_CANDIDATES, RetentionPolicy};
pub use reconcile::{
    ReconciliationReport, TableReconciliation, reconcile_all, reconcile_known_tables,
};
pub use tracker::{EvictionJob, InsertObserver, NullInsertObserver, RetentionTracker};
pub use worker::run_eviction_worker;
