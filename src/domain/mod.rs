//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the retention subsystem,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`retention`] - Insert counting, eviction and startup reconciliation
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Insert Processing Flow
//!
//! 1. A service asks a repository to create a row
//! 2. The repository inserts it and calls [`retention::InsertObserver::on_insert`]
//! 3. [`retention::RetentionTracker`] counts the insert and, at threshold,
//!    queues a [`retention::EvictionJob`]
//! 4. [`retention::run_eviction_worker`] deletes the oldest batch

pub mod entities;
pub mod repositories;
pub mod retention;
