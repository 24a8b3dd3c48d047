//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, retention wiring, worker spawning, and Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::retention::{
    Evictor, InsertObserver, NullInsertObserver, ReconciliationReport, RetentionTracker,
    run_eviction_worker,
};
use crate::infrastructure::persistence::Repositories;
use crate::infrastructure::persistence::memory::MemoryDatabase;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool + migrations, or the in-memory store)
/// - Retention tracker wired into every repository
/// - Background eviction worker
/// - Startup reconciliation of every table
/// - Axum HTTP server
///
/// The listener is bound only after reconciliation has finished.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let policy = config.retention_policy()?;

    let (jobs_tx, jobs_rx) = mpsc::channel(config.eviction_queue_capacity);
    let tracker = Arc::new(RetentionTracker::new(policy, jobs_tx));

    let observer: Arc<dyn InsertObserver> = if config.retention_enabled {
        tracker.clone()
    } else {
        tracing::info!("Retention disabled, inserts are not tracked");
        Arc::new(NullInsertObserver)
    };

    let repositories = build_repositories(&config, observer).await?;

    let evictor = Arc::new(Evictor::new(repositories.retention.clone()));
    tokio::spawn(run_eviction_worker(jobs_rx, evictor.clone()));
    tracing::info!("Eviction worker started");

    let state = AppState::new(
        &repositories,
        config.token_signing_secret.clone(),
        tracker,
        evictor,
    );

    if config.retention_enabled {
        match state.retention_service.reconcile().await {
            Ok(report) => log_reconciliation(&report),
            Err(e) => tracing::error!(error = %e, "Startup reconciliation failed"),
        }
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Creates the repositories for the configured backend.
async fn build_repositories(
    config: &Config,
    observer: Arc<dyn InsertObserver>,
) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Ok(Repositories::postgres(Arc::new(pool), observer))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Ok(Repositories::memory(
                Arc::new(MemoryDatabase::new()),
                observer,
            ))
        }
    }
}

async fn connect_pool(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the postgres backend")?;

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")
}

fn log_reconciliation(report: &ReconciliationReport) {
    tracing::info!(
        tables = report.tables.len(),
        evicted = report.total_evicted(),
        failures = report.failures(),
        "Startup reconciliation finished"
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
