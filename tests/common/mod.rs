#![allow(dead_code)]

use axum::{Router, routing::get};
use axum_test::TestServer;
use std::sync::Arc;
use tokio::sync::mpsc;

use blog_backend::api::handlers::health_handler;
use blog_backend::api::routes::api_routes;
use blog_backend::domain::retention::{
    EvictionJob, Evictor, InsertObserver, RetentionPolicy, RetentionTracker,
};
use blog_backend::infrastructure::persistence::Repositories;
use blog_backend::infrastructure::persistence::memory::MemoryDatabase;
use blog_backend::state::AppState;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

/// An in-memory application with its retention pieces exposed.
///
/// No eviction worker is spawned: tests drain `jobs` themselves, which keeps
/// every eviction deterministic.
pub struct TestApp {
    pub state: AppState,
    pub repositories: Repositories,
    pub tracker: Arc<RetentionTracker>,
    pub evictor: Arc<Evictor>,
    pub db: Arc<MemoryDatabase>,
    pub jobs: mpsc::Receiver<EvictionJob>,
}

impl TestApp {
    pub fn new(policy: RetentionPolicy) -> Self {
        let (tx, jobs) = mpsc::channel(64);
        let tracker = Arc::new(RetentionTracker::new(policy, tx));
        let observer: Arc<dyn InsertObserver> = tracker.clone();

        let db = Arc::new(MemoryDatabase::new());
        let repositories = Repositories::memory(db.clone(), observer);
        let evictor = Arc::new(Evictor::new(repositories.retention.clone()));
        let state = AppState::new(
            &repositories,
            TEST_SIGNING_SECRET.to_string(),
            tracker.clone(),
            evictor.clone(),
        );

        Self {
            state,
            repositories,
            tracker,
            evictor,
            db,
            jobs,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RetentionPolicy::default())
    }

    pub fn server(&self) -> TestServer {
        let app = Router::new()
            .route("/health", get(health_handler))
            .nest("/api", api_routes())
            .with_state(self.state.clone());

        TestServer::new(app).unwrap()
    }

    /// Runs every queued eviction job, returning how many ran.
    pub async fn run_pending_evictions(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.jobs.try_recv() {
            self.evictor
                .evict_oldest(&job.table, job.batch_size)
                .await
                .unwrap();
            ran += 1;
        }
        ran
    }
}
