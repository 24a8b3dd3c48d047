//! In-memory storage backend.
//!
//! Selected with `STORAGE_BACKEND=memory`. Data lives only as long as the
//! process, so reconciliation at startup always finds empty tables. Useful for
//! local development and for tests that exercise the full stack without
//! PostgreSQL.

pub mod repositories;
pub mod store;

pub use repositories::{
    MemoryArticleRepository, MemoryCategoryRepository, MemoryRetentionRepository,
    MemoryTokenRepository, MemoryUserRepository,
};
pub use store::MemoryDatabase;
