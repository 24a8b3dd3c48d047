//! Storage backends implementing the domain repository traits.
//!
//! # Backends
//!
//! - PostgreSQL via SQLx: [`PgUserRepository`], [`PgCategoryRepository`],
//!   [`PgArticleRepository`], [`PgTokenRepository`], [`PgRetentionRepository`]
//! - In-memory: see [`memory`]
//!
//! [`Repositories`] bundles one backend's repositories, all wired to the same
//! insert observer.

pub mod memory;
pub mod pg_article_repository;
pub mod pg_category_repository;
pub mod pg_retention_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_article_repository::PgArticleRepository;
pub use pg_category_repository::PgCategoryRepository;
pub use pg_retention_repository::PgRetentionRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{
    ArticleRepository, CategoryRepository, RetentionRepository, TokenRepository, UserRepository,
};
use crate::domain::retention::InsertObserver;
use memory::{
    MemoryArticleRepository, MemoryCategoryRepository, MemoryDatabase, MemoryRetentionRepository,
    MemoryTokenRepository, MemoryUserRepository,
};

/// The repositories of one storage backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub retention: Arc<dyn RetentionRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>, observer: Arc<dyn InsertObserver>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone(), observer.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone(), observer.clone())),
            articles: Arc::new(PgArticleRepository::new(pool.clone(), observer.clone())),
            tokens: Arc::new(PgTokenRepository::new(pool.clone(), observer)),
            retention: Arc::new(PgRetentionRepository::new(pool)),
        }
    }

    /// In-memory repositories sharing one [`MemoryDatabase`].
    pub fn memory(db: Arc<MemoryDatabase>, observer: Arc<dyn InsertObserver>) -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new(db.clone(), observer.clone())),
            categories: Arc::new(MemoryCategoryRepository::new(db.clone(), observer.clone())),
            articles: Arc::new(MemoryArticleRepository::new(db.clone(), observer.clone())),
            tokens: Arc::new(MemoryTokenRepository::new(db.clone(), observer)),
            retention: Arc::new(MemoryRetentionRepository::new(db)),
        }
    }
}
