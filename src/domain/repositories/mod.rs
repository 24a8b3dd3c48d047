//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User CRUD operations
//! - [`CategoryRepository`] - Category CRUD operations
//! - [`ArticleRepository`] - Article CRUD operations
//! - [`TokenRepository`] - Login token storage and lookup
//! - [`RetentionRepository`] - Table-level counting and oldest-row deletion

pub mod article_repository;
pub mod category_repository;
pub mod retention_repository;
pub mod token_repository;
pub mod user_repository;

pub use article_repository::ArticleRepository;
pub use category_repository::CategoryRepository;
pub use retention_repository::{RetentionRepository, RowHandle};
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use article_repository::MockArticleRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use retention_repository::MockRetentionRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
