//! Business logic services for the application layer.

pub mod article_service;
pub mod auth_service;
pub mod category_service;
pub mod retention_service;
pub mod user_service;

pub use article_service::ArticleService;
pub use auth_service::{AuthService, CredentialHasher, IssuedToken};
pub use category_service::CategoryService;
pub use retention_service::{RetentionService, TableStatus};
pub use user_service::UserService;
