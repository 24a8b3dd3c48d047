//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers.
//!
//! # Available Services
//!
//! - [`services::user_service::UserService`] - User management
//! - [`services::category_service::CategoryService`] - Category management
//! - [`services::article_service::ArticleService`] - Article publishing with reference checks
//! - [`services::auth_service::AuthService`] - Login and bearer token validation
//! - [`services::retention_service::RetentionService`] - Retention status, reconciliation and manual eviction

pub mod services;
