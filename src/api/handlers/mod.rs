//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod health;
pub mod retention;
pub mod users;

pub use articles::{
    create_article_handler, delete_article_handler, get_article_handler, list_articles_handler,
};
pub use auth::{login_handler, me_handler};
pub use categories::{
    create_category_handler, delete_category_handler, get_category_handler,
    list_categories_handler,
};
pub use health::health_handler;
pub use retention::{evict_table_handler, retention_status_handler};
pub use users::{create_user_handler, delete_user_handler, get_user_handler, list_users_handler};
