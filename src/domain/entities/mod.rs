//! Core domain entities representing the persisted data model.
//!
//! # Entity Types
//!
//! - [`User`] - An author
//! - [`Category`] - A grouping of articles
//! - [`Article`] - A published article
//! - [`AuthToken`] - A bearer token issued at login
//!
//! # Design Pattern
//!
//! Entities have separate structs for creation (`NewUser`, `NewCategory`,
//! `NewArticle`, `NewAuthToken`). Each entity module also names the table it
//! lives in; that name is what repositories report to the retention tracker.

pub mod article;
pub mod auth_token;
pub mod category;
pub mod user;

pub use article::{ARTICLES_TABLE, Article, NewArticle};
pub use auth_token::{AUTH_TOKENS_TABLE, AuthToken, NewAuthToken};
pub use category::{CATEGORIES_TABLE, Category, NewCategory};
pub use user::{NewUser, USERS_TABLE, User, UserCredentials};
