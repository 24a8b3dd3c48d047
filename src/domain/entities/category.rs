//! Category entity.

use chrono::{DateTime, Utc};

/// Table the category entity is stored in.
pub const CATEGORIES_TABLE: &str = "categories";

/// A named grouping of articles.
///
/// Categories predate the `created_at` naming convention and keep their
/// creation timestamp in a `create_time` column.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub create_time: DateTime<Utc>,
}

/// Input data for creating a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}
