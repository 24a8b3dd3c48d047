//! Article entity.

use chrono::{DateTime, Utc};

/// Table the article entity is stored in.
pub const ARTICLES_TABLE: &str = "articles";

/// A published article.
///
/// `category_id` and `author_id` become `None` when the referenced row is
/// deleted, including deletion by retention eviction.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub body: String,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
}

impl Article {
    /// Returns a short excerpt of the body, cut on a character boundary.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.body.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }
}
