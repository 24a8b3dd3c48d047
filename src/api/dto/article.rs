//! DTOs for article endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::{Article, NewArticle};

/// Characters of the body shown in list responses.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 100000))]
    pub body: String,

    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
}

impl From<CreateArticleRequest> for NewArticle {
    fn from(r: CreateArticleRequest) -> Self {
        Self {
            title: r.title,
            body: r.body,
            category_id: r.category_id,
            author_id: r.author_id,
        }
    }
}

/// Query parameters for `GET /api/articles`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ArticleQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Full article representation.
#[derive(Debug, Serialize)]
pub struct ArticleItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Article> for ArticleItem {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            body: a.body,
            category_id: a.category_id,
            author_id: a.author_id,
            created_at: a.created_at,
        }
    }
}

/// Article as shown in list responses, with the body cut to an excerpt.
#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Article> for ArticleSummary {
    fn from(a: Article) -> Self {
        Self {
            excerpt: a.excerpt(EXCERPT_CHARS).to_string(),
            id: a.id,
            title: a.title,
            category_id: a.category_id,
            author_id: a.author_id,
            created_at: a.created_at,
        }
    }
}
