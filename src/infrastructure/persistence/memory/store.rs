//! Shared in-memory tables behind the memory repositories.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{
    ARTICLES_TABLE, AUTH_TOKENS_TABLE, Article, AuthToken, CATEGORIES_TABLE, Category,
    USERS_TABLE, User,
};
use crate::domain::repositories::RowHandle;
use crate::error::AppError;

/// A row type stored in a [`MemoryTable`].
pub(crate) trait StoredRow: Clone {
    /// Name of the column holding the row's recency key.
    const RECENCY_COLUMN: &'static str;

    fn recency(&self) -> DateTime<Utc>;
}

/// A user row together with its password hash.
#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

impl StoredRow for UserRecord {
    const RECENCY_COLUMN: &'static str = "created_at";

    fn recency(&self) -> DateTime<Utc> {
        self.user.created_at
    }
}

impl StoredRow for Category {
    const RECENCY_COLUMN: &'static str = "create_time";

    fn recency(&self) -> DateTime<Utc> {
        self.create_time
    }
}

impl StoredRow for Article {
    const RECENCY_COLUMN: &'static str = "created_at";

    fn recency(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl StoredRow for AuthToken {
    const RECENCY_COLUMN: &'static str = "created_at";

    fn recency(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Rows keyed by a monotonically assigned id.
pub(crate) struct MemoryTable<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T: StoredRow> MemoryTable<T> {
    /// Assigns the next id and stores the row built from it.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.next_id += 1;
        let id = self.next_id;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub(crate) fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    pub(crate) fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    /// Page of matching rows, newest first.
    pub(crate) fn newest_first(
        &self,
        offset: i64,
        limit: i64,
        keep: impl Fn(&T) -> bool,
    ) -> Vec<T> {
        let mut rows: Vec<(&i64, &T)> = self.rows.iter().filter(|(_, row)| keep(row)).collect();
        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.recency().cmp(&a.recency()).then_with(|| b_id.cmp(a_id))
        });

        rows.into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|(_, row)| row.clone())
            .collect()
    }

    /// Handles of up to `limit` rows, oldest first, ties broken by id.
    pub(crate) fn oldest(
        &self,
        table: &str,
        limit: u64,
        candidates: &[&'static str],
    ) -> Result<Vec<RowHandle>, AppError> {
        if !candidates.contains(&T::RECENCY_COLUMN) {
            return Err(AppError::bad_request(
                "Table has no recency column",
                json!({ "table": table, "candidates": candidates }),
            ));
        }

        let mut rows: Vec<(i64, DateTime<Utc>)> = self
            .rows
            .iter()
            .map(|(id, row)| (*id, row.recency()))
            .collect();
        rows.sort_by(|(a_id, a), (b_id, b)| a.cmp(b).then_with(|| a_id.cmp(b_id)));

        Ok(rows
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(id, _)| RowHandle(id))
            .collect())
    }

    pub(crate) fn remove_many(&mut self, rows: &[RowHandle]) -> u64 {
        rows.iter()
            .filter(|row| self.rows.remove(&row.0).is_some())
            .count() as u64
    }

    /// Removes every row matching `pred`, returning how many went.
    pub(crate) fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> u64 {
        let before = self.rows.len();
        self.rows.retain(|_, row| !pred(row));
        (before - self.rows.len()) as u64
    }
}

/// Process-local database used by the `memory` storage backend.
///
/// Mirrors the PostgreSQL schema closely enough for the retention subsystem:
/// the same table names, the same recency columns, `ON DELETE SET NULL` on
/// article references and `ON DELETE CASCADE` from users to their tokens.
///
/// Operations that need several tables lock them in field order: users,
/// categories, articles, auth_tokens.
#[derive(Default)]
pub struct MemoryDatabase {
    pub(crate) users: RwLock<MemoryTable<UserRecord>>,
    pub(crate) categories: RwLock<MemoryTable<Category>>,
    pub(crate) articles: RwLock<MemoryTable<Article>>,
    pub(crate) auth_tokens: RwLock<MemoryTable<AuthToken>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every table, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names = vec![
            ARTICLES_TABLE.to_string(),
            AUTH_TOKENS_TABLE.to_string(),
            CATEGORIES_TABLE.to_string(),
            USERS_TABLE.to_string(),
        ];
        names.sort();
        names
    }

    pub(crate) async fn count(&self, table: &str) -> Result<u64, AppError> {
        let len = match table {
            USERS_TABLE => self.users.read().await.len(),
            CATEGORIES_TABLE => self.categories.read().await.len(),
            ARTICLES_TABLE => self.articles.read().await.len(),
            AUTH_TOKENS_TABLE => self.auth_tokens.read().await.len(),
            _ => return Err(unknown_table(table)),
        };

        Ok(len as u64)
    }

    pub(crate) async fn oldest(
        &self,
        table: &str,
        limit: u64,
        candidates: &[&'static str],
    ) -> Result<Vec<RowHandle>, AppError> {
        match table {
            USERS_TABLE => self.users.read().await.oldest(table, limit, candidates),
            CATEGORIES_TABLE => self.categories.read().await.oldest(table, limit, candidates),
            ARTICLES_TABLE => self.articles.read().await.oldest(table, limit, candidates),
            AUTH_TOKENS_TABLE => self.auth_tokens.read().await.oldest(table, limit, candidates),
            _ => Err(unknown_table(table)),
        }
    }

    /// Removes rows, clears article references to them and drops the tokens
    /// of removed users.
    pub(crate) async fn remove_rows(
        &self,
        table: &str,
        rows: &[RowHandle],
    ) -> Result<u64, AppError> {
        match table {
            USERS_TABLE => {
                let mut users = self.users.write().await;
                let mut articles = self.articles.write().await;
                let mut tokens = self.auth_tokens.write().await;

                let removed = users.remove_many(rows);
                for article in articles.values_mut() {
                    if article
                        .author_id
                        .is_some_and(|id| rows.contains(&RowHandle(id)))
                    {
                        article.author_id = None;
                    }
                }
                tokens.remove_where(|token| rows.contains(&RowHandle(token.user_id)));
                Ok(removed)
            }
            CATEGORIES_TABLE => {
                let mut categories = self.categories.write().await;
                let mut articles = self.articles.write().await;

                let removed = categories.remove_many(rows);
                for article in articles.values_mut() {
                    if article
                        .category_id
                        .is_some_and(|id| rows.contains(&RowHandle(id)))
                    {
                        article.category_id = None;
                    }
                }
                Ok(removed)
            }
            ARTICLES_TABLE => Ok(self.articles.write().await.remove_many(rows)),
            AUTH_TOKENS_TABLE => Ok(self.auth_tokens.write().await.remove_many(rows)),
            _ => Err(unknown_table(table)),
        }
    }
}

fn unknown_table(table: &str) -> AppError {
    AppError::not_found("Unknown table", json!({ "table": table }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn category_at(table: &mut MemoryTable<Category>, name: &str, at: DateTime<Utc>) -> i64 {
        table
            .insert_with(|id| Category {
                id,
                name: name.to_string(),
                description: None,
                create_time: at,
            })
            .id
    }

    #[test]
    fn test_oldest_orders_by_recency_not_id() {
        let now = Utc::now();
        let mut table = MemoryTable::default();

        let newest = category_at(&mut table, "c", now);
        let oldest = category_at(&mut table, "a", now - Duration::hours(2));
        let middle = category_at(&mut table, "b", now - Duration::hours(1));

        let rows = table
            .oldest("categories", 2, &["created_at", "create_time"])
            .unwrap();

        assert_eq!(rows, vec![RowHandle(oldest), RowHandle(middle)]);
        assert!(!rows.contains(&RowHandle(newest)));
    }

    #[test]
    fn test_oldest_breaks_ties_by_id() {
        let now = Utc::now();
        let mut table = MemoryTable::default();

        let first = category_at(&mut table, "a", now);
        let second = category_at(&mut table, "b", now);

        let rows = table.oldest("categories", 1, &["create_time"]).unwrap();

        assert_eq!(rows, vec![RowHandle(first)]);
        assert_ne!(rows[0], RowHandle(second));
    }

    #[test]
    fn test_oldest_requires_known_recency_column() {
        let mut table = MemoryTable::default();
        category_at(&mut table, "a", Utc::now());

        let err = table.oldest("categories", 1, &["created_at"]).unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_newest_first_paginates() {
        let now = Utc::now();
        let mut table = MemoryTable::default();
        for i in 0..5 {
            category_at(&mut table, &format!("c{i}"), now + Duration::seconds(i));
        }

        let page = table.newest_first(1, 2, |_| true);

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "c3");
        assert_eq!(page[1].name, "c2");
    }

    #[tokio::test]
    async fn test_removing_users_clears_authors_and_drops_tokens() {
        let db = MemoryDatabase::new();
        let now = Utc::now();

        let author = db.users.write().await.insert_with(|id| UserRecord {
            user: User {
                id,
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                created_at: now,
            },
            password_hash: String::new(),
        });
        let author = author.user;
        db.auth_tokens.write().await.insert_with(|id| AuthToken {
            id,
            user_id: author.id,
            token_hash: "h".to_string(),
            created_at: now,
        });
        let article = db.articles.write().await.insert_with(|id| Article {
            id,
            title: "t".to_string(),
            body: "b".to_string(),
            category_id: None,
            author_id: Some(author.id),
            created_at: now,
        });

        let removed = db
            .remove_rows(USERS_TABLE, &[RowHandle(author.id)])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        let stored = db.articles.read().await.get(article.id).unwrap();
        assert!(stored.author_id.is_none());
        assert_eq!(db.count(AUTH_TOKENS_TABLE).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let db = MemoryDatabase::new();
        let err = db.count("comments").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
