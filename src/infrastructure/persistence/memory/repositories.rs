//! Repository implementations over [`MemoryDatabase`].

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use super::store::{MemoryDatabase, UserRecord};
use crate::domain::entities::{
    ARTICLES_TABLE, AUTH_TOKENS_TABLE, Article, AuthToken, CATEGORIES_TABLE, Category,
    NewArticle, NewAuthToken, NewCategory, NewUser, USERS_TABLE, User, UserCredentials,
};
use crate::domain::repositories::{
    ArticleRepository, CategoryRepository, RetentionRepository, RowHandle, TokenRepository,
    UserRepository,
};
use crate::domain::retention::InsertObserver;
use crate::error::AppError;

/// In-memory user repository.
pub struct MemoryUserRepository {
    db: Arc<MemoryDatabase>,
    observer: Arc<dyn InsertObserver>,
}

impl MemoryUserRepository {
    pub fn new(db: Arc<MemoryDatabase>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { db, observer }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = {
            let mut users = self.db.users.write().await;

            if users.values().any(|r| r.user.username == new_user.username) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "users_username_key" }),
                ));
            }

            users
                .insert_with(|id| UserRecord {
                    user: User {
                        id,
                        username: new_user.username,
                        email: new_user.email,
                        created_at: Utc::now(),
                    },
                    password_hash: new_user.password_hash,
                })
                .user
        };

        self.observer.on_insert(USERS_TABLE);

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.db.users.read().await.get(id).map(|r| r.user))
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, AppError> {
        Ok(self
            .db
            .users
            .read()
            .await
            .values()
            .find(|r| r.user.username == username)
            .map(|r| UserCredentials {
                id: r.user.id,
                password_hash: r.password_hash.clone(),
            }))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        Ok(self
            .db
            .users
            .read()
            .await
            .newest_first(offset, limit, |_| true)
            .into_iter()
            .map(|r| r.user)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.db.users.read().await.len() as i64)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = self.db.remove_rows(USERS_TABLE, &[RowHandle(id)]).await?;
        Ok(removed > 0)
    }
}

/// In-memory category repository.
pub struct MemoryCategoryRepository {
    db: Arc<MemoryDatabase>,
    observer: Arc<dyn InsertObserver>,
}

impl MemoryCategoryRepository {
    pub fn new(db: Arc<MemoryDatabase>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { db, observer }
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let category = {
            let mut categories = self.db.categories.write().await;

            if categories.values().any(|c| c.name == new_category.name) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "categories_name_key" }),
                ));
            }

            categories.insert_with(|id| Category {
                id,
                name: new_category.name,
                description: new_category.description,
                create_time: Utc::now(),
            })
        };

        self.observer.on_insert(CATEGORIES_TABLE);

        Ok(category)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.db.categories.read().await.get(id))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Category>, AppError> {
        Ok(self
            .db
            .categories
            .read()
            .await
            .newest_first(offset, limit, |_| true))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.db.categories.read().await.len() as i64)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = self
            .db
            .remove_rows(CATEGORIES_TABLE, &[RowHandle(id)])
            .await?;
        Ok(removed > 0)
    }
}

/// In-memory article repository.
pub struct MemoryArticleRepository {
    db: Arc<MemoryDatabase>,
    observer: Arc<dyn InsertObserver>,
}

impl MemoryArticleRepository {
    pub fn new(db: Arc<MemoryDatabase>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { db, observer }
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn create(&self, new_article: NewArticle) -> Result<Article, AppError> {
        let article = {
            // Referenced tables stay locked until the row is stored, so a
            // concurrent delete cannot leave a dangling reference behind.
            let users = self.db.users.read().await;
            let categories = self.db.categories.read().await;
            let mut articles = self.db.articles.write().await;

            let category_ok = new_article
                .category_id
                .is_none_or(|id| categories.contains(id));
            let author_ok = new_article.author_id.is_none_or(|id| users.contains(id));

            if !(category_ok && author_ok) {
                return Err(AppError::bad_request(
                    "Referenced record does not exist",
                    json!({
                        "category_id": new_article.category_id,
                        "author_id": new_article.author_id,
                    }),
                ));
            }

            articles.insert_with(|id| Article {
                id,
                title: new_article.title,
                body: new_article.body,
                category_id: new_article.category_id,
                author_id: new_article.author_id,
                created_at: Utc::now(),
            })
        };

        self.observer.on_insert(ARTICLES_TABLE);

        Ok(article)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, AppError> {
        Ok(self.db.articles.read().await.get(id))
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
        category_id: Option<i64>,
    ) -> Result<Vec<Article>, AppError> {
        Ok(self.db.articles.read().await.newest_first(offset, limit, |a| {
            category_id.is_none() || a.category_id == category_id
        }))
    }

    async fn count(&self, category_id: Option<i64>) -> Result<i64, AppError> {
        let articles = self.db.articles.read().await;
        let count = match category_id {
            Some(id) => articles
                .values()
                .filter(|a| a.category_id == Some(id))
                .count(),
            None => articles.len(),
        };
        Ok(count as i64)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = self
            .db
            .remove_rows(ARTICLES_TABLE, &[RowHandle(id)])
            .await?;
        Ok(removed > 0)
    }
}

/// In-memory login token repository.
pub struct MemoryTokenRepository {
    db: Arc<MemoryDatabase>,
    observer: Arc<dyn InsertObserver>,
}

impl MemoryTokenRepository {
    pub fn new(db: Arc<MemoryDatabase>, observer: Arc<dyn InsertObserver>) -> Self {
        Self { db, observer }
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn create(&self, new_token: NewAuthToken) -> Result<AuthToken, AppError> {
        let token = {
            let users = self.db.users.read().await;
            let mut tokens = self.db.auth_tokens.write().await;

            if !users.contains(new_token.user_id) {
                return Err(AppError::bad_request(
                    "Referenced record does not exist",
                    json!({ "user_id": new_token.user_id }),
                ));
            }

            if tokens.values().any(|t| t.token_hash == new_token.token_hash) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "auth_tokens_token_hash_key" }),
                ));
            }

            tokens.insert_with(|id| AuthToken {
                id,
                user_id: new_token.user_id,
                token_hash: new_token.token_hash,
                created_at: Utc::now(),
            })
        };

        self.observer.on_insert(AUTH_TOKENS_TABLE);

        Ok(token)
    }

    async fn find_user_id(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .db
            .auth_tokens
            .read()
            .await
            .values()
            .find(|t| t.token_hash == token_hash)
            .map(|t| t.user_id))
    }
}

/// In-memory retention repository.
pub struct MemoryRetentionRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryRetentionRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RetentionRepository for MemoryRetentionRepository {
    async fn list_tables(&self) -> Result<Vec<String>, AppError> {
        Ok(self.db.table_names())
    }

    async fn count(&self, table: &str) -> Result<u64, AppError> {
        self.db.count(table).await
    }

    async fn find_oldest(
        &self,
        table: &str,
        limit: u64,
        recency_candidates: &[&'static str],
    ) -> Result<Vec<RowHandle>, AppError> {
        self.db.oldest(table, limit, recency_candidates).await
    }

    async fn delete_rows(&self, table: &str, rows: &[RowHandle]) -> Result<u64, AppError> {
        self.db.remove_rows(table, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retention::NullInsertObserver;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        tables: Mutex<Vec<String>>,
    }

    impl InsertObserver for RecordingObserver {
        fn on_insert(&self, table: &str) {
            self.tables.lock().unwrap().push(table.to_string());
        }
    }

    #[tokio::test]
    async fn test_each_insert_is_reported_once() {
        let db = Arc::new(MemoryDatabase::new());
        let observer = Arc::new(RecordingObserver::default());
        let users = MemoryUserRepository::new(db.clone(), observer.clone());
        let categories = MemoryCategoryRepository::new(db.clone(), observer.clone());
        let articles = MemoryArticleRepository::new(db.clone(), observer.clone());

        let user = users
            .create(NewUser {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "salt$mac".to_string(),
            })
            .await
            .unwrap();
        let category = categories
            .create(NewCategory {
                name: "rust".to_string(),
                description: None,
            })
            .await
            .unwrap();
        articles
            .create(NewArticle {
                title: "Ownership".to_string(),
                body: "...".to_string(),
                category_id: Some(category.id),
                author_id: Some(user.id),
            })
            .await
            .unwrap();

        assert_eq!(
            *observer.tables.lock().unwrap(),
            vec!["users", "categories", "articles"]
        );
    }

    #[tokio::test]
    async fn test_failed_insert_is_not_reported() {
        let db = Arc::new(MemoryDatabase::new());
        let observer = Arc::new(RecordingObserver::default());
        let users = MemoryUserRepository::new(db, observer.clone());

        let new_user = || NewUser {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "salt$mac".to_string(),
        };

        users.create(new_user()).await.unwrap();
        let err = users.create(new_user()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(observer.tables.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_article_with_missing_category_is_rejected() {
        let db = Arc::new(MemoryDatabase::new());
        let articles = MemoryArticleRepository::new(db, Arc::new(NullInsertObserver));

        let err = articles
            .create(NewArticle {
                title: "t".to_string(),
                body: "b".to_string(),
                category_id: Some(99),
                author_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_retention_repository_removes_oldest_articles() {
        let db = Arc::new(MemoryDatabase::new());
        let articles = MemoryArticleRepository::new(db.clone(), Arc::new(NullInsertObserver));
        let retention = MemoryRetentionRepository::new(db);

        let mut ids = Vec::new();
        for i in 0..5 {
            let article = articles
                .create(NewArticle {
                    title: format!("t{i}"),
                    body: "b".to_string(),
                    category_id: None,
                    author_id: None,
                })
                .await
                .unwrap();
            ids.push(article.id);
        }

        let oldest = retention
            .find_oldest(ARTICLES_TABLE, 2, &["created_at", "create_time"])
            .await
            .unwrap();
        assert_eq!(oldest, vec![RowHandle(ids[0]), RowHandle(ids[1])]);

        let removed = retention.delete_rows(ARTICLES_TABLE, &oldest).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(retention.count(ARTICLES_TABLE).await.unwrap(), 3);
        assert_eq!(
            retention.list_tables().await.unwrap(),
            vec!["articles", "auth_tokens", "categories", "users"]
        );
    }

    #[tokio::test]
    async fn test_tokens_resolve_and_follow_their_user() {
        let db = Arc::new(MemoryDatabase::new());
        let observer = Arc::new(RecordingObserver::default());
        let users = MemoryUserRepository::new(db.clone(), observer.clone());
        let tokens = MemoryTokenRepository::new(db.clone(), observer.clone());

        let user = users
            .create(NewUser {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "salt$mac".to_string(),
            })
            .await
            .unwrap();
        tokens
            .create(NewAuthToken {
                user_id: user.id,
                token_hash: "abc".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(tokens.find_user_id("abc").await.unwrap(), Some(user.id));
        assert_eq!(
            users.find_credentials("ada").await.unwrap().unwrap().password_hash,
            "salt$mac"
        );
        assert_eq!(
            *observer.tables.lock().unwrap(),
            vec!["users", "auth_tokens"]
        );

        users.delete(user.id).await.unwrap();

        assert_eq!(tokens.find_user_id("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_for_missing_user_is_rejected() {
        let db = Arc::new(MemoryDatabase::new());
        let tokens = MemoryTokenRepository::new(db, Arc::new(NullInsertObserver));

        let err = tokens
            .create(NewAuthToken {
                user_id: 7,
                token_hash: "abc".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_article_insert_waits_for_referenced_tables() {
        let db = Arc::new(MemoryDatabase::new());
        let articles = MemoryArticleRepository::new(db.clone(), Arc::new(NullInsertObserver));

        let users_guard = db.users.write().await;
        let pending = tokio::spawn({
            let articles = Arc::new(articles);
            async move {
                articles
                    .create(NewArticle {
                        title: "t".to_string(),
                        body: "b".to_string(),
                        category_id: None,
                        author_id: None,
                    })
                    .await
            }
        });

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(db.articles.read().await.len(), 0);

        drop(users_guard);
        pending.await.unwrap().unwrap();
        assert_eq!(db.articles.read().await.len(), 1);
    }
}
