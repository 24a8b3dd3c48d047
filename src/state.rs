//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    ArticleService, AuthService, CategoryService, CredentialHasher, RetentionService, UserService,
};
use crate::domain::repositories::{
    ArticleRepository, CategoryRepository, TokenRepository, UserRepository,
};
use crate::domain::retention::{Evictor, RetentionTracker};
use crate::infrastructure::persistence::Repositories;

/// Services shared across requests.
///
/// Services hold trait objects so one state type serves both storage
/// backends.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub category_service: Arc<CategoryService<dyn CategoryRepository>>,
    pub article_service:
        Arc<ArticleService<dyn ArticleRepository, dyn CategoryRepository, dyn UserRepository>>,
    pub auth_service: Arc<AuthService<dyn UserRepository, dyn TokenRepository>>,
    pub retention_service: Arc<RetentionService>,
}

impl AppState {
    pub fn new(
        repositories: &Repositories,
        signing_secret: String,
        tracker: Arc<RetentionTracker>,
        evictor: Arc<Evictor>,
    ) -> Self {
        let hasher = Arc::new(CredentialHasher::new(signing_secret));

        Self {
            user_service: Arc::new(UserService::new(repositories.users.clone(), hasher.clone())),
            category_service: Arc::new(CategoryService::new(repositories.categories.clone())),
            article_service: Arc::new(ArticleService::new(
                repositories.articles.clone(),
                repositories.categories.clone(),
                repositories.users.clone(),
            )),
            auth_service: Arc::new(AuthService::new(
                repositories.users.clone(),
                repositories.tokens.clone(),
                hasher,
            )),
            retention_service: Arc::new(RetentionService::new(
                tracker,
                evictor,
                repositories.retention.clone(),
            )),
        }
    }
}
