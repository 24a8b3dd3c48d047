//! API route configuration.

use crate::api::handlers::{
    create_article_handler, create_category_handler, create_user_handler, delete_article_handler,
    delete_category_handler, delete_user_handler, evict_table_handler, get_article_handler,
    get_category_handler, get_user_handler, list_articles_handler, list_categories_handler,
    list_users_handler, login_handler, me_handler, retention_status_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `GET    /users`                    - List users (paginated)
/// - `POST   /users`                    - Create a user
/// - `GET    /users/{id}`               - Fetch one user
/// - `DELETE /users/{id}`               - Delete a user
/// - `GET    /categories`               - List categories (paginated)
/// - `POST   /categories`               - Create a category
/// - `GET    /categories/{id}`          - Fetch one category
/// - `DELETE /categories/{id}`          - Delete a category
/// - `GET    /articles`                 - List articles (paginated, optional `category_id`)
/// - `POST   /articles`                 - Publish an article
/// - `GET    /articles/{id}`            - Fetch one article
/// - `DELETE /articles/{id}`            - Delete an article
/// - `POST   /login`                    - Exchange credentials for a bearer token
/// - `GET    /me`                       - The user behind the bearer token
/// - `GET    /retention`                - Retention policy and per-table counters
/// - `POST   /retention/{table}/evict`  - Evict one batch from a table now
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler).delete(delete_user_handler),
        )
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/categories/{id}",
            get(get_category_handler).delete(delete_category_handler),
        )
        .route(
            "/articles",
            get(list_articles_handler).post(create_article_handler),
        )
        .route(
            "/articles/{id}",
            get(get_article_handler).delete(delete_article_handler),
        )
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .route("/retention", get(retention_status_handler))
        .route("/retention/{table}/evict", post(evict_table_handler))
}
