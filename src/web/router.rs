//! Router configuration for the favorites API.

use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_favorite, add_group, delete_favorite, delete_group, list_favorites, list_groups,
    modify_favorites, move_favorites, rename_group, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let user_routes = Router::new()
        .route(
            "/favorites",
            get(list_favorites)
                .post(add_favorite)
                .put(modify_favorites)
                .delete(delete_favorite),
        )
        .route(
            "/favorite_group",
            get(list_groups)
                .post(add_group)
                .put(rename_group)
                .delete(delete_group),
        )
        .route("/favorite_group/move", put(move_favorites));

    let api_routes = Router::new().nest("/user", user_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::favorite::FavoriteLimits;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }

    #[tokio::test]
    async fn test_create_router() {
        let db = Database::open_in_memory().await.unwrap();
        let state = Arc::new(AppState::new(Arc::new(db), FavoriteLimits::default()));
        let _router = create_router(state, &[]);
    }
}
