//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;

use treehole::config::DatabaseConfig;
use treehole::web::handlers::AppState;
use treehole::web::{create_health_router, create_router};
use treehole::{Access, Database, FavoriteLimits};

/// Open a file database in a fresh temporary directory.
///
/// The directory must outlive the database.
pub async fn open_file_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("treehole.db").to_string_lossy().into_owned(),
        ..Default::default()
    };
    let db = Database::open(&config).await.unwrap();
    (dir, db)
}

/// Open a file database with itself attached as a read replica.
pub async fn open_file_db_with_replica() -> (TempDir, Database) {
    let (dir, db) = open_file_db().await;
    db.close().await;

    let path = dir.path().join("treehole.db").to_string_lossy().into_owned();
    let config = DatabaseConfig {
        replica_paths: vec![path.clone()],
        path,
        ..Default::default()
    };
    let db = Database::open(&config).await.unwrap();
    (dir, db)
}

/// Insert a hole and return its id.
pub async fn create_hole(db: &Database) -> i64 {
    sqlx::query_scalar("INSERT INTO holes DEFAULT VALUES RETURNING id")
        .fetch_one(db.pool(Access::Write))
        .await
        .unwrap()
}

/// Insert `count` holes and return their ids in creation order.
pub async fn create_holes(db: &Database, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(create_hole(db).await);
    }
    ids
}

/// Build a test server over an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<Database>) {
    create_test_server_with_limits(FavoriteLimits::default()).await
}

/// Build a test server with custom favorite limits.
pub async fn create_test_server_with_limits(
    limits: FavoriteLimits,
) -> (TestServer, Arc<Database>) {
    let db = Arc::new(Database::open_in_memory().await.unwrap());
    let state = Arc::new(AppState::new(db.clone(), limits));
    let router = create_router(state, &[]).merge(create_health_router());
    let server = TestServer::new(router).unwrap();
    (server, db)
}
