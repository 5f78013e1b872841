//! Database test fixtures
//!
//! Every test gets its own private in-memory SQLite database, so there is
//! nothing to clean up between tests.

use chatline::backend::server::config::connect_in_memory;
use sqlx::SqlitePool;

/// Fresh migrated in-memory pool
pub async fn create_test_pool() -> SqlitePool {
    connect_in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Insert a user directly, bypassing the HTTP layer
pub async fn insert_user(pool: &SqlitePool, username: &str) -> String {
    chatline::backend::auth::users::create_user(pool, username)
        .await
        .expect("Failed to create test user")
        .id
}
