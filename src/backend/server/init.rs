/**
 * Server Initialization
 *
 * Builds the application state and the router.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and run migrations (fatal on failure)
 * 2. Spawn the realtime hub's dispatch loop
 * 3. Assemble `AppState`
 * 4. Create the router with all routes and middleware
 *
 * Must be called inside a Tokio runtime, since the hub spawns a task.
 */

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::realtime::Hub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application from configuration
pub async fn create_app(config: AppConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing chatline backend server");

    let db = load_database(&config.database_url).await?;
    Ok(create_app_with_pool(db, config))
}

/// Create the application around an existing pool
pub fn create_app_with_pool(db: SqlitePool, config: AppConfig) -> Router<()> {
    create_router(build_state(db, config))
}

/// Spawn the hub and assemble the shared state
pub fn build_state(db: SqlitePool, config: AppConfig) -> AppState {
    let hub = Hub::spawn(config.hub_queue_capacity);
    tracing::info!(
        queue_capacity = hub.queue_capacity(),
        "Realtime hub started"
    );
    AppState::new(db, hub, config)
}
