/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container, holding:
 * - the SQLite connection pool
 * - the realtime `Hub` handle
 * - the loaded configuration
 * - the process start time (for uptime reporting)
 *
 * Every field is cheap to clone. Handlers extract only the part they need:
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use chatline::backend::realtime::Hub;
 *
 * async fn handler(State(hub): State<Hub>) {
 *     hub.publish("conversation_updated", serde_json::json!({}));
 * }
 * ```
 */

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::realtime::Hub;
use crate::shared::AppConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Realtime fan-out hub
    ///
    /// Handlers persist first, then publish through this handle.
    pub hub: Hub,

    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// When the server started
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: SqlitePool, hub: Hub, config: AppConfig) -> Self {
        Self {
            db,
            hub,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for Hub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
