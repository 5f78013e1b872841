/**
 * Status and Admin Handlers
 *
 * Unauthenticated read-only views of the running server. Counts come from
 * the database; connection figures come from the hub snapshot, so they can
 * trail the dispatch loop by one membership change.
 */

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::backend::auth::users::{count_active_users, count_users};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::messaging::db::conversations::count_conversations;
use crate::backend::messaging::db::messages::count_messages;
use crate::backend::realtime::Hub;
use crate::backend::server::config::ping;
use crate::backend::server::state::AppState;

pub const API_NAME: &str = "Chatline API";

/// How far back a connection counts towards `activeUsers`
pub const ACTIVE_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub database: String,
    pub websocket: String,
    pub api: String,
    pub uptime: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_users: i64,
    /// Users connected within the last `ACTIVE_WINDOW_HOURS`
    pub active_users: i64,
    pub total_conversations: i64,
    pub total_messages: i64,
    pub active_connections: usize,
}

/// GET /
pub async fn api_root() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: API_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

/// GET /liveness
pub async fn liveness(State(pool): State<SqlitePool>) -> ApiResult<StatusCode> {
    ping(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "[Status] Database ping failed");
        BackendError::state("database unavailable")
    })?;
    Ok(StatusCode::OK)
}

/// GET /admin/health
pub async fn admin_health(State(state): State<AppState>) -> Json<HealthReport> {
    let database = match ping(&state.db).await {
        Ok(()) => "Healthy",
        Err(e) => {
            tracing::error!(error = %e, "[Status] Database ping failed");
            "Error"
        }
    };

    let websocket = if state.hub.connection_count() > 0 {
        "Active"
    } else {
        "Idle"
    };

    Json(HealthReport {
        database: database.to_string(),
        websocket: websocket.to_string(),
        api: "Running".to_string(),
        uptime: format_uptime(state.started_at.elapsed()),
    })
}

/// GET /admin/online
pub async fn admin_online(State(hub): State<Hub>) -> Json<Vec<String>> {
    Json(hub.online_users())
}

/// GET /admin/stats
pub async fn admin_stats(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
) -> ApiResult<Json<StatsReport>> {
    Ok(Json(StatsReport {
        total_users: count_users(&pool).await?,
        active_users: count_active_users(&pool, active_since()).await?,
        total_conversations: count_conversations(&pool).await?,
        total_messages: count_messages(&pool).await?,
        active_connections: hub.connection_count(),
    }))
}

fn active_since() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now() - chrono::Duration::hours(ACTIVE_WINDOW_HOURS)
}

/// Human-readable uptime, coarsest unit first
pub fn format_uptime(uptime: Duration) -> String {
    let total_minutes = uptime.as_secs() / 60;
    if total_minutes == 0 {
        return "Less than a minute".to_string();
    }

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{} days, {} hours, {} minutes", days, hours, minutes)
    } else if hours > 0 {
        format!("{} hours, {} minutes", hours, minutes)
    } else {
        format!("{} minutes", minutes)
    }
}
