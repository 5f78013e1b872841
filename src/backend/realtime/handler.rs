/**
 * WebSocket Upgrade Handler
 *
 * `GET /ws?userId=<id>` (or `?user_id=<id>`) upgrades to a realtime
 * connection tagged with that identifier. The identifier is not verified.
 * A missing or blank identifier is rejected with 400 before any upgrade.
 */

use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use super::connection::serve_connection;
use super::hub::Hub;
use crate::backend::auth::users;
use crate::backend::error::BackendError;

/// Query parameters of the upgrade request
#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
}

impl WsQuery {
    fn identifier(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// GET /ws
pub async fn ws_upgrade(
    State(hub): State<Hub>,
    State(db): State<SqlitePool>,
    query: Result<Query<WsQuery>, QueryRejection>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let Some(user_id) = query.identifier().map(str::to_string) else {
        tracing::warn!("[Realtime] Upgrade rejected: missing userId");
        return BackendError::bad_request("userId is required").into_response();
    };

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            tracing::warn!(user_id = %user_id, error = %rejection, "[Realtime] Upgrade rejected");
            return rejection.into_response();
        }
    };

    if let Err(err) = users::touch_last_seen(&db, &user_id).await {
        tracing::warn!(user_id = %user_id, error = %err, "[Realtime] Failed to record last seen");
    }

    tracing::info!(user_id = %user_id, "[Realtime] Upgrading connection");
    upgrade.on_upgrade(move |socket| serve_connection(socket, hub, user_id))
}
