//! Realtime route
//!
//! `GET /ws?userId=<id>` upgrades to a WebSocket attached to the hub.

use axum::{routing::get, Router};

use crate::backend::realtime::ws_upgrade;
use crate::backend::server::state::AppState;

pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/ws", get(ws_upgrade))
}
