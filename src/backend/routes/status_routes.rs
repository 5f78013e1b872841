//! Status and admin routes
//!
//! - `GET /` - API info
//! - `GET /liveness` - database ping
//! - `GET /admin/health` - database, websocket, api, uptime
//! - `GET /admin/online` - online user ids
//! - `GET /admin/stats` - row counts and live connections

use axum::{routing::get, Router};

use crate::backend::server::state::AppState;
use crate::backend::status::{admin_health, admin_online, admin_stats, api_root, liveness};

pub fn configure_status_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(api_root))
        .route("/liveness", get(liveness))
        .route("/admin/health", get(admin_health))
        .route("/admin/online", get(admin_online))
        .route("/admin/stats", get(admin_stats))
}
