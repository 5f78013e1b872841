//! Router Configuration
//!
//! Combines the route groups into a single Axum router.
//!
//! # Route Order
//!
//! 1. Status routes (`/`, `/liveness`, `/admin/*`)
//! 2. Realtime route (`/ws`)
//! 3. API routes (session, users, conversations, contacts)
//! 4. Static files under `/static`, when `STATIC_DIR` is configured
//! 5. Fallback handler (JSON 404)

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::routes::status_routes::configure_status_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();
    let router = configure_status_routes(router);
    let router = configure_realtime_routes(router);
    let router = configure_api_routes(router, app_state.clone());

    let router = match &app_state.config.static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static files under /static");
            router.nest_service("/static", ServeDir::new(dir))
        }
        None => router,
    };

    router
        .fallback(|| async { BackendError::not_found("route not found") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
