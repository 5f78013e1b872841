//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs              - Module exports and documentation
//! ├── router.rs           - Main router creation
//! ├── status_routes.rs    - API info, liveness, admin diagnostics
//! ├── realtime_routes.rs  - WebSocket upgrade
//! └── api_routes.rs       - Session, users, conversations, contacts
//! ```
//!
//! # Authentication
//!
//! Only the `/users/{id}/…` tree is wrapped by `auth_middleware`.
//! `/session`, `GET /users`, `/ws`, `/` and `/admin/*` are public.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatline::backend::routes::create_router;
//! use chatline::backend::server::{build_state, config::connect_in_memory};
//! use chatline::shared::AppConfig;
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let pool = connect_in_memory().await?;
//! let router = create_router(build_state(pool, AppConfig::default()));
//! # let _ = router;
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// Public status and admin routes
pub mod status_routes;

/// WebSocket upgrade route
pub mod realtime_routes;

/// REST API routes
pub mod api_routes;

pub use router::create_router;
