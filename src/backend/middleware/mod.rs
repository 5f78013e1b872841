//! Middleware Module
//!
//! HTTP middleware and extractors applied before handlers run.
//!
//! - **`auth`** - bearer-token authentication for `/users/{id}/…` routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use chatline::backend::middleware::{auth_middleware, AuthUser};
//! use chatline::backend::server::AppState;
//!
//! async fn whoami(user: AuthUser) -> String {
//!     user.0.username
//! }
//!
//! fn routes(state: AppState) -> Router<AppState> {
//!     Router::new()
//!         .route("/users/{id}/whoami", get(whoami))
//!         .route_layer(from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthUser, AuthenticatedUser};
