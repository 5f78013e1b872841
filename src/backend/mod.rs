//! Backend Module
//!
//! All server-side code for chatline: the Axum HTTP server, the realtime
//! hub, authentication and SQLite persistence.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database setup
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`realtime`** - Hub dispatch loop and WebSocket connections
//! - **`auth`** - Login by name, user queries, profile handlers
//! - **`middleware`** - Bearer-token authentication
//! - **`messaging`** - Conversations, messages, reactions, comments, contacts
//! - **`status`** - API info, liveness, admin diagnostics
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Initialization, state, database
//! ├── routes/         - Route configuration
//! ├── realtime/       - Hub and WebSocket handling
//! ├── auth/           - Users and login
//! ├── middleware/     - Request middleware
//! ├── messaging/      - Chat data and handlers
//! ├── status/         - Health and admin endpoints
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` carries the SQLite pool, the hub handle, the configuration and
//! the start time. Handlers extract only the parts they need through
//! `FromRef`. The hub's registry is owned by its dispatch task and is never
//! shared; readers see a snapshot behind a lock.
//!
//! # Error Handling
//!
//! Handlers return `ApiResult<T>`. `BackendError` renders as
//! `{"error": ..., "status": ...}` with the matching status code, and
//! database errors are reported with a generic message.

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Realtime hub and WebSocket connections
#[cfg(feature = "ssr")]
pub mod realtime;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Authentication and user management
#[cfg(feature = "ssr")]
pub mod auth;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Conversations, messages and contacts
#[cfg(feature = "ssr")]
pub mod messaging;

/// Health and admin endpoints
#[cfg(feature = "ssr")]
pub mod status;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use server::{create_app, AppState};
#[cfg(feature = "ssr")]
pub use realtime::Hub;
#[cfg(feature = "ssr")]
pub use error::{ApiResult, BackendError};
