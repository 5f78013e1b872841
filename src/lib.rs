// Increase recursion limit for complex async operations
#![recursion_limit = "256"]

//! Chatline - Main Library
//!
//! Chatline is a chat backend: a REST API over SQLite plus a WebSocket hub
//! that fans every change out to all connected clients.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by the server and its clients
//!   - Wire event envelope (`WsEvent`), messaging models, request bodies
//!   - Configuration (`AppConfig`)
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and routes
//!   - Realtime hub and WebSocket connections
//!   - Authentication middleware, users, conversations, contacts
//!   - SQLite persistence through sqlx
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend, Axum, sqlx and tracing setup
//!
//! # Usage
//!
//! ```rust,no_run
//! use chatline::backend::server::create_app;
//! use chatline::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let port = config.server_port;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Realtime Model
//!
//! Handlers persist a change first and then publish one `WsEvent` to the
//! hub. The hub's dispatch loop owns the connection registry and delivers
//! each event to every registered connection through a bounded queue. A
//! connection whose queue is full is disconnected rather than allowed to
//! stall the others.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
