//! Shared Module
//!
//! Types shared by the HTTP layer, the realtime hub and the tests. Nothing in
//! here touches the network or the database.
//!
//! # Overview
//!
//! - `event` - the `{kind, payload}` frame carried over `/ws`
//! - `messaging` - REST request and response bodies
//! - `config` - layered application configuration
//! - `error` - validation and serialization errors

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Messaging types for users, conversations and messages
pub mod messaging;

pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{EventKind, WsEvent};
