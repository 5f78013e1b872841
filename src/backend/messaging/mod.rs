//! Messaging Module
//!
//! Conversations, messages, reactions, comments and contacts.
//!
//! # Module Structure
//!
//! ```text
//! messaging/
//! ├── mod.rs        - Module exports
//! ├── db/           - SQLite queries
//! │   ├── conversations.rs
//! │   ├── messages.rs
//! │   └── contacts.rs
//! └── handlers/     - HTTP handlers, one file per resource
//! ```
//!
//! Handlers write through `db` and then publish a `WsEvent` on the hub so
//! connected clients can refresh.

pub mod db;
pub mod handlers;

pub use handlers::*;
