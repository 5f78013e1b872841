//! Database operations for messaging
//!
//! Free async functions over a `SqlitePool`. They return `sqlx::Error`
//! and leave HTTP status decisions to the handlers.

pub mod contacts;
pub mod conversations;
pub mod messages;
