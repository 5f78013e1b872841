//! Common test utilities and helpers
//!
//! - In-memory database pools with migrations applied
//! - A `TestApp` wrapping the full router in an `axum-test` server
//! - Request helpers for logging in and creating conversations

pub mod database;
pub mod fixtures;

pub use database::*;
pub use fixtures::*;
