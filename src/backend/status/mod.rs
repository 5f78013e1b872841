//! Status Module
//!
//! API info, liveness and the admin diagnostics endpoints.

pub mod handlers;

pub use handlers::{admin_health, admin_online, admin_stats, api_root, format_uptime, liveness};
