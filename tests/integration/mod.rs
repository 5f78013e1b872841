//! Integration tests
//!
//! - `api_test` - REST endpoints through `axum-test`
//! - `ws_test` - WebSocket clients against a real listener
//! - `hub_test` - hub dispatch through its public handle

mod api_test;
mod hub_test;
mod ws_test;
