//! Real-time Update Module
//!
//! WebSocket fan-out for new messages, deletions, reactions, conversation
//! changes and typing indicators.
//!
//! # Architecture
//!
//! - **`hub`** - connection registry and the single dispatch loop
//! - **`connection`** - reader and writer tasks for one socket
//! - **`handler`** - the `GET /ws` upgrade endpoint
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── hub.rs        - Registry, Hub handle, Dispatcher
//! ├── connection.rs - Per-connection reader/writer
//! └── handler.rs    - Upgrade handler
//! ```
//!
//! # Wire Format
//!
//! Every frame is a JSON text object `{"kind": "...", "payload": ...}`.
//! Handlers persist first, then call [`Hub::publish`]; the hub never touches
//! the database.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatline::backend::realtime::Hub;
//!
//! # async fn example() {
//! let hub = Hub::spawn(256);
//! hub.publish("message", serde_json::json!({"id": "m1"}));
//! # }
//! ```

/// Connection registry and dispatch loop
pub mod hub;

/// Per-connection reader and writer
pub mod connection;

/// WebSocket upgrade handler
pub mod handler;

pub use hub::{Connection, ConnectionId, Dispatcher, FanOut, Hub, Registry};
pub use handler::ws_upgrade;
