//! Authentication Module
//!
//! Login by display name and user profile management.
//!
//! # Architecture
//!
//! - **`users`** - User queries (create, lookup, search, rename, last seen)
//! - **`handlers`** - HTTP handlers for session and profile endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User database operations
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── login.rs    - Login or register
//!     └── profile.rs  - Search, rename, photo
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: client posts a name, receives the user id
//! 2. **Requests**: client sends `Authorization: Bearer <user id>`
//! 3. **Check**: `middleware::auth` resolves the id and compares it to the
//!    `{id}` path segment
//!
//! There are no passwords. The id is the whole credential.

/// User database operations
pub mod users;

/// HTTP handlers for session and profile endpoints
pub mod handlers;

pub use handlers::{login, search_users, set_photo, set_username};
