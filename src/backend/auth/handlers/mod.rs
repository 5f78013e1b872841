//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── login.rs    - POST /session
//! └── profile.rs  - user search, rename, photo
//! ```
//!
//! # Handlers
//!
//! - **`login`** - POST /session - login or register by name
//! - **`search_users`** - GET /users?username=
//! - **`set_username`** - PUT /users/{id}
//! - **`set_photo`** - PUT /users/{id}/photo

/// Login handler
pub mod login;

/// Profile handlers
pub mod profile;

pub use login::login;
pub use profile::{search_users, set_photo, set_username};
