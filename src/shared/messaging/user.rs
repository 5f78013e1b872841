//! User Data Structure
//!
//! Users are identified by a UUID string and addressed by a unique display
//! name. Logging in with an unknown name registers it.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 16;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Body of `POST /session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

/// Response of `POST /session`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub identifier: String,
}

/// Query of `GET /users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub username: String,
}

/// Check a display name and return it trimmed
///
/// Length is counted in characters, not bytes.
pub fn validate_username(name: &str) -> Result<String, SharedError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(SharedError::validation(
            "name",
            format!(
                "must be between {} and {} characters",
                MIN_NAME_LEN, MAX_NAME_LEN
            ),
        ));
    }
    Ok(name.to_string())
}
