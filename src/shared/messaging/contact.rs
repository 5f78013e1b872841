//! Contact request types
//!
//! A contact entry links an owner to another user. Contacts are returned as
//! plain `User` values.

use serde::{Deserialize, Serialize};

/// Body of `POST /users/{id}/contacts`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContactRequest {
    pub contact_user_id: String,
}
