//! Messaging HTTP Handlers
//!
//! Conversations, messages, reactions, comments and contacts. Every handler
//! sits behind the auth middleware and receives the caller as `AuthUser`.
//! Handlers persist first and publish to the hub afterwards.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs            - Path types and membership guards
//! ├── conversations.rs  - create, list, get, members, name, photo
//! ├── messages.rs       - send, delete, forward, reactions, comments
//! └── contacts.rs       - add, list, remove
//! ```

use serde::Deserialize;
use sqlx::SqlitePool;

use super::db::conversations::{get_conversation_row, is_participant, ConversationRow};
use super::db::messages::{get_message, MessageRow};
use crate::backend::error::{ApiResult, BackendError};

pub mod contacts;
pub mod conversations;
pub mod messages;

pub use contacts::{add_contact, list_contacts, remove_contact};
pub use conversations::{
    add_member, create_conversation, get_conversation, get_messages, leave_group,
    list_conversations, set_group_name, set_group_photo,
};
pub use messages::{
    add_comment, delete_comment, delete_message, forward_message, react_to_message,
    remove_reaction, send_message,
};

/// `/users/{id}/conversations/{conversation_id}`
#[derive(Debug, Deserialize)]
pub struct ConversationPath {
    pub id: String,
    pub conversation_id: String,
}

/// `…/messages/{message_id}`
#[derive(Debug, Deserialize)]
pub struct MessagePath {
    pub id: String,
    pub conversation_id: String,
    pub message_id: String,
}

/// `…/reaction/{emoji}`
#[derive(Debug, Deserialize)]
pub struct ReactionPath {
    pub id: String,
    pub conversation_id: String,
    pub message_id: String,
    pub emoji: String,
}

/// `…/comments/{comment_id}`
#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub id: String,
    pub conversation_id: String,
    pub message_id: String,
    pub comment_id: String,
}

/// `/users/{id}/contacts/{contact_id}`
#[derive(Debug, Deserialize)]
pub struct ContactPath {
    pub id: String,
    pub contact_id: String,
}

/// 404 if the conversation does not exist, 403 if `user_id` is not in it
pub(crate) async fn require_member(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> ApiResult<ConversationRow> {
    let row = get_conversation_row(pool, conversation_id)
        .await?
        .ok_or_else(|| BackendError::not_found("conversation not found"))?;

    if !is_participant(pool, conversation_id, user_id).await? {
        tracing::warn!(
            user_id = %user_id,
            conversation_id = %conversation_id,
            "[Messaging] Caller is not a member"
        );
        return Err(BackendError::forbidden("not a member of this conversation"));
    }
    Ok(row)
}

/// Like `require_member`, and additionally 400 for direct conversations
pub(crate) async fn require_group_member(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> ApiResult<ConversationRow> {
    let row = require_member(pool, conversation_id, user_id).await?;
    if !row.is_group {
        return Err(BackendError::bad_request("not a group conversation"));
    }
    Ok(row)
}

/// 404 unless the message exists in this conversation
pub(crate) async fn require_message(
    pool: &SqlitePool,
    conversation_id: &str,
    message_id: &str,
) -> ApiResult<MessageRow> {
    match get_message(pool, message_id).await? {
        Some(message) if message.conversation_id == conversation_id => Ok(message),
        _ => Err(BackendError::not_found("message not found")),
    }
}
