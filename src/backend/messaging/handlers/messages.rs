//! Message, reaction and comment handlers
//!
//! Each successful mutation publishes one event to every connection:
//!
//! | handler            | event              |
//! |--------------------|--------------------|
//! | `send_message`     | `message`          |
//! | `forward_message`  | `message`          |
//! | `delete_message`   | `message_deleted`  |
//! | `react_to_message` | `reaction_added` or `reaction_removed` |
//! | `remove_reaction`  | `reaction_removed` |
//!
//! Comments are stored but not broadcast.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::{require_member, require_message, CommentPath, ConversationPath, MessagePath, ReactionPath};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::messaging::db::messages as db;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::Hub;
use crate::shared::messaging::{
    CommentRequest, CreatedResponse, ForwardMessageRequest, ReactionRequest, ReactionResponse,
    SendMessageRequest,
};
use crate::shared::EventKind;

/// Load the stored message and broadcast it as a `message` event
async fn publish_message(pool: &SqlitePool, hub: &Hub, message_id: &str) -> ApiResult<()> {
    let message = db::load_message(pool, message_id)
        .await?
        .ok_or_else(|| BackendError::state("message vanished after insert"))?;
    hub.publish(EventKind::Message, serde_json::to_value(&message)?);
    Ok(())
}

fn publish_reaction(hub: &Hub, kind: EventKind, path: &MessagePath, user_id: &str, emoji: &str) {
    hub.publish(
        kind,
        serde_json::json!({
            "messageId": path.message_id,
            "conversationId": path.conversation_id,
            "userId": user_id,
            "emoji": emoji,
        }),
    );
}

/// POST …/{conversation_id}/messages
pub async fn send_message(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    request.validate()?;

    let image_url = request
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    let id = db::record_message(
        &pool,
        &path.conversation_id,
        user.id(),
        &request.content,
        image_url,
        false,
    )
    .await?;

    tracing::info!(
        message_id = %id,
        conversation_id = %path.conversation_id,
        sender_id = %user.id(),
        "[Messaging] Message stored"
    );

    publish_message(&pool, &hub, &id).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// DELETE …/messages/{message_id}
///
/// Only the sender may delete.
pub async fn delete_message(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<MessagePath>,
) -> ApiResult<StatusCode> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    let message = require_message(&pool, &path.conversation_id, &path.message_id).await?;

    if message.sender_id != user.id() {
        return Err(BackendError::forbidden("only the sender can delete a message"));
    }

    db::delete_message(&pool, &path.message_id).await?;
    tracing::info!(message_id = %path.message_id, "[Messaging] Message deleted");

    hub.publish(
        EventKind::MessageDeleted,
        serde_json::json!({
            "messageId": path.message_id,
            "conversationId": path.conversation_id,
        }),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST …/messages/{message_id}/forward
///
/// The caller must belong to both the source and the target conversation.
pub async fn forward_message(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<MessagePath>,
    Json(request): Json<ForwardMessageRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    let original = require_message(&pool, &path.conversation_id, &path.message_id).await?;
    require_member(&pool, &request.conversation_id, user.id()).await?;

    let id = db::record_message(
        &pool,
        &request.conversation_id,
        user.id(),
        &original.content,
        original.image_url.as_deref(),
        true,
    )
    .await?;

    tracing::info!(
        message_id = %id,
        source_id = %original.id,
        conversation_id = %request.conversation_id,
        "[Messaging] Message forwarded"
    );

    publish_message(&pool, &hub, &id).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST …/messages/{message_id}/reaction
///
/// Toggles: reacting twice with the same emoji removes the reaction.
pub async fn react_to_message(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<MessagePath>,
    Json(request): Json<ReactionRequest>,
) -> ApiResult<(StatusCode, Json<ReactionResponse>)> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    require_message(&pool, &path.conversation_id, &path.message_id).await?;

    let emoji = request.emoji.trim();
    if emoji.is_empty() {
        return Err(BackendError::bad_request("emoji is required"));
    }

    let active = db::toggle_reaction(&pool, &path.message_id, user.id(), emoji).await?;
    let kind = if active {
        EventKind::ReactionAdded
    } else {
        EventKind::ReactionRemoved
    };
    publish_reaction(&hub, kind, &path, user.id(), emoji);

    Ok((StatusCode::CREATED, Json(ReactionResponse { active })))
}

/// DELETE …/messages/{message_id}/reaction/{emoji}
pub async fn remove_reaction(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<ReactionPath>,
) -> ApiResult<StatusCode> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    require_message(&pool, &path.conversation_id, &path.message_id).await?;

    if db::remove_reaction(&pool, &path.message_id, user.id(), &path.emoji).await? {
        let message_path = MessagePath {
            id: path.id,
            conversation_id: path.conversation_id,
            message_id: path.message_id,
        };
        publish_reaction(&hub, EventKind::ReactionRemoved, &message_path, user.id(), &path.emoji);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST …/messages/{message_id}/comments
pub async fn add_comment(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Path(path): Path<MessagePath>,
    Json(request): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    require_message(&pool, &path.conversation_id, &path.message_id).await?;

    let text = request.comment.trim();
    if text.is_empty() {
        return Err(BackendError::bad_request("comment text is required"));
    }

    let id = db::add_comment(&pool, &path.message_id, user.id(), text).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// DELETE …/comments/{comment_id}
///
/// Only the author may delete.
pub async fn delete_comment(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Path(path): Path<CommentPath>,
) -> ApiResult<StatusCode> {
    require_member(&pool, &path.conversation_id, user.id()).await?;

    let (message_id, author) = db::get_comment_owner(&pool, &path.comment_id)
        .await?
        .filter(|(message_id, _)| *message_id == path.message_id)
        .ok_or_else(|| BackendError::not_found("comment not found"))?;
    require_message(&pool, &path.conversation_id, &message_id).await?;

    if author != user.id() {
        return Err(BackendError::forbidden("only the author can delete a comment"));
    }

    db::delete_comment(&pool, &path.comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
