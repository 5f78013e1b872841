//! Conversation handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::{require_group_member, require_member, ConversationPath};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::messaging::db::conversations::{self as db, ConversationRow};
use crate::backend::messaging::db::messages::{list_messages, mark_conversation_read};
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::Hub;
use crate::shared::messaging::{
    AddMemberRequest, ChatMessage, Conversation, ConversationDetail, CreateConversationRequest,
};
use crate::shared::EventKind;

async fn publish_updated(pool: &SqlitePool, hub: &Hub, conversation_id: &str) -> ApiResult<()> {
    let participants = db::get_participant_ids(pool, conversation_id).await?;
    hub.publish(
        EventKind::ConversationUpdated,
        serde_json::json!({
            "conversationId": conversation_id,
            "participants": participants,
        }),
    );
    Ok(())
}

async fn reload(pool: &SqlitePool, conversation_id: &str, viewer: &str) -> ApiResult<Conversation> {
    let row = db::get_conversation_row(pool, conversation_id)
        .await?
        .ok_or_else(|| BackendError::not_found("conversation not found"))?;
    Ok(db::load_conversation(pool, row, viewer).await?)
}

/// POST /users/{id}/conversations
///
/// The caller is always a member. Two members without a name make a direct
/// conversation, reused if one already exists for the pair.
pub async fn create_conversation(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Json(request): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let members = request.members(user.id());
    if members.len() < 2 {
        return Err(BackendError::bad_request(
            "a conversation needs at least one other participant",
        ));
    }

    for member in &members[1..] {
        if get_user_by_id(&pool, member).await?.is_none() {
            return Err(BackendError::not_found(format!("user {} not found", member)));
        }
    }

    let name = request.group_name();
    let is_group = members.len() > 2 || name.is_some();

    if !is_group {
        if let Some(existing) = db::find_direct_conversation(&pool, &members[0], &members[1]).await? {
            tracing::debug!(conversation_id = %existing, "[Messaging] Reusing direct conversation");
            let conversation = reload(&pool, &existing, user.id()).await?;
            return Ok((StatusCode::CREATED, Json(conversation)));
        }
    }

    let conversation_id = db::create_conversation(&pool, &members, name.as_deref(), is_group).await?;
    tracing::info!(
        conversation_id = %conversation_id,
        user_id = %user.id(),
        is_group,
        "[Messaging] Conversation created"
    );

    publish_updated(&pool, &hub, &conversation_id).await?;
    let conversation = reload(&pool, &conversation_id, user.id()).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// GET /users/{id}/conversations
pub async fn list_conversations(
    State(pool): State<SqlitePool>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Conversation>>> {
    Ok(Json(db::list_conversations(&pool, user.id()).await?))
}

/// GET /users/{id}/conversations/{conversation_id}
///
/// Opening a conversation marks its messages read for the caller.
pub async fn get_conversation(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
) -> ApiResult<Json<ConversationDetail>> {
    let row: ConversationRow = require_member(&pool, &path.conversation_id, user.id()).await?;

    let newly_read = mark_conversation_read(&pool, &path.conversation_id, user.id()).await?;
    if newly_read > 0 {
        tracing::debug!(
            conversation_id = %path.conversation_id,
            user_id = %user.id(),
            newly_read,
            "[Messaging] Marked messages read"
        );
    }

    let messages = list_messages(&pool, &path.conversation_id).await?;
    let conversation = db::load_conversation(&pool, row, user.id()).await?;
    Ok(Json(ConversationDetail {
        conversation,
        messages,
    }))
}

/// GET /users/{id}/conversations/{conversation_id}/messages
pub async fn get_messages(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    require_member(&pool, &path.conversation_id, user.id()).await?;
    Ok(Json(list_messages(&pool, &path.conversation_id).await?))
}

/// POST …/{conversation_id}/members
pub async fn add_member(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
    Json(request): Json<AddMemberRequest>,
) -> ApiResult<Json<Conversation>> {
    require_group_member(&pool, &path.conversation_id, user.id()).await?;

    let new_member = request.user_id.trim();
    if get_user_by_id(&pool, new_member).await?.is_none() {
        return Err(BackendError::not_found("user not found"));
    }

    db::add_participant(&pool, &path.conversation_id, new_member).await?;
    tracing::info!(
        conversation_id = %path.conversation_id,
        user_id = %new_member,
        "[Messaging] Member added"
    );

    publish_updated(&pool, &hub, &path.conversation_id).await?;
    Ok(Json(reload(&pool, &path.conversation_id, user.id()).await?))
}

/// DELETE …/{conversation_id}/members
///
/// The caller leaves. The last member leaving deletes the conversation.
pub async fn leave_group(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
) -> ApiResult<StatusCode> {
    require_group_member(&pool, &path.conversation_id, user.id()).await?;

    let deleted = db::remove_participant(&pool, &path.conversation_id, user.id()).await?;
    tracing::info!(
        conversation_id = %path.conversation_id,
        user_id = %user.id(),
        deleted,
        "[Messaging] Member left"
    );

    if deleted {
        hub.publish(
            EventKind::ConversationUpdated,
            serde_json::json!({
                "conversationId": path.conversation_id,
                "participants": [],
                "deleted": true,
            }),
        );
    } else {
        publish_updated(&pool, &hub, &path.conversation_id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT …/{conversation_id}/name
pub async fn set_group_name(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
    Json(name): Json<String>,
) -> ApiResult<Json<Conversation>> {
    require_group_member(&pool, &path.conversation_id, user.id()).await?;

    let name = name.trim();
    if name.is_empty() {
        return Err(BackendError::bad_request("group name is required"));
    }

    db::set_group_name(&pool, &path.conversation_id, name).await?;
    publish_updated(&pool, &hub, &path.conversation_id).await?;
    Ok(Json(reload(&pool, &path.conversation_id, user.id()).await?))
}

/// PUT …/{conversation_id}/photo
pub async fn set_group_photo(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    user: AuthUser,
    Path(path): Path<ConversationPath>,
    Json(url): Json<String>,
) -> ApiResult<Json<Conversation>> {
    require_group_member(&pool, &path.conversation_id, user.id()).await?;

    let url = url.trim();
    if url.is_empty() {
        return Err(BackendError::bad_request("photo url is required"));
    }

    db::set_group_picture(&pool, &path.conversation_id, url).await?;
    publish_updated(&pool, &hub, &path.conversation_id).await?;
    Ok(Json(reload(&pool, &path.conversation_id, user.id()).await?))
}
