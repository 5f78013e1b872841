//! Contact list handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::ContactPath;
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::messaging::db::contacts as db;
use crate::backend::middleware::AuthUser;
use crate::shared::messaging::AddContactRequest;

/// POST /users/{id}/contacts
///
/// `409 Conflict` if the contact is already saved.
pub async fn add_contact(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Json(request): Json<AddContactRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let contact_id = request.contact_user_id.trim();
    if contact_id == user.id() {
        return Err(BackendError::bad_request("cannot add yourself as a contact"));
    }

    let contact = get_user_by_id(&pool, contact_id)
        .await?
        .ok_or_else(|| BackendError::not_found("user not found"))?;

    db::add_contact(&pool, user.id(), &contact.id).await?;
    tracing::info!(user_id = %user.id(), contact_id = %contact.id, "[Messaging] Contact added");

    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /users/{id}/contacts
pub async fn list_contacts(
    State(pool): State<SqlitePool>,
    user: AuthUser,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(db::list_contacts(&pool, user.id()).await?))
}

/// DELETE /users/{id}/contacts/{contact_id}
pub async fn remove_contact(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Path(path): Path<ContactPath>,
) -> ApiResult<StatusCode> {
    if !db::remove_contact(&pool, user.id(), &path.contact_id).await? {
        return Err(BackendError::not_found("contact not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
