/**
 * Profile Handlers
 *
 * - `GET /users?username=` - search users by name fragment (public)
 * - `PUT /users/{id}` - rename, body is a bare JSON string
 * - `PUT /users/{id}/photo` - set picture url, body is a bare JSON string
 */

use axum::{
    extract::{Query, State},
    Json,
};
use sqlx::SqlitePool;

use crate::backend::auth::users::{self, User};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::shared::messaging::{validate_username, UserSearchQuery};

/// List users whose name contains the query
pub async fn search_users(
    State(pool): State<SqlitePool>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let users = users::search_users(&pool, query.username.trim()).await?;
    Ok(Json(users))
}

/// Rename the caller
///
/// `409 Conflict` when the name belongs to someone else.
pub async fn set_username(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Json(name): Json<String>,
) -> ApiResult<Json<User>> {
    let name = validate_username(&name)?;

    if let Some(existing) = users::get_user_by_username(&pool, &name).await? {
        if existing.id != user.id() {
            tracing::warn!(user_id = %user.id(), "[Auth] Username already taken");
            return Err(BackendError::conflict("username already in use"));
        }
    }

    users::rename_user(&pool, user.id(), &name).await?;
    tracing::info!(user_id = %user.id(), "[Auth] Username changed");

    let updated = users::get_user_by_id(&pool, user.id())
        .await?
        .ok_or_else(|| BackendError::not_found("user not found"))?;
    Ok(Json(updated))
}

/// Set the caller's picture
pub async fn set_photo(
    State(pool): State<SqlitePool>,
    user: AuthUser,
    Json(url): Json<String>,
) -> ApiResult<Json<User>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(BackendError::bad_request("photo url is required"));
    }

    users::set_user_picture(&pool, user.id(), url).await?;

    let updated = users::get_user_by_id(&pool, user.id())
        .await?
        .ok_or_else(|| BackendError::not_found("user not found"))?;
    Ok(Json(updated))
}
