/**
 * Login Handler
 *
 * `POST /session` logs in by display name, registering the name on first
 * use. The returned identifier is the user id and is used as the bearer
 * token on every authenticated route.
 *
 * # Example Request
 *
 * ```http
 * POST /session HTTP/1.1
 * Content-Type: application/json
 *
 * {"name": "maria"}
 * ```
 *
 * # Example Response
 *
 * ```http
 * HTTP/1.1 201 Created
 *
 * {"identifier": "6f1c9a6e-3f5e-4d55-9a55-3c1d2b1b8e11"}
 * ```
 */

use axum::{extract::State, http::StatusCode, Json};
use sqlx::SqlitePool;

use crate::backend::auth::users::login_or_create;
use crate::backend::error::ApiResult;
use crate::shared::messaging::{validate_username, LoginRequest, LoginResponse};

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - name shorter than 3 or longer than 16 characters
/// * `500 Internal Server Error` - database failure
pub async fn login(
    State(pool): State<SqlitePool>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    let name = validate_username(&request.name).map_err(|e| {
        tracing::warn!(name = %request.name, "[Auth] Rejected login name");
        e
    })?;

    let user = login_or_create(&pool, &name).await?;
    tracing::info!(user_id = %user.id, "[Auth] Login");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            identifier: user.id,
        }),
    ))
}
