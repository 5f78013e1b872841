/**
 * User Model and Database Operations
 *
 * Users are created on first login by display name. The id is a UUIDv4
 * string and doubles as the bearer token.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub use crate::shared::messaging::User;

/// Create a new user
pub async fn create_user(pool: &SqlitePool, username: &str) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(username)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(User {
        id,
        username: username.to_string(),
        picture: None,
    })
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, picture
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, picture
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Return the user with this name, registering it if unknown
///
/// A concurrent registration of the same name loses the UNIQUE race and
/// falls back to reading the winner's row.
pub async fn login_or_create(pool: &SqlitePool, username: &str) -> Result<User, sqlx::Error> {
    if let Some(user) = get_user_by_username(pool, username).await? {
        return Ok(user);
    }

    match create_user(pool, username).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "[Auth] Registered new user");
            Ok(user)
        }
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            get_user_by_username(pool, username)
                .await?
                .ok_or(sqlx::Error::RowNotFound)
        }
        Err(e) => Err(e),
    }
}

/// Users whose name contains `query`, ordered by name; empty query lists all
pub async fn search_users(pool: &SqlitePool, query: &str) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, picture
        FROM users
        WHERE instr(lower(username), lower(?)) > 0 OR ? = ''
        ORDER BY username
        "#,
    )
    .bind(query)
    .bind(query)
    .fetch_all(pool)
    .await
}

/// Rename a user. A taken name surfaces as a UNIQUE violation.
pub async fn rename_user(pool: &SqlitePool, id: &str, username: &str) -> Result<(), sqlx::Error> {
    let result = sqlx::query("UPDATE users SET username = ? WHERE id = ?")
        .bind(username)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Set or replace a user's picture url
pub async fn set_user_picture(pool: &SqlitePool, id: &str, url: &str) -> Result<(), sqlx::Error> {
    let result = sqlx::query("UPDATE users SET picture = ? WHERE id = ?")
        .bind(url)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Record that `id` just connected. Unknown ids are ignored.
pub async fn touch_last_seen(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_seen = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Users whose last connection is later than `since`
pub async fn count_active_users(pool: &SqlitePool, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE last_seen IS NOT NULL AND julianday(last_seen) > julianday(?)",
    )
    .bind(since)
    .fetch_one(pool)
    .await
}

/// Number of registered users
pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}
