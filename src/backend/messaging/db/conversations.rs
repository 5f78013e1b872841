//! Conversation and membership queries

use chrono::Utc;
use sqlx::SqlitePool;

use super::messages::{last_message, unread_count};
use crate::shared::messaging::{Conversation, User};

/// A `conversations` row without its participants
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub is_group: bool,
}

/// Create a conversation and its participant rows in one transaction
pub async fn create_conversation(
    pool: &SqlitePool,
    members: &[String],
    name: Option<&str>,
    is_group: bool,
) -> Result<String, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO conversations (id, name, is_group, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(is_group)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for user_id in members {
        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id, joined_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(id)
}

/// Existing direct conversation between exactly `a` and `b`
pub async fn find_direct_conversation(
    pool: &SqlitePool,
    a: &str,
    b: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT c.id
        FROM conversations c
        JOIN conversation_participants pa ON pa.conversation_id = c.id AND pa.user_id = ?
        JOIN conversation_participants pb ON pb.conversation_id = c.id AND pb.user_id = ?
        WHERE c.is_group = 0
          AND (SELECT COUNT(*) FROM conversation_participants p WHERE p.conversation_id = c.id) = 2
        LIMIT 1
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_optional(pool)
    .await
}

pub async fn get_conversation_row(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Option<ConversationRow>, sqlx::Error> {
    sqlx::query_as::<_, ConversationRow>(
        "SELECT id, name, picture, is_group FROM conversations WHERE id = ?",
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await
}

/// Check if a user is a participant in a conversation
pub async fn is_participant(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM conversation_participants
        WHERE conversation_id = ? AND user_id = ?
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Members ordered by join time
pub async fn get_participants(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.picture
        FROM conversation_participants p
        JOIN users u ON u.id = p.user_id
        WHERE p.conversation_id = ?
        ORDER BY p.joined_at, u.username
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await
}

/// Participant ids, for event payloads
pub async fn get_participant_ids(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    Ok(get_participants(pool, conversation_id)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect())
}

/// Full conversation as seen by `viewer_id`
pub async fn load_conversation(
    pool: &SqlitePool,
    row: ConversationRow,
    viewer_id: &str,
) -> Result<Conversation, sqlx::Error> {
    let participants = get_participants(pool, &row.id).await?;
    let last_message = last_message(pool, &row.id).await?;
    let unread_count = unread_count(pool, &row.id, viewer_id).await?;

    Ok(Conversation {
        id: row.id,
        name: row.name,
        picture: row.picture,
        is_group: row.is_group,
        participants,
        last_message,
        unread_count,
    })
}

/// Every conversation of `user_id`, most recent activity first
pub async fn list_conversations(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Conversation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT c.id, c.name, c.picture, c.is_group
        FROM conversations c
        JOIN conversation_participants p ON p.conversation_id = c.id
        WHERE p.user_id = ?
        ORDER BY c.updated_at DESC, c.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut conversations = Vec::with_capacity(rows.len());
    for row in rows {
        conversations.push(load_conversation(pool, row, user_id).await?);
    }
    Ok(conversations)
}

/// Add a member; adding an existing member is a no-op
pub async fn add_participant(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO conversation_participants (conversation_id, user_id, joined_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;
    touch_conversation(pool, conversation_id).await
}

/// Remove a member. Returns true when the conversation was deleted because
/// nobody is left.
pub async fn remove_participant(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM conversation_participants WHERE conversation_id = ? AND user_id = ?")
        .bind(conversation_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let remaining: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM conversation_participants WHERE conversation_id = ?",
    )
    .bind(conversation_id)
    .fetch_one(&mut *tx)
    .await?;

    if remaining == 0 {
        sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(remaining == 0)
}

pub async fn set_group_name(
    pool: &SqlitePool,
    conversation_id: &str,
    name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE conversations SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(Utc::now())
        .bind(conversation_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_group_picture(
    pool: &SqlitePool,
    conversation_id: &str,
    url: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE conversations SET picture = ?, updated_at = ? WHERE id = ?")
        .bind(url)
        .bind(Utc::now())
        .bind(conversation_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Bump `updated_at` so the conversation sorts first
pub async fn touch_conversation<'e, E>(executor: E, conversation_id: &str) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(conversation_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn count_conversations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
        .fetch_one(pool)
        .await
}
