//! Message, reaction, comment and read-receipt queries

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::conversations::touch_conversation;
use crate::shared::messaging::{ChatMessage, Comment, Reaction};

/// A `messages` row joined with the sender's name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_username: String,
    pub content: String,
    pub image_url: Option<String>,
    pub forwarded: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            sender_username: self.sender_username,
            text: self.content,
            image_url: self.image_url,
            time: self.created_at,
            forwarded: self.forwarded,
            reactions: Vec::new(),
            comments: Vec::new(),
            read_by: Vec::new(),
        }
    }
}

const MESSAGE_COLUMNS: &str = r#"
    SELECT m.id, m.conversation_id, m.sender_id, u.username AS sender_username,
           m.content, m.image_url, m.forwarded, m.created_at
    FROM messages m
    JOIN users u ON u.id = m.sender_id
"#;

/// Persist a message and bump its conversation in one transaction.
/// Returns the new id.
pub async fn record_message(
    pool: &SqlitePool,
    conversation_id: &str,
    sender_id: &str,
    content: &str,
    image_url: Option<&str>,
    forwarded: bool,
) -> Result<String, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO messages (id, conversation_id, sender_id, content, image_url, forwarded, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(conversation_id)
    .bind(sender_id)
    .bind(content)
    .bind(image_url)
    .bind(forwarded)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    touch_conversation(&mut *tx, conversation_id).await?;
    tx.commit().await?;
    Ok(id)
}

pub async fn get_message(pool: &SqlitePool, message_id: &str) -> Result<Option<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(&format!("{MESSAGE_COLUMNS} WHERE m.id = ?"))
        .bind(message_id)
        .fetch_optional(pool)
        .await
}

/// Message with its reactions, comments and read receipts
pub async fn load_message(pool: &SqlitePool, message_id: &str) -> Result<Option<ChatMessage>, sqlx::Error> {
    let Some(row) = get_message(pool, message_id).await? else {
        return Ok(None);
    };
    let conversation_id = row.conversation_id.clone();
    let mut messages = hydrate(pool, &conversation_id, vec![row]).await?;
    Ok(messages.pop())
}

/// Messages of a conversation, oldest first, fully populated
pub async fn list_messages(pool: &SqlitePool, conversation_id: &str) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MessageRow>(&format!(
        "{MESSAGE_COLUMNS} WHERE m.conversation_id = ? ORDER BY m.created_at, m.rowid"
    ))
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    hydrate(pool, conversation_id, rows).await
}

/// Newest message of a conversation
pub async fn last_message(pool: &SqlitePool, conversation_id: &str) -> Result<Option<ChatMessage>, sqlx::Error> {
    let row = sqlx::query_as::<_, MessageRow>(&format!(
        "{MESSAGE_COLUMNS} WHERE m.conversation_id = ? ORDER BY m.created_at DESC, m.rowid DESC LIMIT 1"
    ))
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(hydrate(pool, conversation_id, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Attach reactions, comments and read receipts, three queries per call
async fn hydrate(
    pool: &SqlitePool,
    conversation_id: &str,
    rows: Vec<MessageRow>,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut reactions: HashMap<String, Vec<Reaction>> = HashMap::new();
    let reaction_rows: Vec<(String, String, String)> = sqlx::query_as(
        r#"
        SELECT r.message_id, r.user_id, r.emoji
        FROM reactions r
        JOIN messages m ON m.id = r.message_id
        WHERE m.conversation_id = ?
        ORDER BY r.created_at, r.rowid
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;
    for (message_id, user_id, emoji) in reaction_rows {
        reactions.entry(message_id).or_default().push(Reaction { user_id, emoji });
    }

    let mut comments: HashMap<String, Vec<Comment>> = HashMap::new();
    let comment_rows: Vec<(String, String, String, String, String, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT c.message_id, c.id, c.sender_id, u.username, c.content, c.created_at
        FROM comments c
        JOIN messages m ON m.id = c.message_id
        JOIN users u ON u.id = c.sender_id
        WHERE m.conversation_id = ?
        ORDER BY c.created_at, c.rowid
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;
    for (message_id, id, sender_id, sender_username, text, time) in comment_rows {
        comments.entry(message_id).or_default().push(Comment {
            id,
            sender_id,
            sender_username,
            text,
            time,
        });
    }

    let mut read_by: HashMap<String, Vec<String>> = HashMap::new();
    let read_rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT r.message_id, r.user_id
        FROM read_status r
        JOIN messages m ON m.id = r.message_id
        WHERE m.conversation_id = ?
        ORDER BY r.read_at, r.user_id
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;
    for (message_id, user_id) in read_rows {
        read_by.entry(message_id).or_default().push(user_id);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut message = row.into_message();
            message.reactions = reactions.remove(&message.id).unwrap_or_default();
            message.comments = comments.remove(&message.id).unwrap_or_default();
            message.read_by = read_by.remove(&message.id).unwrap_or_default();
            message
        })
        .collect())
}

pub async fn delete_message(pool: &SqlitePool, message_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Add the reaction if absent, remove it if present. Returns whether it is
/// present afterwards.
pub async fn toggle_reaction(
    pool: &SqlitePool,
    message_id: &str,
    user_id: &str,
    emoji: &str,
) -> Result<bool, sqlx::Error> {
    if remove_reaction(pool, message_id, user_id, emoji).await? {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO reactions (id, message_id, user_id, emoji, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(message_id)
    .bind(user_id)
    .bind(emoji)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(true)
}

/// Returns true if a reaction was removed
pub async fn remove_reaction(
    pool: &SqlitePool,
    message_id: &str,
    user_id: &str,
    emoji: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reactions WHERE message_id = ? AND user_id = ? AND emoji = ?")
        .bind(message_id)
        .bind(user_id)
        .bind(emoji)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn add_comment(
    pool: &SqlitePool,
    message_id: &str,
    sender_id: &str,
    content: &str,
) -> Result<String, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO comments (id, message_id, sender_id, content, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(message_id)
    .bind(sender_id)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(id)
}

/// `(message_id, sender_id)` of a comment
pub async fn get_comment_owner(
    pool: &SqlitePool,
    comment_id: &str,
) -> Result<Option<(String, String)>, sqlx::Error> {
    sqlx::query_as("SELECT message_id, sender_id FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_comment(pool: &SqlitePool, comment_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Record read receipts for every message in the conversation sent by
/// someone else. Returns the number of newly read messages.
pub async fn mark_conversation_read(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO read_status (message_id, user_id, read_at)
        SELECT m.id, ?, ?
        FROM messages m
        WHERE m.conversation_id = ? AND m.sender_id != ?
        "#,
    )
    .bind(user_id)
    .bind(Utc::now())
    .bind(conversation_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Messages from others in the conversation that `user_id` has not read
pub async fn unread_count(pool: &SqlitePool, conversation_id: &str, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM messages m
        LEFT JOIN read_status r ON r.message_id = m.id AND r.user_id = ?
        WHERE m.conversation_id = ? AND m.sender_id != ? AND r.message_id IS NULL
        "#,
    )
    .bind(user_id)
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn count_messages(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(pool)
        .await
}
