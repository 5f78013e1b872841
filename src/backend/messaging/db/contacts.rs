//! Contact list queries

use chrono::Utc;
use sqlx::SqlitePool;

use crate::shared::messaging::User;

/// Insert a contact entry. A duplicate surfaces as a UNIQUE violation.
pub async fn add_contact(pool: &SqlitePool, user_id: &str, contact_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO contacts (id, user_id, contact_id, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(contact_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Contacts of `user_id` ordered by name
pub async fn list_contacts(pool: &SqlitePool, user_id: &str) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.picture
        FROM contacts c
        JOIN users u ON u.id = c.contact_id
        WHERE c.user_id = ?
        ORDER BY u.username
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns true if an entry was removed
pub async fn remove_contact(pool: &SqlitePool, user_id: &str, contact_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE user_id = ? AND contact_id = ?")
        .bind(user_id)
        .bind(contact_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
