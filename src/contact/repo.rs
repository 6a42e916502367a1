use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ContactMessage, ContactRow, ContactStatus, NewContactMessage};
use crate::pagination::Page;

const CONTACT_COLUMNS: &str =
    "id, name, email, phone, subject, message, status, created_at, updated_at";

pub async fn insert(db: &PgPool, m: &NewContactMessage) -> anyhow::Result<ContactMessage> {
    let row = sqlx::query_as::<_, ContactRow>(&format!(
        r#"
        INSERT INTO contact_messages (name, email, phone, subject, message)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CONTACT_COLUMNS}
        "#
    ))
    .bind(&m.name)
    .bind(&m.email)
    .bind(&m.phone)
    .bind(&m.subject)
    .bind(&m.message)
    .fetch_one(db)
    .await?;
    ContactMessage::try_from(row)
}

pub async fn list(
    db: &PgPool,
    status: Option<ContactStatus>,
    page: Page,
) -> anyhow::Result<(Vec<ContactMessage>, i64)> {
    let status = status.map(|s| s.as_str());
    let (total,) = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM contact_messages WHERE ($1::text IS NULL OR status = $1)",
    )
    .bind(status)
    .fetch_one(db)
    .await?;

    let rows = sqlx::query_as::<_, ContactRow>(&format!(
        r#"
        SELECT {CONTACT_COLUMNS}
          FROM contact_messages
         WHERE ($1::text IS NULL OR status = $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3
        "#
    ))
    .bind(status)
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(db)
    .await?;

    let contacts = rows
        .into_iter()
        .map(ContactMessage::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((contacts, total))
}

pub async fn update_status(
    db: &PgPool,
    id: Uuid,
    status: ContactStatus,
) -> anyhow::Result<Option<ContactMessage>> {
    let row = sqlx::query_as::<_, ContactRow>(&format!(
        r#"
        UPDATE contact_messages SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {CONTACT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(db)
    .await?;
    row.map(ContactMessage::try_from).transpose()
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
