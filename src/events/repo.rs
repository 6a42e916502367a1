use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{
    dto::EventFilter,
    repo_types::{Event, EventChanges, EventRow, NewEvent},
};
use crate::pagination::Page;

const EVENT_COLUMNS: &str = "id, title, description, short_description, date, end_date, time, \
                             mode, location, category, status, image, registration_link, \
                             max_participants, tags, winners, gallery, featured, priority, \
                             timezone, last_modified_by, last_modified_at, created_at, updated_at";

const FILTER: &str = "($1::text IS NULL OR status = $1) \
                      AND ($2::text IS NULL OR category = $2) \
                      AND ($3::boolean IS NULL OR featured = $3)";

pub async fn list(
    db: &PgPool,
    filter: &EventFilter,
    page: Page,
) -> anyhow::Result<(Vec<Event>, i64)> {
    let status = filter.status.map(|s| s.as_str());
    let category = filter.category.map(|c| c.as_str());

    let (total,) =
        sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM events WHERE {FILTER}"))
            .bind(status)
            .bind(category)
            .bind(filter.featured)
            .fetch_one(db)
            .await?;

    let order = if filter.newest_first() { "DESC" } else { "ASC" };
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
          FROM events
         WHERE {FILTER}
         ORDER BY date {order}
         LIMIT $4 OFFSET $5
        "#
    ))
    .bind(status)
    .bind(category)
    .bind(filter.featured)
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(db)
    .await?;

    let events = rows
        .into_iter()
        .map(Event::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((events, total))
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Event>> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    row.map(Event::try_from).transpose()
}

pub async fn insert(db: &PgPool, e: &NewEvent) -> anyhow::Result<Event> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        INSERT INTO events
            (title, description, short_description, date, end_date, time, mode, location,
             category, status, image, registration_link, max_participants, tags, winners,
             gallery, featured, priority, timezone)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(&e.title)
    .bind(&e.description)
    .bind(&e.short_description)
    .bind(e.date)
    .bind(e.end_date)
    .bind(&e.time)
    .bind(e.mode.as_str())
    .bind(&e.location)
    .bind(e.category.as_str())
    .bind(e.status.as_str())
    .bind(&e.image)
    .bind(&e.registration_link)
    .bind(e.max_participants)
    .bind(&e.tags)
    .bind(Json(&e.winners))
    .bind(&e.gallery)
    .bind(e.featured)
    .bind(e.priority)
    .bind(&e.timezone)
    .fetch_one(db)
    .await?;
    Event::try_from(row)
}

/// Applies the present fields and stamps who changed the event.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    c: &EventChanges,
    modified_by: &str,
) -> anyhow::Result<Option<Event>> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        UPDATE events SET
            title             = COALESCE($2, title),
            description       = COALESCE($3, description),
            short_description = COALESCE($4, short_description),
            date              = COALESCE($5, date),
            end_date          = COALESCE($6, end_date),
            time              = COALESCE($7, time),
            mode              = COALESCE($8, mode),
            location          = COALESCE($9, location),
            category          = COALESCE($10, category),
            status            = COALESCE($11, status),
            image             = COALESCE($12, image),
            registration_link = COALESCE($13, registration_link),
            max_participants  = COALESCE($14, max_participants),
            tags              = COALESCE($15, tags),
            winners           = COALESCE($16, winners),
            gallery           = COALESCE($17, gallery),
            featured          = COALESCE($18, featured),
            priority          = COALESCE($19, priority),
            timezone          = COALESCE($20, timezone),
            last_modified_by  = $21,
            last_modified_at  = now(),
            updated_at        = now()
        WHERE id = $1
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&c.title)
    .bind(&c.description)
    .bind(&c.short_description)
    .bind(c.date)
    .bind(c.end_date)
    .bind(&c.time)
    .bind(c.mode.map(|m| m.as_str()))
    .bind(&c.location)
    .bind(c.category.map(|m| m.as_str()))
    .bind(c.status.map(|m| m.as_str()))
    .bind(&c.image)
    .bind(&c.registration_link)
    .bind(c.max_participants)
    .bind(&c.tags)
    .bind(c.winners.as_ref().map(Json))
    .bind(&c.gallery)
    .bind(c.featured)
    .bind(c.priority)
    .bind(&c.timezone)
    .bind(modified_by)
    .fetch_optional(db)
    .await?;
    row.map(Event::try_from).transpose()
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
