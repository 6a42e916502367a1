use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ApprovalFilter, NewReview, Review, ReviewChanges};
use crate::pagination::Page;

const REVIEW_COLUMNS: &str = "id, author_name, author_role, author_company, author_photo, \
                              content, rating, is_approved, is_featured, event_ref, approved_by, \
                              approved_at, created_at, updated_at";

pub const PUBLIC_LIMIT: i64 = 20;

/// Approved reviews, featured first, then newest.
pub async fn list_public(db: &PgPool) -> anyhow::Result<Vec<Review>> {
    let rows = sqlx::query_as::<_, Review>(&format!(
        r#"
        SELECT {REVIEW_COLUMNS}
          FROM reviews
         WHERE is_approved
         ORDER BY is_featured DESC, created_at DESC
         LIMIT $1
        "#
    ))
    .bind(PUBLIC_LIMIT)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_admin(
    db: &PgPool,
    approval: ApprovalFilter,
    featured: Option<bool>,
    page: Page,
) -> anyhow::Result<(Vec<Review>, i64)> {
    let approved = approval.as_flag();
    let (total,) = sqlx::query_as::<_, (i64,)>(
        r#"
        SELECT COUNT(*)
          FROM reviews
         WHERE ($1::boolean IS NULL OR is_approved = $1)
           AND ($2::boolean IS NULL OR is_featured = $2)
        "#,
    )
    .bind(approved)
    .bind(featured)
    .fetch_one(db)
    .await?;

    let rows = sqlx::query_as::<_, Review>(&format!(
        r#"
        SELECT {REVIEW_COLUMNS}
          FROM reviews
         WHERE ($1::boolean IS NULL OR is_approved = $1)
           AND ($2::boolean IS NULL OR is_featured = $2)
         ORDER BY created_at DESC
         LIMIT $3 OFFSET $4
        "#
    ))
    .bind(approved)
    .bind(featured)
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(db)
    .await?;
    Ok((rows, total))
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Reviews entered by an admin are approved on creation.
pub async fn insert(db: &PgPool, r: &NewReview, approved_by: Uuid) -> anyhow::Result<Review> {
    let row = sqlx::query_as::<_, Review>(&format!(
        r#"
        INSERT INTO reviews
            (author_name, author_role, author_company, author_photo, content, rating,
             is_approved, is_featured, event_ref, approved_by, approved_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8, $9, now())
        RETURNING {REVIEW_COLUMNS}
        "#
    ))
    .bind(&r.author_name)
    .bind(&r.author_role)
    .bind(&r.author_company)
    .bind(&r.author_photo)
    .bind(&r.content)
    .bind(r.rating)
    .bind(r.is_featured)
    .bind(r.event_ref)
    .bind(approved_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, c: &ReviewChanges) -> anyhow::Result<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(&format!(
        r#"
        UPDATE reviews SET
            author_name    = COALESCE($2, author_name),
            author_role    = COALESCE($3, author_role),
            author_company = COALESCE($4, author_company),
            author_photo   = COALESCE($5, author_photo),
            content        = COALESCE($6, content),
            rating         = COALESCE($7, rating),
            event_ref      = COALESCE($8, event_ref),
            updated_at     = now()
        WHERE id = $1
        RETURNING {REVIEW_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&c.author_name)
    .bind(&c.author_role)
    .bind(&c.author_company)
    .bind(&c.author_photo)
    .bind(&c.content)
    .bind(c.rating)
    .bind(c.event_ref)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Approving stamps the approver and time; rejecting keeps the last stamp.
pub async fn set_approved(
    db: &PgPool,
    id: Uuid,
    approved: bool,
    approver: Uuid,
) -> anyhow::Result<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(&format!(
        r#"
        UPDATE reviews SET
            is_approved = $2,
            approved_by = CASE WHEN $2 THEN $3 ELSE approved_by END,
            approved_at = CASE WHEN $2 THEN now() ELSE approved_at END,
            updated_at  = now()
        WHERE id = $1
        RETURNING {REVIEW_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(approved)
    .bind(approver)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn set_featured(db: &PgPool, id: Uuid, featured: bool) -> anyhow::Result<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(&format!(
        r#"
        UPDATE reviews SET is_featured = $2, updated_at = now()
        WHERE id = $1
        RETURNING {REVIEW_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(featured)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
