use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{
    dto::OrderEntry,
    repo_types::{NewTeamMember, TeamMember, TeamMemberChanges, TeamMemberRow},
};

const MEMBER_COLUMNS: &str = "id, name, role, bio, image, year, social, sort_order, active, \
                              display_in_top6, member_category, created_at, updated_at";

fn into_members(rows: Vec<TeamMemberRow>) -> anyhow::Result<Vec<TeamMember>> {
    rows.into_iter().map(TeamMember::try_from).collect()
}

pub async fn list(db: &PgPool, include_inactive: bool) -> anyhow::Result<Vec<TeamMember>> {
    let rows = sqlx::query_as::<_, TeamMemberRow>(&format!(
        r#"
        SELECT {MEMBER_COLUMNS}
          FROM team_members
         WHERE $1 OR active
         ORDER BY sort_order ASC, created_at ASC
        "#
    ))
    .bind(include_inactive)
    .fetch_all(db)
    .await?;
    into_members(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<TeamMember>> {
    let row = sqlx::query_as::<_, TeamMemberRow>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM team_members WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    row.map(TeamMember::try_from).transpose()
}

pub async fn insert(db: &PgPool, m: &NewTeamMember) -> anyhow::Result<TeamMember> {
    let row = sqlx::query_as::<_, TeamMemberRow>(&format!(
        r#"
        INSERT INTO team_members
            (name, role, bio, image, year, social, sort_order, active, display_in_top6,
             member_category)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(&m.name)
    .bind(&m.role)
    .bind(&m.bio)
    .bind(&m.image)
    .bind(&m.year)
    .bind(Json(&m.social))
    .bind(m.order)
    .bind(m.active)
    .bind(m.display_in_top6)
    .bind(m.member_category.map(|c| c.as_str()))
    .fetch_one(db)
    .await?;
    TeamMember::try_from(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    c: &TeamMemberChanges,
) -> anyhow::Result<Option<TeamMember>> {
    let row = sqlx::query_as::<_, TeamMemberRow>(&format!(
        r#"
        UPDATE team_members SET
            name            = COALESCE($2, name),
            role            = COALESCE($3, role),
            bio             = COALESCE($4, bio),
            image           = COALESCE($5, image),
            year            = COALESCE($6, year),
            social          = COALESCE($7, social),
            sort_order      = COALESCE($8, sort_order),
            active          = COALESCE($9, active),
            display_in_top6 = COALESCE($10, display_in_top6),
            member_category = COALESCE($11, member_category),
            updated_at      = now()
        WHERE id = $1
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&c.name)
    .bind(&c.role)
    .bind(&c.bio)
    .bind(&c.image)
    .bind(&c.year)
    .bind(c.social.as_ref().map(Json))
    .bind(c.order)
    .bind(c.active)
    .bind(c.display_in_top6)
    .bind(c.member_category.map(|m| m.as_str()))
    .fetch_optional(db)
    .await?;
    row.map(TeamMember::try_from).transpose()
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM team_members WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Writes every position in one transaction; unknown ids are skipped.
pub async fn reorder(db: &PgPool, entries: &[OrderEntry]) -> anyhow::Result<u64> {
    let mut tx = db.begin().await?;
    let mut touched = 0;
    for entry in entries {
        let res = sqlx::query(
            "UPDATE team_members SET sort_order = $2, updated_at = now() WHERE id = $1",
        )
        .bind(entry.id)
        .bind(entry.order)
        .execute(&mut *tx)
        .await?;
        touched += res.rows_affected();
    }
    tx.commit().await?;
    Ok(touched)
}
