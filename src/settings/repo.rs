use sqlx::{types::Json, PgConnection, PgPool};
use time::OffsetDateTime;

use super::repo_types::{Settings, SettingsRow, GLOBAL_KEY};

const SETTINGS_COLUMNS: &str = "key, home_page_content, social_links, community_stats, \
                                announcement_banner, updated_at";

/// Writes the initial record unless one already exists.
async fn ensure_row(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    let initial = Settings::initial(OffsetDateTime::now_utc());
    sqlx::query(
        r#"
        INSERT INTO settings
            (key, home_page_content, social_links, community_stats, announcement_banner)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (key) DO NOTHING
        "#,
    )
    .bind(GLOBAL_KEY)
    .bind(Json(&initial.home_page_content))
    .bind(Json(&initial.social_links))
    .bind(Json(&initial.community_stats))
    .bind(Json(&initial.announcement_banner))
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get_or_create(db: &PgPool) -> anyhow::Result<Settings> {
    let mut conn = db.acquire().await?;
    let existing = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM settings WHERE key = $1"
    ))
    .bind(GLOBAL_KEY)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(row) = existing {
        return Ok(row.into());
    }

    ensure_row(&mut *conn).await?;
    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM settings WHERE key = $1"
    ))
    .bind(GLOBAL_KEY)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

/// Locks the record, lets `change` edit it and writes every section back.
pub async fn update<F, E>(db: &PgPool, change: F) -> Result<Settings, E>
where
    F: FnOnce(&mut Settings) -> Result<(), E>,
    E: From<sqlx::Error>,
{
    let mut tx = db.begin().await?;
    ensure_row(&mut *tx).await?;
    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM settings WHERE key = $1 FOR UPDATE"
    ))
    .bind(GLOBAL_KEY)
    .fetch_one(&mut *tx)
    .await?;

    let mut settings = Settings::from(row);
    change(&mut settings)?;

    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        r#"
        UPDATE settings
           SET home_page_content = $2,
               social_links = $3,
               community_stats = $4,
               announcement_banner = $5,
               updated_at = now()
         WHERE key = $1
        RETURNING {SETTINGS_COLUMNS}
        "#
    ))
    .bind(GLOBAL_KEY)
    .bind(Json(&settings.home_page_content))
    .bind(Json(&settings.social_links))
    .bind(Json(&settings.community_stats))
    .bind(Json(&settings.announcement_banner))
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(row.into())
}
