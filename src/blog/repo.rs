use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{BlogPost, BlogPostChanges, BlogPostRow, NewBlogPost};
use crate::{db::StoreError, pagination::Page};

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, cover_image, author_name, \
                            author_avatar, category, tags, published, published_at, read_time, \
                            views, created_at, updated_at";

/// Same as [`POST_COLUMNS`] with the body left out.
const SUMMARY_COLUMNS: &str = "id, title, slug, NULL::text AS content, excerpt, cover_image, \
                               author_name, author_avatar, category, tags, published, \
                               published_at, read_time, views, created_at, updated_at";

pub async fn list_published(
    db: &PgPool,
    category: Option<&str>,
    page: Page,
) -> anyhow::Result<(Vec<BlogPost>, i64)> {
    let (total,) = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM blog_posts WHERE published AND ($1::text IS NULL OR category = $1)",
    )
    .bind(category)
    .fetch_one(db)
    .await?;

    let rows = sqlx::query_as::<_, BlogPostRow>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
          FROM blog_posts
         WHERE published AND ($1::text IS NULL OR category = $1)
         ORDER BY published_at DESC NULLS LAST
         LIMIT $2 OFFSET $3
        "#
    ))
    .bind(category)
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(db)
    .await?;

    Ok((rows.into_iter().map(BlogPost::from).collect(), total))
}

pub async fn list_all(db: &PgPool, page: Page) -> anyhow::Result<(Vec<BlogPost>, i64)> {
    let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM blog_posts")
        .fetch_one(db)
        .await?;

    let rows = sqlx::query_as::<_, BlogPostRow>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
          FROM blog_posts
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2
        "#
    ))
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(db)
    .await?;

    Ok((rows.into_iter().map(BlogPost::from).collect(), total))
}

/// Returns the published post and counts the view in the same statement.
pub async fn view_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<BlogPost>> {
    let row = sqlx::query_as::<_, BlogPostRow>(&format!(
        r#"
        UPDATE blog_posts
           SET views = views + 1
         WHERE slug = $1 AND published
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(slug)
    .fetch_optional(db)
    .await?;
    Ok(row.map(BlogPost::from))
}

pub async fn categories(db: &PgPool) -> anyhow::Result<Vec<String>> {
    let rows = sqlx::query_as::<_, (String,)>(
        "SELECT DISTINCT category FROM blog_posts WHERE published ORDER BY category",
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

/// `StoreError::Duplicate` when the slug is taken.
pub async fn insert(db: &PgPool, p: &NewBlogPost) -> Result<BlogPost, StoreError> {
    let row = sqlx::query_as::<_, BlogPostRow>(&format!(
        r#"
        INSERT INTO blog_posts
            (title, slug, content, excerpt, cover_image, author_name, author_avatar, category,
             tags, published, published_at, read_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, CASE WHEN $10 THEN now() END, $11)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(&p.title)
    .bind(&p.slug)
    .bind(&p.content)
    .bind(&p.excerpt)
    .bind(&p.cover_image)
    .bind(&p.author.name)
    .bind(&p.author.avatar)
    .bind(&p.category)
    .bind(&p.tags)
    .bind(p.published)
    .bind(p.read_time)
    .fetch_one(db)
    .await?;
    Ok(row.into())
}

/// `published_at` is stamped the first time a post becomes published.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    c: &BlogPostChanges,
) -> Result<Option<BlogPost>, StoreError> {
    let row = sqlx::query_as::<_, BlogPostRow>(&format!(
        r#"
        UPDATE blog_posts SET
            title        = COALESCE($2, title),
            slug         = COALESCE($3, slug),
            content      = COALESCE($4, content),
            excerpt      = COALESCE($5, excerpt),
            cover_image  = COALESCE($6, cover_image),
            category     = COALESCE($7, category),
            tags         = COALESCE($8, tags),
            published    = COALESCE($9, published),
            published_at = CASE
                               WHEN COALESCE($9, published) AND published_at IS NULL THEN now()
                               ELSE published_at
                           END,
            read_time    = COALESCE($10, read_time),
            updated_at   = now()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&c.title)
    .bind(&c.slug)
    .bind(&c.content)
    .bind(&c.excerpt)
    .bind(&c.cover_image)
    .bind(&c.category)
    .bind(&c.tags)
    .bind(c.published)
    .bind(c.read_time)
    .fetch_optional(db)
    .await?;
    Ok(row.map(BlogPost::from))
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
