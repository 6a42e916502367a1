use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

/// A post as stored. Listings leave `content` out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub excerpt: String,
    pub cover_image: String,
    pub author: Author,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub read_time: i32,
    pub views: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub(crate) struct BlogPostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub excerpt: String,
    pub cover_image: String,
    pub author_name: String,
    pub author_avatar: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<OffsetDateTime>,
    pub read_time: i32,
    pub views: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<BlogPostRow> for BlogPost {
    fn from(r: BlogPostRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            slug: r.slug,
            content: r.content,
            excerpt: r.excerpt,
            cover_image: r.cover_image,
            author: Author {
                name: r.author_name,
                avatar: r.author_avatar,
            },
            category: r.category,
            tags: r.tags,
            published: r.published,
            published_at: r.published_at,
            read_time: r.read_time,
            views: r.views,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub author: Author,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub read_time: i32,
}

#[derive(Debug, Clone, Default)]
pub struct BlogPostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub read_time: Option<i32>,
}
