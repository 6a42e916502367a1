use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::repo_types::{Author, BlogPost, BlogPostChanges, NewBlogPost};
use crate::{
    auth::repo_types::User,
    error::ApiError,
    pagination::{PageQuery, Pagination},
    validation::Validator,
};

pub const EXCERPT_MAX: usize = 300;
pub const DEFAULT_READ_TIME: i32 = 5;
pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/100";

/// Lowercase ASCII words joined by single dashes.
pub fn slugify(title: &str) -> String {
    lazy_static! {
        static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    }
    NON_ALNUM
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub read_time: Option<i32>,
}

impl CreatePostRequest {
    /// The author is the admin creating the post.
    pub fn validate(self, author: &User) -> Result<NewBlogPost, ApiError> {
        let slug = self
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&self.title));

        Validator::new()
            .required(&self.title, "title", "Title is required")
            .required(&self.content, "content", "Content is required")
            .check(
                !self.excerpt.trim().is_empty()
                    && self.excerpt.trim().chars().count() <= EXCERPT_MAX,
                "excerpt",
                "Excerpt required (max 300 chars)",
            )
            .required(&self.cover_image, "coverImage", "Cover image is required")
            .required(&self.category, "category", "Category is required")
            .check(
                self.title.trim().is_empty() || !slug.is_empty(),
                "slug",
                "Title must contain letters or digits",
            )
            .check(
                self.read_time.map_or(true, |r| r > 0),
                "readTime",
                "Read time must be positive",
            )
            .finish()?;

        Ok(NewBlogPost {
            title: self.title.trim().to_string(),
            slug,
            content: self.content,
            excerpt: self.excerpt.trim().to_string(),
            cover_image: self.cover_image.trim().to_string(),
            author: Author {
                name: author.name.clone(),
                avatar: author
                    .avatar
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            },
            category: self.category.trim().to_string(),
            tags: self.tags,
            published: self.published,
            read_time: self.read_time.unwrap_or(DEFAULT_READ_TIME),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
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

impl UpdatePostRequest {
    pub fn validate(self) -> Result<BlogPostChanges, ApiError> {
        let slug = self.slug.as_deref().map(slugify);

        Validator::new()
            .check(
                self.title.as_deref().map_or(true, |t| !t.trim().is_empty()),
                "title",
                "Title cannot be empty",
            )
            .check(
                slug.as_deref().map_or(true, |s| !s.is_empty()),
                "slug",
                "Slug must contain letters or digits",
            )
            .check(
                self.excerpt
                    .as_deref()
                    .map_or(true, |e| e.trim().chars().count() <= EXCERPT_MAX),
                "excerpt",
                "Excerpt must be at most 300 chars",
            )
            .check(
                self.read_time.map_or(true, |r| r > 0),
                "readTime",
                "Read time must be positive",
            )
            .finish()?;

        Ok(BlogPostChanges {
            title: self.title.map(|t| t.trim().to_string()),
            slug,
            content: self.content,
            excerpt: self.excerpt.map(|e| e.trim().to_string()),
            cover_image: self.cover_image,
            category: self.category,
            tags: self.tags,
            published: self.published,
            read_time: self.read_time,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

impl ListPostsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<BlogPost>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{password::PasswordDigest, repo_types::Role};

    fn admin(avatar: Option<&str>) -> User {
        let now = time::OffsetDateTime::now_utc();
        User {
            id: uuid::Uuid::new_v4(),
            email: "writer@codingcouncil.com".into(),
            name: "Writer".into(),
            role: Role::Admin,
            avatar: avatar.map(str::to_string),
            password_hash: PasswordDigest::from_stored("$argon2id$stub".into()),
            refresh_token: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn post() -> CreatePostRequest {
        CreatePostRequest {
            title: "Rust at the Council: Week #1!".into(),
            content: "Ownership, borrowing and more.".into(),
            excerpt: "A recap".into(),
            cover_image: "https://cdn.example.com/rust.png".into(),
            category: "Recaps".into(),
            ..Default::default()
        }
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Rust at the Council: Week #1!"), "rust-at-the-council-week-1");
        assert_eq!(slugify("  --Hello__World--  "), "hello-world");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn create_derives_slug_and_author() {
        let new = post().validate(&admin(None)).unwrap();
        assert_eq!(new.slug, "rust-at-the-council-week-1");
        assert_eq!(new.author.name, "Writer");
        assert_eq!(new.author.avatar, DEFAULT_AVATAR);
        assert_eq!(new.read_time, DEFAULT_READ_TIME);
        assert!(!new.published);
    }

    #[test]
    fn explicit_slug_is_normalized() {
        let new = CreatePostRequest {
            slug: Some("My Custom Slug".into()),
            ..post()
        }
        .validate(&admin(Some("https://cdn.example.com/me.png")))
        .unwrap();
        assert_eq!(new.slug, "my-custom-slug");
        assert_eq!(new.author.avatar, "https://cdn.example.com/me.png");
    }

    #[test]
    fn create_requires_content_fields() {
        let err = CreatePostRequest::default()
            .validate(&admin(None))
            .unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["title", "content", "excerpt", "coverImage", "category"]);
    }
}
