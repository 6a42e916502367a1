use serde::Deserialize;
use uuid::Uuid;

use super::repo_types::{ApprovalFilter, NewReview, ReviewChanges};
use crate::{error::ApiError, pagination::PageQuery, validation::Validator};

pub const CONTENT_MAX: usize = 1000;

fn rating_ok(rating: i64) -> bool {
    (1..=5).contains(&rating)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub author_name: String,
    pub author_role: Option<String>,
    pub author_company: Option<String>,
    pub author_photo: Option<String>,
    #[serde(default)]
    pub content: String,
    pub rating: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,
    pub event_ref: Option<Uuid>,
}

impl CreateReviewRequest {
    pub fn validate(self) -> Result<NewReview, ApiError> {
        Validator::new()
            .required(&self.author_name, "authorName", "Author name is required")
            .required(&self.content, "content", "Content is required")
            .max_chars(
                self.content.trim(),
                CONTENT_MAX,
                "content",
                "Content must be at most 1000 characters",
            )
            .check(
                self.rating.map_or(false, rating_ok),
                "rating",
                "Rating must be between 1 and 5",
            )
            .optional_url(self.author_photo.as_deref(), "authorPhoto", "Invalid photo URL")
            .finish()?;

        Ok(NewReview {
            author_name: self.author_name.trim().to_string(),
            author_role: trimmed(self.author_role),
            author_company: trimmed(self.author_company),
            author_photo: trimmed(self.author_photo),
            content: self.content.trim().to_string(),
            rating: self.rating.unwrap_or_default() as i16,
            is_featured: self.is_featured,
            event_ref: self.event_ref,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub author_name: Option<String>,
    pub author_role: Option<String>,
    pub author_company: Option<String>,
    pub author_photo: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i64>,
    pub event_ref: Option<Uuid>,
}

impl UpdateReviewRequest {
    pub fn validate(self) -> Result<ReviewChanges, ApiError> {
        Validator::new()
            .check(
                self.author_name.as_deref().map_or(true, |n| !n.trim().is_empty()),
                "authorName",
                "Author name cannot be empty",
            )
            .check(
                self.content.as_deref().map_or(true, |c| {
                    let c = c.trim();
                    !c.is_empty() && c.chars().count() <= CONTENT_MAX
                }),
                "content",
                "Content must be 1 to 1000 characters",
            )
            .check(
                self.rating.map_or(true, rating_ok),
                "rating",
                "Rating must be between 1 and 5",
            )
            .optional_url(self.author_photo.as_deref(), "authorPhoto", "Invalid photo URL")
            .finish()?;

        Ok(ReviewChanges {
            author_name: self.author_name.map(|n| n.trim().to_string()),
            author_role: self.author_role,
            author_company: self.author_company,
            author_photo: self.author_photo,
            content: self.content.map(|c| c.trim().to_string()),
            rating: self.rating.map(|r| r as i16),
            event_ref: self.event_ref,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminReviewsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub featured: Option<String>,
}

impl AdminReviewsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Anything other than `approved` or `pending` lists every review.
    pub fn approval(&self) -> ApprovalFilter {
        match self.status.as_deref() {
            Some("approved") => ApprovalFilter::Approved,
            Some("pending") => ApprovalFilter::Pending,
            _ => ApprovalFilter::All,
        }
    }

    pub fn featured(&self) -> Option<bool> {
        self.featured.as_deref().map(|v| v == "true")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    #[serde(default)]
    pub is_approved: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    #[serde(default)]
    pub is_featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_one_to_five() {
        for (rating, ok) in [(None, false), (Some(0), false), (Some(1), true), (Some(5), true), (Some(6), false)] {
            let res = CreateReviewRequest {
                author_name: "Linus".into(),
                content: "Great workshop".into(),
                rating,
                ..Default::default()
            }
            .validate();
            assert_eq!(res.is_ok(), ok, "rating {rating:?}");
        }
    }

    #[test]
    fn content_is_capped() {
        let err = CreateReviewRequest {
            author_name: "Linus".into(),
            content: "x".repeat(CONTENT_MAX + 1),
            rating: Some(4),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn admin_status_filter() {
        let q = |s: Option<&str>| AdminReviewsQuery {
            status: s.map(str::to_string),
            ..Default::default()
        };
        assert_eq!(q(Some("approved")).approval(), ApprovalFilter::Approved);
        assert_eq!(q(Some("pending")).approval(), ApprovalFilter::Pending);
        assert_eq!(q(Some("all")).approval(), ApprovalFilter::All);
        assert_eq!(q(None).approval(), ApprovalFilter::All);
    }

    #[test]
    fn update_allows_partial_bodies() {
        let changes = UpdateReviewRequest {
            rating: Some(3),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.rating, Some(3));
        assert!(changes.content.is_none());
    }
}
