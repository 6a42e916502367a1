use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Testimonial shown on the public site once approved.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub author_name: String,
    pub author_role: Option<String>,
    pub author_company: Option<String>,
    pub author_photo: Option<String>,
    pub content: String,
    pub rating: i16,
    pub is_approved: bool,
    pub is_featured: bool,
    pub event_ref: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub author_name: String,
    pub author_role: Option<String>,
    pub author_company: Option<String>,
    pub author_photo: Option<String>,
    pub content: String,
    pub rating: i16,
    pub is_featured: bool,
    pub event_ref: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub author_name: Option<String>,
    pub author_role: Option<String>,
    pub author_company: Option<String>,
    pub author_photo: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i16>,
    pub event_ref: Option<Uuid>,
}

/// Admin listing filter on approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalFilter {
    Approved,
    Pending,
    All,
}

impl ApprovalFilter {
    pub fn as_flag(self) -> Option<bool> {
        match self {
            ApprovalFilter::Approved => Some(true),
            ApprovalFilter::Pending => Some(false),
            ApprovalFilter::All => None,
        }
    }
}
