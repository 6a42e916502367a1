use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{MemberCategory, NewTeamMember, SocialLinks, TeamMemberChanges};
use crate::{error::ApiError, validation::Validator};

pub const BIO_MAX: usize = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    pub year: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
    pub order: Option<i32>,
    pub active: Option<bool>,
    pub display_in_top6: Option<bool>,
    pub member_category: Option<String>,
}

impl CreateTeamMemberRequest {
    pub fn validate(self) -> Result<NewTeamMember, ApiError> {
        let member_category = self
            .member_category
            .as_deref()
            .map(str::parse::<MemberCategory>);

        Validator::new()
            .required(&self.name, "name", "Name is required")
            .required(&self.role, "role", "Role is required")
            .check(
                !self.bio.trim().is_empty() && self.bio.trim().chars().count() <= BIO_MAX,
                "bio",
                "Bio required (max 500 chars)",
            )
            .required(&self.image, "image", "Image URL is required")
            .check(self.order.map_or(true, |o| o >= 0), "order", "Order must be 0 or more")
            .check(
                !matches!(member_category, Some(Err(_))),
                "memberCategory",
                "Invalid member category",
            )
            .finish()?;

        Ok(NewTeamMember {
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            bio: self.bio.trim().to_string(),
            image: self.image.trim().to_string(),
            year: self.year,
            social: self.social,
            order: self.order.unwrap_or(0),
            active: self.active.unwrap_or(true),
            display_in_top6: self.display_in_top6.unwrap_or(true),
            member_category: member_category.and_then(Result::ok),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub year: Option<String>,
    pub social: Option<SocialLinks>,
    pub order: Option<i32>,
    pub active: Option<bool>,
    pub display_in_top6: Option<bool>,
    pub member_category: Option<String>,
}

impl UpdateTeamMemberRequest {
    pub fn validate(self) -> Result<TeamMemberChanges, ApiError> {
        let member_category = self
            .member_category
            .as_deref()
            .map(str::parse::<MemberCategory>);

        Validator::new()
            .check(
                self.name.as_deref().map_or(true, |n| !n.trim().is_empty()),
                "name",
                "Name cannot be empty",
            )
            .check(
                self.bio
                    .as_deref()
                    .map_or(true, |b| b.trim().chars().count() <= BIO_MAX),
                "bio",
                "Bio must be at most 500 chars",
            )
            .check(self.order.map_or(true, |o| o >= 0), "order", "Order must be 0 or more")
            .check(
                !matches!(member_category, Some(Err(_))),
                "memberCategory",
                "Invalid member category",
            )
            .finish()?;

        Ok(TeamMemberChanges {
            name: self.name.map(|n| n.trim().to_string()),
            role: self.role,
            bio: self.bio,
            image: self.image,
            year: self.year,
            social: self.social,
            order: self.order,
            active: self.active,
            display_in_top6: self.display_in_top6,
            member_category: member_category.and_then(Result::ok),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTeamQuery {
    pub all: Option<String>,
}

impl ListTeamQuery {
    pub fn include_inactive(&self) -> bool {
        self.all.as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderEntry {
    pub id: Uuid,
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Option<Vec<OrderEntry>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
