use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::labels::string_enum;

string_enum! {
    pub enum MemberCategory {
        Executive => "executive",
        Technical => "technical",
        Operations => "operations",
        Marketing => "marketing",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
    pub year: Option<String>,
    pub social: SocialLinks,
    pub order: i32,
    pub active: bool,
    pub display_in_top6: bool,
    pub member_category: Option<MemberCategory>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub(crate) struct TeamMemberRow {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
    pub year: Option<String>,
    pub social: Json<SocialLinks>,
    pub sort_order: i32,
    pub active: bool,
    pub display_in_top6: bool,
    pub member_category: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<TeamMemberRow> for TeamMember {
    type Error = anyhow::Error;

    fn try_from(r: TeamMemberRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            role: r.role,
            bio: r.bio,
            image: r.image,
            year: r.year,
            social: r.social.0,
            order: r.sort_order,
            active: r.active,
            display_in_top6: r.display_in_top6,
            member_category: r
                .member_category
                .as_deref()
                .map(str::parse::<MemberCategory>)
                .transpose()?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
    pub year: Option<String>,
    pub social: SocialLinks,
    pub order: i32,
    pub active: bool,
    pub display_in_top6: bool,
    pub member_category: Option<MemberCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamMemberChanges {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub year: Option<String>,
    pub social: Option<SocialLinks>,
    pub order: Option<i32>,
    pub active: Option<bool>,
    pub display_in_top6: Option<bool>,
    pub member_category: Option<MemberCategory>,
}
