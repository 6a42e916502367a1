use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{events::repo_types::EventStatus, labels::string_enum};

string_enum! {
    pub enum RegistrationStatus {
        Pending => "Pending",
        Confirmed => "Confirmed",
        Cancelled => "Cancelled",
        Attended => "Attended",
    }
}

string_enum! {
    pub enum FoodPreference {
        Veg => "Veg",
        NonVeg => "Non-Veg",
    }
}

/// The two event fields registration rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventGate {
    pub status: EventStatus,
    pub max_participants: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: Option<String>,
    pub linkedin_url: Option<String>,
    pub food_preference: Option<FoodPreference>,
    pub status: RegistrationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated sign-up; `email` is already normalized.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: Option<String>,
    pub linkedin_url: Option<String>,
    pub food_preference: Option<FoodPreference>,
}

#[derive(Debug, FromRow)]
pub(crate) struct RegistrationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: Option<String>,
    pub linkedin_url: Option<String>,
    pub food_preference: Option<String>,
    pub status: String,
    pub registered_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = anyhow::Error;

    fn try_from(r: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            event_id: r.event_id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            college: r.college,
            linkedin_url: r.linkedin_url,
            food_preference: r
                .food_preference
                .as_deref()
                .map(str::parse::<FoodPreference>)
                .transpose()?,
            status: r.status.parse()?,
            registered_at: r.registered_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
