use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::labels::string_enum;

string_enum! {
    /// Only `Upcoming` events take new registrations.
    pub enum EventStatus {
        Upcoming => "Upcoming",
        Ongoing => "Ongoing",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

string_enum! {
    pub enum EventMode {
        Online => "Online",
        Offline => "Offline",
        Hybrid => "Hybrid",
    }
}

string_enum! {
    pub enum EventCategory {
        Hackathon => "Hackathon",
        Workshop => "Workshop",
        Sprint => "Sprint",
        Meetup => "Meetup",
        Competition => "Competition",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Winner {
    pub name: String,
    pub prize: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub short_description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    pub time: String,
    pub mode: EventMode,
    pub location: Option<String>,
    pub category: EventCategory,
    pub status: EventStatus,
    pub image: String,
    pub registration_link: Option<String>,
    pub max_participants: Option<i32>,
    pub tags: Vec<String>,
    pub winners: Vec<Winner>,
    pub gallery: Vec<String>,
    pub featured: bool,
    pub priority: i32,
    pub timezone: String,
    pub last_modified_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_modified_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    pub time: String,
    pub mode: String,
    pub location: Option<String>,
    pub category: String,
    pub status: String,
    pub image: String,
    pub registration_link: Option<String>,
    pub max_participants: Option<i32>,
    pub tags: Vec<String>,
    pub winners: Json<Vec<Winner>>,
    pub gallery: Vec<String>,
    pub featured: bool,
    pub priority: i32,
    pub timezone: String,
    pub last_modified_by: Option<String>,
    pub last_modified_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<EventRow> for Event {
    type Error = anyhow::Error;

    fn try_from(r: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            title: r.title,
            description: r.description,
            short_description: r.short_description,
            date: r.date,
            end_date: r.end_date,
            time: r.time,
            mode: r.mode.parse()?,
            location: r.location,
            category: r.category.parse()?,
            status: r.status.parse()?,
            image: r.image,
            registration_link: r.registration_link,
            max_participants: r.max_participants,
            tags: r.tags,
            winners: r.winners.0,
            gallery: r.gallery,
            featured: r.featured,
            priority: r.priority,
            timezone: r.timezone,
            last_modified_by: r.last_modified_by,
            last_modified_at: r.last_modified_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Validated fields for an insert.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    pub time: String,
    pub mode: EventMode,
    pub location: Option<String>,
    pub category: EventCategory,
    pub status: EventStatus,
    pub image: String,
    pub registration_link: Option<String>,
    pub max_participants: Option<i32>,
    pub tags: Vec<String>,
    pub winners: Vec<Winner>,
    pub gallery: Vec<String>,
    pub featured: bool,
    pub priority: i32,
    pub timezone: String,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub time: Option<String>,
    pub mode: Option<EventMode>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub status: Option<EventStatus>,
    pub image: Option<String>,
    pub registration_link: Option<String>,
    pub max_participants: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub winners: Option<Vec<Winner>>,
    pub gallery: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub priority: Option<i32>,
    pub timezone: Option<String>,
}
