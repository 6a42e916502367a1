use serde::{Deserialize, Serialize};

use super::repo_types::{
    Event, EventCategory, EventChanges, EventMode, EventStatus, NewEvent, Winner,
};
use crate::{
    error::ApiError,
    pagination::{PageQuery, Pagination},
    validation::{parse_timestamp, Validator},
};

pub const SHORT_DESCRIPTION_MAX: usize = 200;
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub mode: String,
    pub location: Option<String>,
    #[serde(default)]
    pub category: String,
    pub status: Option<String>,
    #[serde(default)]
    pub image: String,
    pub registration_link: Option<String>,
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub winners: Vec<Winner>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub priority: i32,
    pub timezone: Option<String>,
}

impl CreateEventRequest {
    pub fn validate(self) -> Result<NewEvent, ApiError> {
        let date = parse_timestamp(&self.date);
        let end_date = self.end_date.as_deref().map(parse_timestamp);
        let mode = self.mode.parse::<EventMode>().ok();
        let category = self.category.parse::<EventCategory>().ok();
        let status = self.status.as_deref().map(str::parse::<EventStatus>);

        Validator::new()
            .required(&self.title, "title", "Title is required")
            .required(&self.description, "description", "Description is required")
            .check(
                !self.short_description.trim().is_empty()
                    && self.short_description.trim().chars().count() <= SHORT_DESCRIPTION_MAX,
                "shortDescription",
                "Short description required (max 200 chars)",
            )
            .check(date.is_some(), "date", "Valid date is required")
            .check(!matches!(end_date, Some(None)), "endDate", "Invalid end date")
            .required(&self.time, "time", "Time is required")
            .check(mode.is_some(), "mode", "Invalid mode")
            .check(category.is_some(), "category", "Invalid category")
            .check(!matches!(status, Some(Err(_))), "status", "Invalid status")
            .required(&self.image, "image", "Image URL is required")
            .optional_url(
                self.registration_link.as_deref(),
                "registrationLink",
                "Invalid registration link URL",
            )
            .check(
                self.max_participants.map_or(true, |m| m > 0),
                "maxParticipants",
                "Max participants must be positive",
            )
            .finish()?;

        let (Some(date), Some(mode), Some(category)) = (date, mode, category) else {
            return Err(ApiError::bad_request("Invalid event"));
        };

        Ok(NewEvent {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            short_description: self.short_description.trim().to_string(),
            date,
            end_date: end_date.flatten(),
            time: self.time.trim().to_string(),
            mode,
            location: self.location.filter(|l| !l.trim().is_empty()),
            category,
            status: status.and_then(Result::ok).unwrap_or(EventStatus::Upcoming),
            image: self.image.trim().to_string(),
            registration_link: self.registration_link.filter(|l| !l.trim().is_empty()),
            max_participants: self.max_participants,
            tags: self.tags,
            winners: self.winners,
            gallery: self.gallery,
            featured: self.featured,
            priority: self.priority,
            timezone: self
                .timezone
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        })
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub date: Option<String>,
    pub end_date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
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

impl UpdateEventRequest {
    pub fn validate(self) -> Result<EventChanges, ApiError> {
        let date = self.date.as_deref().map(parse_timestamp);
        let end_date = self.end_date.as_deref().map(parse_timestamp);
        let mode = self.mode.as_deref().map(str::parse::<EventMode>);
        let category = self.category.as_deref().map(str::parse::<EventCategory>);
        let status = self.status.as_deref().map(str::parse::<EventStatus>);

        Validator::new()
            .check(
                self.title.as_deref().map_or(true, |t| !t.trim().is_empty()),
                "title",
                "Title cannot be empty",
            )
            .check(
                self.short_description
                    .as_deref()
                    .map_or(true, |s| s.trim().chars().count() <= SHORT_DESCRIPTION_MAX),
                "shortDescription",
                "Short description must be at most 200 chars",
            )
            .check(!matches!(date, Some(None)), "date", "Valid date is required")
            .check(!matches!(end_date, Some(None)), "endDate", "Invalid end date")
            .check(!matches!(mode, Some(Err(_))), "mode", "Invalid mode")
            .check(!matches!(category, Some(Err(_))), "category", "Invalid category")
            .check(!matches!(status, Some(Err(_))), "status", "Invalid status")
            .optional_url(
                self.registration_link.as_deref(),
                "registrationLink",
                "Invalid registration link URL",
            )
            .check(
                self.max_participants.map_or(true, |m| m > 0),
                "maxParticipants",
                "Max participants must be positive",
            )
            .finish()?;

        Ok(EventChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            short_description: self.short_description.map(|s| s.trim().to_string()),
            date: date.flatten(),
            end_date: end_date.flatten(),
            time: self.time,
            mode: mode.and_then(Result::ok),
            location: self.location,
            category: category.and_then(Result::ok),
            status: status.and_then(Result::ok),
            image: self.image,
            registration_link: self.registration_link,
            max_participants: self.max_participants,
            tags: self.tags,
            winners: self.winners,
            gallery: self.gallery,
            featured: self.featured,
            priority: self.priority,
            timezone: self.timezone,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<String>,
}

/// Filters resolved from [`ListEventsQuery`]; `all` means no filter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub category: Option<EventCategory>,
    pub featured: Option<bool>,
}

impl EventFilter {
    /// Completed events read newest first, everything else in calendar order.
    pub fn newest_first(&self) -> bool {
        self.status == Some(EventStatus::Completed)
    }
}

impl ListEventsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn filter(&self) -> Result<EventFilter, ApiError> {
        fn wanted(raw: &Option<String>) -> Option<&str> {
            raw.as_deref().filter(|v| !v.is_empty() && *v != "all")
        }

        let status = wanted(&self.status).map(str::parse::<EventStatus>);
        let category = wanted(&self.category).map(str::parse::<EventCategory>);
        Validator::new()
            .check(!matches!(status, Some(Err(_))), "status", "Invalid status")
            .check(!matches!(category, Some(Err(_))), "category", "Invalid category")
            .finish()?;

        Ok(EventFilter {
            status: status.and_then(Result::ok),
            category: category.and_then(Result::ok),
            featured: self.featured.as_deref().map(|v| v == "true"),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hackathon() -> CreateEventRequest {
        CreateEventRequest {
            title: "Winter Hack".into(),
            description: "48 hours of building".into(),
            short_description: "Build things".into(),
            date: "2025-12-20".into(),
            time: "10:00 AM".into(),
            mode: "Offline".into(),
            category: "Hackathon".into(),
            image: "https://cdn.example.com/hack.png".into(),
            max_participants: Some(120),
            ..Default::default()
        }
    }

    #[test]
    fn create_defaults_status_and_timezone() {
        let event = hackathon().validate().unwrap();
        assert_eq!(event.status, EventStatus::Upcoming);
        assert_eq!(event.timezone, DEFAULT_TIMEZONE);
        assert_eq!(event.mode, EventMode::Offline);
        assert_eq!(event.max_participants, Some(120));
    }

    #[test]
    fn create_rejects_bad_enums_and_long_summary() {
        let req = CreateEventRequest {
            short_description: "x".repeat(SHORT_DESCRIPTION_MAX + 1),
            mode: "In person".into(),
            category: "Party".into(),
            date: "soon".into(),
            ..hackathon()
        };
        let ApiError::Validation(fields) = req.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["shortDescription", "date", "mode", "category"]);
    }

    #[test]
    fn update_only_carries_present_fields() {
        let changes = UpdateEventRequest {
            status: Some("Completed".into()),
            featured: Some(true),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.status, Some(EventStatus::Completed));
        assert_eq!(changes.featured, Some(true));
        assert!(changes.title.is_none());
        assert!(changes.date.is_none());
    }

    #[test]
    fn update_rejects_unknown_status() {
        let err = UpdateEventRequest {
            status: Some("Postponed".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn all_means_no_filter() {
        let query = ListEventsQuery {
            status: Some("all".into()),
            category: Some("Workshop".into()),
            featured: Some("false".into()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.category, Some(EventCategory::Workshop));
        assert_eq!(filter.featured, Some(false));
        assert!(!filter.newest_first());
    }

    #[test]
    fn completed_listing_is_newest_first() {
        let query = ListEventsQuery {
            status: Some("Completed".into()),
            ..Default::default()
        };
        assert!(query.filter().unwrap().newest_first());
    }
}
