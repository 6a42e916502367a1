use serde::{Deserialize, Serialize};

use super::repo_types::{ContactMessage, ContactStatus, NewContactMessage};
use crate::{
    error::ApiError,
    pagination::{PageQuery, Pagination},
    validation::{is_valid_email, normalize_email, Validator},
};

pub const SUBJECT_MIN: usize = 5;
pub const MESSAGE_MIN: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    pub fn validate(self) -> Result<NewContactMessage, ApiError> {
        let email = normalize_email(&self.email);
        let subject = self.subject.trim();
        let message = self.message.trim();

        Validator::new()
            .required(&self.name, "name", "Name is required")
            .check(is_valid_email(&email), "email", "Valid email is required")
            .check(
                subject.chars().count() >= SUBJECT_MIN,
                "subject",
                "Subject required (min 5 chars)",
            )
            .check(
                message.chars().count() >= MESSAGE_MIN,
                "message",
                "Message required (min 10 chars)",
            )
            .finish()?;

        Ok(NewContactMessage {
            name: self.name.trim().to_string(),
            email,
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListContactsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

impl ListContactsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn status(&self) -> Result<Option<ContactStatus>, ApiError> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<ContactStatus>()
                    .map_err(|_| ApiError::bad_request("Invalid status"))
            })
            .transpose()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactMessage>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_complete_message() {
        let msg = ContactRequest {
            name: "Margaret".into(),
            email: "MARGARET@Example.org ".into(),
            phone: Some("   ".into()),
            subject: "Sponsorship".into(),
            message: "We would like to sponsor the hackathon.".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(msg.email, "margaret@example.org");
        assert_eq!(msg.phone, None);
    }

    #[test]
    fn short_subject_and_message_fail() {
        let err = ContactRequest {
            name: "Margaret".into(),
            email: "m@example.org".into(),
            phone: None,
            subject: "Hi".into(),
            message: "Short".into(),
        }
        .validate()
        .unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["subject", "message"]);
    }

    #[test]
    fn status_filter_parses_known_values() {
        let q = ListContactsQuery {
            status: Some("Replied".into()),
            ..Default::default()
        };
        assert_eq!(q.status().unwrap(), Some(ContactStatus::Replied));
        let q = ListContactsQuery {
            status: Some("Spam".into()),
            ..Default::default()
        };
        assert!(q.status().is_err());
    }
}
