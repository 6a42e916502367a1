use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_url(raw: &str) -> bool {
    matches!(url::Url::parse(raw), Ok(u) if matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accepts RFC 3339 timestamps or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

/// Collects field errors and turns them into a single `ApiError::Validation`.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn required(&mut self, value: &str, field: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    pub fn max_chars(&mut self, value: &str, max: usize, field: &str, message: &str) -> &mut Self {
        self.check(value.chars().count() <= max, field, message)
    }

    pub fn optional_url(&mut self, value: Option<&str>, field: &str, message: &str) -> &mut Self {
        let ok = value.map_or(true, |v| v.trim().is_empty() || is_valid_url(v.trim()));
        self.check(ok, field, message)
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}
