use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{FoodPreference, NewRegistration, Registration, RegistrationStatus};
use crate::{
    error::ApiError,
    pagination::{PageQuery, Pagination},
    validation::{is_valid_email, normalize_email, Validator},
};

/// Public sign-up form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub college: Option<String>,
    pub linkedin_url: Option<String>,
    pub food_preference: Option<String>,
}

impl CreateRegistrationRequest {
    pub fn validate(self) -> Result<NewRegistration, ApiError> {
        let event_id = Uuid::parse_str(self.event_id.trim()).ok();
        let email = normalize_email(&self.email);
        let food_preference = self
            .food_preference
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<FoodPreference>);

        Validator::new()
            .check(event_id.is_some(), "eventId", "Valid event ID is required")
            .required(&self.name, "name", "Name is required")
            .check(is_valid_email(&email), "email", "Valid email is required")
            .required(&self.phone, "phone", "Phone is required")
            .optional_url(self.linkedin_url.as_deref(), "linkedinUrl", "Invalid LinkedIn URL")
            .check(
                !matches!(food_preference, Some(Err(_))),
                "foodPreference",
                "Food preference must be Veg or Non-Veg",
            )
            .finish()?;

        Ok(NewRegistration {
            event_id: event_id.unwrap_or_default(),
            name: self.name.trim().to_string(),
            email,
            phone: self.phone.trim().to_string(),
            college: non_blank(self.college),
            linkedin_url: non_blank(self.linkedin_url),
            food_preference: food_preference.and_then(Result::ok),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRegistrationsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

impl ListRegistrationsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRegistrationResponse {
    pub message: &'static str,
    pub registration: Registration,
}

#[derive(Debug, Serialize)]
pub struct RegistrationListResponse {
    pub registrations: Vec<Registration>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub total: i64,
    pub by_status: BTreeMap<RegistrationStatus, i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateRegistrationRequest {
        CreateRegistrationRequest {
            event_id: Uuid::new_v4().to_string(),
            name: " Ada Lovelace ".into(),
            email: " Ada@Example.com".into(),
            phone: "+91 98765 43210".into(),
            college: Some("  ".into()),
            linkedin_url: Some("https://www.linkedin.com/in/ada".into()),
            food_preference: Some("Non-Veg".into()),
        }
    }

    #[test]
    fn valid_request_is_normalized() {
        let r = request().validate().unwrap();
        assert_eq!(r.name, "Ada Lovelace");
        assert_eq!(r.email, "ada@example.com");
        assert_eq!(r.college, None);
        assert_eq!(r.food_preference, Some(FoodPreference::NonVeg));
    }

    #[test]
    fn reports_each_bad_field() {
        let req = CreateRegistrationRequest {
            event_id: "not-a-uuid".into(),
            name: "".into(),
            email: "nope".into(),
            phone: " ".into(),
            college: None,
            linkedin_url: Some("linkedin".into()),
            food_preference: Some("Vegan".into()),
        };
        let ApiError::Validation(fields) = req.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            names,
            vec!["eventId", "name", "email", "phone", "linkedinUrl", "foodPreference"]
        );
    }

    #[test]
    fn stats_serialize_status_keys() {
        let stats = RegistrationStats {
            total: 3,
            by_status: BTreeMap::from([
                (RegistrationStatus::Pending, 2),
                (RegistrationStatus::Cancelled, 1),
            ]),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byStatus"]["Pending"], 2);
        assert_eq!(json["byStatus"]["Cancelled"], 1);
    }
}
