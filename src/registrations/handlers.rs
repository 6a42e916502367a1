use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CreateRegistrationRequest, CreatedRegistrationResponse, ListRegistrationsQuery,
        MessageResponse, RegistrationListResponse, RegistrationStats, UpdateStatusRequest,
    },
    repo_types::{Registration, RegistrationStatus},
    services,
};
use crate::{auth::AdminUser, error::ApiError, state::AppState};

const DEFAULT_PAGE_SIZE: i64 = 50;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/registrations", post(create_registration))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/registrations/event/:event_id", get(list_for_event))
        .route("/registrations/stats/:event_id", get(stats_for_event))
        .route("/registrations/:id/status", patch(update_status))
        .route("/registrations/:id", delete(delete_registration))
}

#[instrument(skip(state, payload))]
pub async fn create_registration(
    State(state): State<AppState>,
    Json(payload): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<CreatedRegistrationResponse>), ApiError> {
    let new = payload.validate()?;
    let registration = services::create_registration(state.registrations.as_ref(), new).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedRegistrationResponse {
            message: "Registration successful",
            registration,
        }),
    ))
}

#[instrument(skip(state, _admin))]
pub async fn list_for_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(event_id): Path<Uuid>,
    Query(query): Query<ListRegistrationsQuery>,
) -> Result<Json<RegistrationListResponse>, ApiError> {
    let page = query.page_query().resolve(DEFAULT_PAGE_SIZE)?;
    let status = parse_status(query.status.as_deref())?;
    let (registrations, total) =
        services::list_for_event(state.registrations.as_ref(), event_id, status, page).await?;
    Ok(Json(RegistrationListResponse {
        registrations,
        pagination: page.meta(total),
    }))
}

#[instrument(skip(state, _admin))]
pub async fn stats_for_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationStats>, ApiError> {
    Ok(Json(
        services::stats_for_event(state.registrations.as_ref(), event_id).await?,
    ))
}

#[instrument(skip(state, _admin, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Registration>, ApiError> {
    let status = payload
        .status
        .parse::<RegistrationStatus>()
        .map_err(|_| ApiError::bad_request("Invalid status"))?;
    let registration =
        services::update_status(state.registrations.as_ref(), id, status).await?;
    Ok(Json(registration))
}

#[instrument(skip(state, _admin))]
pub async fn delete_registration(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::delete_registration(state.registrations.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Registration deleted successfully",
    }))
}

fn parse_status(raw: Option<&str>) -> Result<Option<RegistrationStatus>, ApiError> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<RegistrationStatus>()
                .map_err(|_| ApiError::bad_request("Invalid status"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_is_optional_but_checked() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some("")).unwrap(), None);
        assert_eq!(
            parse_status(Some("Attended")).unwrap(),
            Some(RegistrationStatus::Attended)
        );
        assert_eq!(
            parse_status(Some("attended")).unwrap_err().to_string(),
            "Invalid status"
        );
    }
}
