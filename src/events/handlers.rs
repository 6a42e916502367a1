use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        CreateEventRequest, EventListResponse, ListEventsQuery, MessageResponse,
        UpdateEventRequest,
    },
    repo,
    repo_types::Event,
};
use crate::{auth::AdminUser, error::ApiError, state::AppState};

const DEFAULT_PAGE_SIZE: i64 = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<EventListResponse>, ApiError> {
    let page = query.page_query().resolve(DEFAULT_PAGE_SIZE)?;
    let filter = query.filter()?;
    let (events, total) = repo::list(&state.db, &filter, page).await?;
    Ok(Json(EventListResponse {
        events,
        pagination: page.meta(total),
    }))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    repo::find(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Event not found"))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let new = payload.validate()?;
    let event = repo::insert(&state.db, &new).await?;
    info!(event_id = %event.id, admin_id = %admin.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let changes = payload.validate()?;
    let event = repo::update(&state.db, id, &changes, &admin.email)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))?;
    info!(event_id = %event.id, admin_id = %admin.id, "event updated");
    Ok(Json(event))
}

#[instrument(skip(state, admin))]
pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Event not found"));
    }
    info!(event_id = %id, admin_id = %admin.id, "event deleted");
    Ok(Json(MessageResponse {
        message: "Event deleted successfully",
    }))
}
