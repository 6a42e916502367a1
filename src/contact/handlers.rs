use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        ContactListResponse, ContactRequest, ListContactsQuery, MessageResponse,
        UpdateStatusRequest,
    },
    repo,
    repo_types::{ContactMessage, ContactStatus},
};
use crate::{auth::AdminUser, error::ApiError, state::AppState};

const DEFAULT_PAGE_SIZE: i64 = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit).get(list_messages))
        .route("/contact/:id/status", patch(update_status))
        .route("/contact/:id", delete(delete_message))
}

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let new = payload.validate()?;
    let stored = repo::insert(&state.db, &new).await?;
    info!(contact_id = %stored.id, "contact message received");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Message sent successfully. We will get back to you soon!",
        }),
    ))
}

#[instrument(skip(state, _admin))]
pub async fn list_messages(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let page = query.page_query().resolve(DEFAULT_PAGE_SIZE)?;
    let (contacts, total) = repo::list(&state.db, query.status()?, page).await?;
    Ok(Json(ContactListResponse {
        contacts,
        pagination: page.meta(total),
    }))
}

#[instrument(skip(state, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ContactMessage>, ApiError> {
    let status = payload
        .status
        .parse::<ContactStatus>()
        .map_err(|_| ApiError::bad_request("Invalid status"))?;
    repo::update_status(&state.db, id, status)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Contact not found"))
}

#[instrument(skip(state, _admin))]
pub async fn delete_message(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Contact not found"));
    }
    Ok(Json(MessageResponse {
        message: "Contact deleted successfully",
    }))
}
