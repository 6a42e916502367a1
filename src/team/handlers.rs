use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        CreateTeamMemberRequest, ListTeamQuery, MessageResponse, ReorderRequest,
        UpdateTeamMemberRequest,
    },
    repo,
    repo_types::TeamMember,
};
use crate::{auth::AdminUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/team", get(list_members).post(create_member))
        .route("/team/reorder", post(reorder_members))
        .route(
            "/team/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListTeamQuery>,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    Ok(Json(repo::list(&state.db, query.include_inactive()).await?))
}

#[instrument(skip(state))]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamMember>, ApiError> {
    repo::find(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Team member not found"))
}

#[instrument(skip(state, _admin, payload))]
pub async fn create_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateTeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>), ApiError> {
    let new = payload.validate()?;
    let member = repo::insert(&state.db, &new).await?;
    info!(member_id = %member.id, "team member created");
    Ok((StatusCode::CREATED, Json(member)))
}

#[instrument(skip(state, _admin, payload))]
pub async fn update_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeamMemberRequest>,
) -> Result<Json<TeamMember>, ApiError> {
    let changes = payload.validate()?;
    repo::update(&state.db, id, &changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Team member not found"))
}

#[instrument(skip(state, _admin))]
pub async fn delete_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Team member not found"));
    }
    info!(member_id = %id, "team member deleted");
    Ok(Json(MessageResponse {
        message: "Team member deleted successfully",
    }))
}

#[instrument(skip(state, _admin, payload))]
pub async fn reorder_members(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let entries = payload
        .order
        .ok_or_else(|| ApiError::bad_request("Order must be an array"))?;
    let touched = repo::reorder(&state.db, &entries).await?;
    info!(requested = entries.len(), touched, "team reordered");
    Ok(Json(MessageResponse {
        message: "Order updated successfully",
    }))
}
