use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::{AnnouncementRequest, ServerTime, SettingsPatch, SocialLinksRequest, StatsRequest},
    repo,
    repo_types::Settings,
};
use crate::{auth::AdminUser, error::ApiError, response::Envelope, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/settings/time", get(server_time))
        .route("/settings/social-links", put(update_social_links))
        .route("/settings/stats", put(update_stats))
        .route("/settings/announcement", put(update_announcement))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Settings>>, ApiError> {
    Ok(Json(Envelope::ok(repo::get_or_create(&state.db).await?)))
}

pub async fn server_time() -> Result<Json<Envelope<ServerTime>>, ApiError> {
    Ok(Json(Envelope::ok(ServerTime::at(OffsetDateTime::now_utc())?)))
}

async fn apply(
    state: &AppState,
    admin: &AdminUser,
    patch: SettingsPatch,
) -> Result<Json<Envelope<Settings>>, ApiError> {
    let settings = repo::update(&state.db, |s| patch.apply(s)).await?;
    info!(user_id = %admin.0.id, "settings updated");
    Ok(Json(Envelope::ok(settings)))
}

#[instrument(skip(state, admin, patch))]
pub async fn update_settings(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Envelope<Settings>>, ApiError> {
    if patch.is_empty() {
        return Ok(Json(Envelope::ok(repo::get_or_create(&state.db).await?)));
    }
    apply(&state, &admin, patch).await
}

#[instrument(skip(state, admin, payload))]
pub async fn update_social_links(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<SocialLinksRequest>,
) -> Result<Json<Envelope<Settings>>, ApiError> {
    let section = payload
        .social_links
        .ok_or_else(|| ApiError::bad_request("Social links required"))?;
    let patch = SettingsPatch {
        social_links: Some(section),
        ..Default::default()
    };
    apply(&state, &admin, patch).await
}

#[instrument(skip(state, admin, payload))]
pub async fn update_stats(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<StatsRequest>,
) -> Result<Json<Envelope<Settings>>, ApiError> {
    let section = payload
        .community_stats
        .ok_or_else(|| ApiError::bad_request("Community stats required"))?;
    let patch = SettingsPatch {
        community_stats: Some(section),
        ..Default::default()
    };
    apply(&state, &admin, patch).await
}

#[instrument(skip(state, admin, payload))]
pub async fn update_announcement(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<AnnouncementRequest>,
) -> Result<Json<Envelope<Settings>>, ApiError> {
    let section = payload
        .announcement_banner
        .ok_or_else(|| ApiError::bad_request("Announcement banner data required"))?;
    let patch = SettingsPatch {
        announcement_banner: Some(section),
        ..Default::default()
    };
    apply(&state, &admin, patch).await
}
