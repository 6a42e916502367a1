use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{
        ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, MessageResponse,
        ProfileResponse, PublicUser, RefreshRequest, RefreshResponse, UpdateProfileRequest,
    },
    extractors::AuthUser,
    services,
};
use crate::{
    error::ApiError,
    state::AppState,
    validation::{is_valid_email, normalize_email, Validator},
};

pub const MIN_PASSWORD_CHARS: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", put(update_profile))
        .route("/auth/password", put(change_password))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = normalize_email(&payload.email);
    Validator::new()
        .check(is_valid_email(&email), "email", "Valid email is required")
        .required(&payload.password, "password", "Password is required")
        .finish()?;

    let response = services::login(state.users.as_ref(), &state.jwt, &email, &payload.password)
        .await?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = payload
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Refresh token required"))?;

    let access_token = services::refresh(state.users.as_ref(), &state.jwt, &token).await?;
    Ok(Json(RefreshResponse { access_token }))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: PublicUser::from(&user),
    })
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    services::logout(state.users.as_ref(), &user).await?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let name = payload.name.as_deref().map(str::trim);
    let email = payload.email.as_deref().map(normalize_email);

    Validator::new()
        .check(name.map_or(true, |n| !n.is_empty()), "name", "Name cannot be empty")
        .check(
            email.as_deref().map_or(true, is_valid_email),
            "email",
            "Valid email is required",
        )
        .finish()?;

    let updated =
        services::update_profile(state.users.as_ref(), &user, name, email.as_deref()).await?;
    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user: PublicUser::from(&updated),
    }))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Validator::new()
        .required(
            &payload.current_password,
            "currentPassword",
            "Current password is required",
        )
        .check(
            payload.new_password.chars().count() >= MIN_PASSWORD_CHARS,
            "newPassword",
            "New password must be at least 8 characters long",
        )
        .finish()?;

    services::change_password(
        state.users.as_ref(),
        &user,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    info!(user_id = %user.id, "password change completed, refresh token revoked");
    Ok(Json(MessageResponse {
        message: "Password changed successfully",
    }))
}
