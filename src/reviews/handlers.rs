use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        AdminReviewsQuery, ApproveRequest, CreateReviewRequest, FeatureRequest,
        UpdateReviewRequest,
    },
    repo,
    repo_types::Review,
};
use crate::{
    auth::AdminUser,
    error::ApiError,
    response::{Envelope, SuccessMessage},
    state::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_public).post(create_review))
        .route("/reviews/admin", get(list_admin))
        .route(
            "/reviews/:id",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/reviews/:id/approve", put(approve_review))
        .route("/reviews/:id/feature", put(feature_review))
}

fn not_found() -> ApiError {
    ApiError::not_found("Review not found")
}

#[instrument(skip(state))]
pub async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Review>>>, ApiError> {
    Ok(Json(Envelope::ok(repo::list_public(&state.db).await?)))
}

#[instrument(skip(state, _admin))]
pub async fn list_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminReviewsQuery>,
) -> Result<Json<Envelope<Vec<Review>>>, ApiError> {
    let page = query.page_query().resolve(DEFAULT_PAGE_SIZE)?;
    let (reviews, total) =
        repo::list_admin(&state.db, query.approval(), query.featured(), page).await?;
    Ok(Json(Envelope::paged(reviews, page.meta(total))))
}

#[instrument(skip(state))]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Review>>, ApiError> {
    let review = repo::find(&state.db, id).await?.ok_or_else(not_found)?;
    Ok(Json(Envelope::ok(review)))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Envelope<Review>>), ApiError> {
    let new = payload.validate()?;
    let review = repo::insert(&state.db, &new, admin.id).await?;
    info!(review_id = %review.id, admin_id = %admin.id, "review created");
    Ok((StatusCode::CREATED, Json(Envelope::ok(review))))
}

#[instrument(skip(state, _admin, payload))]
pub async fn update_review(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<Envelope<Review>>, ApiError> {
    let changes = payload.validate()?;
    let review = repo::update(&state.db, id, &changes)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(Envelope::ok(review)))
}

#[instrument(skip(state, _admin))]
pub async fn delete_review(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessMessage>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(not_found());
    }
    info!(review_id = %id, "review deleted");
    Ok(Json(SuccessMessage {
        success: true,
        message: "Review deleted successfully",
    }))
}

#[instrument(skip(state, admin))]
pub async fn approve_review(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveRequest>,
) -> Result<Json<Envelope<Review>>, ApiError> {
    let review = repo::set_approved(&state.db, id, payload.is_approved, admin.id)
        .await?
        .ok_or_else(not_found)?;
    info!(review_id = %id, approved = payload.is_approved, admin_id = %admin.id, "review moderated");
    Ok(Json(Envelope::ok(review)))
}

#[instrument(skip(state, _admin))]
pub async fn feature_review(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeatureRequest>,
) -> Result<Json<Envelope<Review>>, ApiError> {
    let review = repo::set_featured(&state.db, id, payload.is_featured)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(Envelope::ok(review)))
}
