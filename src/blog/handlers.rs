use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreatePostRequest, ListPostsQuery, MessageResponse, PostListResponse, UpdatePostRequest},
    repo,
    repo_types::BlogPost,
};
use crate::{
    auth::AdminUser, db::StoreError, error::ApiError, pagination::PageQuery, state::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(list_published).post(create_post))
        .route("/blog/slug/:slug", get(get_by_slug))
        .route("/blog/admin/all", get(list_all))
        .route("/blog/categories", get(list_categories))
        .route("/blog/:id", put(update_post).delete(delete_post))
}

fn slug_conflict(e: StoreError) -> ApiError {
    match e {
        StoreError::Duplicate => {
            warn!("blog slug already taken");
            ApiError::conflict("Slug already exists")
        }
        StoreError::Backend(e) => ApiError::Internal(e),
    }
}

#[instrument(skip(state))]
pub async fn list_published(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let page = query.page_query().resolve(DEFAULT_PAGE_SIZE)?;
    let (posts, total) = repo::list_published(&state.db, query.category(), page).await?;
    Ok(Json(PostListResponse {
        posts,
        pagination: page.meta(total),
    }))
}

#[instrument(skip(state))]
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    repo::view_by_slug(&state.db, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Post not found"))
}

#[instrument(skip(state, _admin))]
pub async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let page = query.resolve(DEFAULT_PAGE_SIZE)?;
    let (posts, total) = repo::list_all(&state.db, page).await?;
    Ok(Json(PostListResponse {
        posts,
        pagination: page.meta(total),
    }))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(repo::categories(&state.db).await?))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    let new = payload.validate(&admin)?;
    let post = repo::insert(&state.db, &new).await.map_err(slug_conflict)?;
    info!(post_id = %post.id, slug = %post.slug, admin_id = %admin.id, "blog post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state, _admin, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<BlogPost>, ApiError> {
    let changes = payload.validate()?;
    repo::update(&state.db, id, &changes)
        .await
        .map_err(slug_conflict)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Post not found"))
}

#[instrument(skip(state, _admin))]
pub async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    info!(post_id = %id, "blog post deleted");
    Ok(Json(MessageResponse {
        message: "Post deleted successfully",
    }))
}
