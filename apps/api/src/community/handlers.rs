use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::community::{normalize_search, validate_post, FEED_LIMIT};
use crate::errors::AppError;
use crate::models::community::{CommunityPostRow, NewCommunityPost};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
}

/// GET /api/v1/community/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<CommunityPostRow>>, AppError> {
    let search = normalize_search(query.q.as_deref());
    let posts = state.catalog.list_posts(search, FEED_LIMIT).await?;
    Ok(Json(posts))
}

/// POST /api/v1/community/posts
pub async fn handle_create_post(
    State(state): State<AppState>,
    Json(req): Json<NewCommunityPost>,
) -> Result<(StatusCode, Json<CommunityPostRow>), AppError> {
    let post = validate_post(req)?;
    let row = state.catalog.create_post(post).await?;
    info!("Community post {} created by {}", row.id, row.author_email);
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v1/community/posts/:id/like
pub async fn handle_like_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommunityPostRow>, AppError> {
    state
        .catalog
        .like_post(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))
}
