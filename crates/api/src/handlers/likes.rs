//! Like toggle handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::extract::CurrentUser;
use crate::AppState;
use odrlab_common::{
    db::Repository,
    errors::{AppError, Result},
    metrics,
};

/// Result of a like toggle
#[derive(Serialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: u64,
}

/// Read-only like state for UI hydration
#[derive(Serialize)]
pub struct LikeCheckResponse {
    pub liked: bool,
}

/// Toggle the caller's like on an approved idea
pub async fn toggle_idea_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<LikeToggleResponse>> {
    let repo = Repository::new(state.db.clone());

    repo.find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    let liked = repo.toggle_idea_like(user.user.id, idea_id).await?;
    let like_count = repo.count_idea_likes(idea_id).await?;

    metrics::record_like_toggle("idea", liked);

    Ok(Json(LikeToggleResponse { liked, like_count }))
}

/// Check whether the caller has liked an idea
pub async fn check_idea_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<LikeCheckResponse>> {
    let repo = Repository::new(state.db.clone());

    repo.find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    let liked = repo.has_liked_idea(user.user.id, idea_id).await?;

    Ok(Json(LikeCheckResponse { liked }))
}

/// Toggle the caller's like on a comment
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<LikeToggleResponse>> {
    let repo = Repository::new(state.db.clone());

    let comment = repo
        .find_comment_by_id(comment_id)
        .await?
        .ok_or_else(|| AppError::CommentNotFound {
            id: comment_id.to_string(),
        })?;

    // The comment is only reachable while its idea is approved.
    repo.find_approved_idea(comment.idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: comment.idea_id.to_string(),
        })?;

    let liked = repo.toggle_comment_like(user.user.id, comment_id).await?;
    let like_count = repo.count_comment_likes(comment_id).await?;

    metrics::record_like_toggle("comment", liked);

    Ok(Json(LikeToggleResponse { liked, like_count }))
}
