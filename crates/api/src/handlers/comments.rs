//! Discussion comment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::extract::CurrentUser;
use crate::AppState;
use odrlab_common::{
    db::Repository,
    discussion::{build_thread, AuthorSummary, CommentNode},
    errors::{AppError, Result},
    metrics,
};

/// New comment request
#[derive(Debug, Deserialize, Validate)]
pub struct PostCommentRequest {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,

    /// Reply target; must be a comment on the same idea
    pub parent_id: Option<Uuid>,
}

/// List an approved idea's comment thread, oldest first at every level
pub async fn list_comments(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<Vec<CommentNode>>> {
    let repo = Repository::new(state.db.clone());

    repo.find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    let rows = repo.list_comment_rows(idea_id).await?;

    Ok(Json(build_thread(rows)))
}

/// Post a comment or a reply on an approved idea
pub async fn post_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
    Json(request): Json<PostCommentRequest>,
) -> Result<(StatusCode, Json<CommentNode>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    repo.find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    if let Some(parent_id) = request.parent_id {
        let parent = repo
            .find_comment_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound {
                id: parent_id.to_string(),
            })?;

        if parent.idea_id != idea_id {
            return Err(AppError::Validation {
                message: "Parent comment belongs to a different idea".to_string(),
                field: Some("parent_id".to_string()),
            });
        }
    }

    let comment = repo
        .create_comment(idea_id, user.user.id, request.content, request.parent_id)
        .await?;

    metrics::record_comment(comment.parent_id.is_some());

    tracing::info!(
        comment_id = %comment.id,
        idea_id = %idea_id,
        author_id = %user.user.id,
        reply = comment.parent_id.is_some(),
        "Comment posted"
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentNode {
            id: comment.id,
            content: comment.content,
            author: Some(AuthorSummary::from(&user.user)),
            parent_id: comment.parent_id,
            like_count: 0,
            created_at: comment.created_at,
            replies: Vec::new(),
        }),
    ))
}
