//! Moderation handlers (admin only)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::CurrentUser;
use crate::handlers::ideas::IdeaResponse;
use crate::AppState;
use odrlab_common::{
    db::{Repository, UserSummary},
    errors::{AppError, Result},
    metrics,
};

/// A submission waiting in the moderation queue
#[derive(Serialize)]
pub struct PendingSubmissionResponse {
    pub id: Uuid,
    pub title: String,
    pub caption: Option<String>,
    pub description: String,
    pub odr_experience: Option<String>,
    pub owner: Option<UserSummary>,
    pub created_at: String,
}

/// Moderation decision request
#[derive(Debug, Deserialize, Validate)]
pub struct DecisionRequest {
    pub submission_id: Uuid,

    /// Free-text reason; only meaningful for rejections
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct RejectionResponse {
    pub submission_id: Uuid,
    pub status: odrlab_common::moderation::ReviewState,
    pub rejection_reason: Option<String>,
}

/// List unreviewed submissions, oldest first
pub async fn pending_submissions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<PendingSubmissionResponse>>> {
    user.require_admin()?;

    let repo = Repository::new(state.db.clone());
    let pending = repo.list_pending_submissions().await?;

    Ok(Json(
        pending
            .into_iter()
            .map(|(submission, owner)| PendingSubmissionResponse {
                id: submission.id,
                title: submission.title,
                caption: submission.caption,
                description: submission.description,
                odr_experience: submission.odr_experience,
                owner: owner.as_ref().map(UserSummary::from),
                created_at: submission.created_at.to_rfc3339(),
            })
            .collect(),
    ))
}

/// Approve a pending submission, publishing it as an idea
pub async fn approve_submission(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<IdeaResponse>> {
    user.require_admin()?;

    let repo = Repository::new(state.db.clone());
    let idea = repo
        .approve_submission(request.submission_id, user.user.id)
        .await?;

    metrics::record_moderation("approve");

    tracing::info!(
        submission_id = %request.submission_id,
        idea_id = %idea.id,
        reviewer_id = %user.user.id,
        "Submission approved"
    );

    Ok(Json(IdeaResponse::bare(idea)))
}

/// Reject a pending submission with an optional reason
pub async fn reject_submission(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<RejectionResponse>> {
    user.require_admin()?;
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let submission = repo
        .reject_submission(request.submission_id, user.user.id, request.reason)
        .await?;

    metrics::record_moderation("reject");

    tracing::info!(
        submission_id = %submission.id,
        reviewer_id = %user.user.id,
        "Submission rejected"
    );

    Ok(Json(RejectionResponse {
        submission_id: submission.id,
        status: submission.review_state(),
        rejection_reason: submission.rejection_reason,
    }))
}

/// Legacy alias: approve an existing idea row directly.
///
/// Kept for clients of the old flow; internally this is the same
/// pending-to-approved transition applied to the idea record.
pub async fn approve_idea_direct(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaResponse>> {
    user.require_admin()?;

    let repo = Repository::new(state.db.clone());
    let idea = repo.approve_idea_direct(idea_id, user.user.id).await?;

    metrics::record_moderation("approve_direct");

    tracing::info!(
        idea_id = %idea.id,
        reviewer_id = %user.user.id,
        "Idea approved via legacy path"
    );

    Ok(Json(IdeaResponse::bare(idea)))
}
