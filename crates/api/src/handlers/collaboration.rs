//! Collaboration and mentorship handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::extract::CurrentUser;
use crate::AppState;
use odrlab_common::{
    db::models::{Idea, UserRole},
    db::Repository,
    errors::{AppError, Result},
};

#[derive(Serialize)]
pub struct JoinResponse {
    pub idea_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: String,
}

/// Resolve the target idea and refuse self-joins by its owner
async fn approved_idea_for_join(
    repo: &Repository,
    user: &CurrentUser,
    idea_id: Uuid,
) -> Result<Idea> {
    let idea = repo
        .find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    if idea.owner_id == user.user.id {
        return Err(AppError::Forbidden {
            message: "Cannot join your own idea".to_string(),
        });
    }

    Ok(idea)
}

/// Join an approved idea as a collaborator
pub async fn join_collaborator(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<(StatusCode, Json<JoinResponse>)> {
    let repo = Repository::new(state.db.clone());
    approved_idea_for_join(&repo, &user, idea_id).await?;

    // The unique constraint decides races; this check gives the common
    // case a clean error without a write.
    if repo.find_collaborator(user.user.id, idea_id).await?.is_some() {
        return Err(AppError::AlreadyCollaborator);
    }

    let row = repo.add_collaborator(user.user.id, idea_id).await?;

    tracing::info!(idea_id = %idea_id, user_id = %user.user.id, "Collaborator joined");

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            idea_id: row.idea_id,
            user_id: row.user_id,
            joined_at: row.created_at.to_rfc3339(),
        }),
    ))
}

/// Leave an idea's collaborator set
pub async fn leave_collaborator(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());

    if !repo.remove_collaborator(user.user.id, idea_id).await? {
        return Err(AppError::NotFound {
            resource_type: "collaboration".to_string(),
            id: idea_id.to_string(),
        });
    }

    tracing::info!(idea_id = %idea_id, user_id = %user.user.id, "Collaborator left");

    Ok(StatusCode::NO_CONTENT)
}

/// Join an approved idea as a mentor (mentor role required)
pub async fn request_mentor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<(StatusCode, Json<JoinResponse>)> {
    user.require_role(UserRole::Mentor)?;

    let repo = Repository::new(state.db.clone());
    approved_idea_for_join(&repo, &user, idea_id).await?;

    if repo.find_mentor(user.user.id, idea_id).await?.is_some() {
        return Err(AppError::AlreadyMentor);
    }

    let row = repo.add_mentor(user.user.id, idea_id).await?;

    tracing::info!(idea_id = %idea_id, user_id = %user.user.id, "Mentor joined");

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            idea_id: row.idea_id,
            user_id: row.user_id,
            joined_at: row.created_at.to_rfc3339(),
        }),
    ))
}

/// Leave an idea's mentor set
pub async fn leave_mentor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());

    if !repo.remove_mentor(user.user.id, idea_id).await? {
        return Err(AppError::NotFound {
            resource_type: "mentorship".to_string(),
            id: idea_id.to_string(),
        });
    }

    tracing::info!(idea_id = %idea_id, user_id = %user.user.id, "Mentor left");

    Ok(StatusCode::NO_CONTENT)
}
