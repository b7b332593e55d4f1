//! Published idea handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::CurrentUser;
use crate::AppState;
use odrlab_common::{
    db::models::Idea,
    db::{IdeaWithCounts, Repository, UserSummary},
    errors::{AppError, Result},
};

/// Published idea with owner and read-time counts
#[derive(Serialize)]
pub struct IdeaResponse {
    pub id: Uuid,
    pub title: String,
    pub caption: Option<String>,
    pub description: String,
    pub odr_experience: Option<String>,
    pub owner: Option<UserSummary>,
    pub like_count: u64,
    pub comment_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl IdeaResponse {
    /// Shape a bare idea row without refetching counts; used where the
    /// counts are necessarily zero (fresh publication) or not displayed
    pub fn bare(idea: Idea) -> Self {
        Self {
            id: idea.id,
            title: idea.title,
            caption: idea.caption,
            description: idea.description,
            odr_experience: idea.odr_experience,
            owner: None,
            like_count: 0,
            comment_count: 0,
            created_at: idea.created_at.to_rfc3339(),
            updated_at: idea.updated_at.to_rfc3339(),
        }
    }
}

impl From<IdeaWithCounts> for IdeaResponse {
    fn from(row: IdeaWithCounts) -> Self {
        Self {
            id: row.idea.id,
            title: row.idea.title,
            caption: row.idea.caption,
            description: row.idea.description,
            odr_experience: row.idea.odr_experience,
            owner: row.owner.as_ref().map(UserSummary::from),
            like_count: row.like_count,
            comment_count: row.comment_count,
            created_at: row.idea.created_at.to_rfc3339(),
            updated_at: row.idea.updated_at.to_rfc3339(),
        }
    }
}

/// Idea detail with collaboration rosters
#[derive(Serialize)]
pub struct IdeaDetailResponse {
    #[serde(flatten)]
    pub idea: IdeaResponse,
    pub collaborators: Vec<UserSummary>,
    pub mentors: Vec<UserSummary>,
}

/// Idea edit request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateIdeaRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,

    #[validate(length(max = 500))]
    pub caption: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub description: Option<String>,
}

/// Only the owner or an admin may mutate an idea
fn ensure_owner_or_admin(user: &CurrentUser, idea: &Idea) -> Result<()> {
    if idea.owner_id == user.user.id || user.user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden {
            message: "Only the idea owner or an admin may do this".to_string(),
        })
    }
}

/// List approved ideas, newest first
pub async fn list_approved(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<IdeaResponse>>> {
    let repo = Repository::new(state.db.clone());
    let ideas = repo.list_approved_ideas().await?;

    Ok(Json(ideas.into_iter().map(IdeaResponse::from).collect()))
}

/// Get one approved idea with rosters; unapproved ideas are invisible here
pub async fn get_idea(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaDetailResponse>> {
    let repo = Repository::new(state.db.clone());

    let idea = repo
        .get_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    let collaborators = repo
        .list_collaborators(idea_id)
        .await?
        .into_iter()
        .filter_map(|(_, user)| user.as_ref().map(UserSummary::from))
        .collect();

    let mentors = repo
        .list_mentors(idea_id)
        .await?
        .into_iter()
        .filter_map(|(_, user)| user.as_ref().map(UserSummary::from))
        .collect();

    Ok(Json(IdeaDetailResponse {
        idea: IdeaResponse::from(idea),
        collaborators,
        mentors,
    }))
}

/// Edit an idea's content (owner or admin)
pub async fn update_idea(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
    Json(request): Json<UpdateIdeaRequest>,
) -> Result<Json<IdeaResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let idea = repo
        .find_idea_by_id(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    ensure_owner_or_admin(&user, &idea)?;

    let updated = repo
        .update_idea(idea_id, request.title, request.caption, request.description)
        .await?;

    tracing::info!(idea_id = %idea_id, editor_id = %user.user.id, "Idea updated");

    Ok(Json(IdeaResponse::bare(updated)))
}

/// Delete an idea and everything hanging off it (owner or admin)
pub async fn delete_idea(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());
    let idea = repo
        .find_idea_by_id(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    ensure_owner_or_admin(&user, &idea)?;

    repo.delete_idea(idea_id).await?;

    tracing::info!(idea_id = %idea_id, deleter_id = %user.user.id, "Idea deleted");

    Ok(StatusCode::NO_CONTENT)
}
