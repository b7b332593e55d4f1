//! Meeting handlers
//!
//! Scheduling writes a MeetingLog row; join-token issuance is pure signing
//! over the stored room name.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::CurrentUser;
use crate::AppState;
use odrlab_common::{
    db::Repository,
    errors::{AppError, Result},
    metrics,
    video::room_name_for_idea,
};

/// Scheduled meeting request
#[derive(Debug, Deserialize)]
pub struct ScheduleMeetingRequest {
    /// Provider room name; generated when omitted
    pub room_name: Option<String>,

    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct MeetingResponse {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub room_name: String,
    pub scheduled_by: Uuid,
    pub scheduled_at: Option<String>,
    pub created_at: String,
}

/// Signed join token for the provider's widget
#[derive(Serialize)]
pub struct MeetingTokenResponse {
    pub token: String,
    pub room_name: String,
}

/// Only people attached to the idea may schedule meetings on it
async fn ensure_may_schedule(repo: &Repository, user: &CurrentUser, idea_id: Uuid) -> Result<()> {
    let idea = repo
        .find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    if idea.owner_id == user.user.id || user.user.is_admin() {
        return Ok(());
    }
    if repo.find_collaborator(user.user.id, idea_id).await?.is_some() {
        return Ok(());
    }
    if repo.find_mentor(user.user.id, idea_id).await?.is_some() {
        return Ok(());
    }

    Err(AppError::Forbidden {
        message: "Only the owner, collaborators, or mentors may schedule meetings".to_string(),
    })
}

/// Schedule a meeting for an approved idea
pub async fn schedule_meeting(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(idea_id): Path<Uuid>,
    Json(request): Json<ScheduleMeetingRequest>,
) -> Result<(StatusCode, Json<MeetingResponse>)> {
    let repo = Repository::new(state.db.clone());
    ensure_may_schedule(&repo, &user, idea_id).await?;

    let room_name = match request.room_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => room_name_for_idea(idea_id),
    };

    let meeting = repo
        .create_meeting(idea_id, room_name, user.user.id, request.scheduled_at)
        .await?;

    tracing::info!(
        meeting_id = %meeting.id,
        idea_id = %idea_id,
        scheduled_by = %user.user.id,
        "Meeting scheduled"
    );

    Ok((
        StatusCode::CREATED,
        Json(MeetingResponse {
            id: meeting.id,
            idea_id: meeting.idea_id,
            room_name: meeting.room_name,
            scheduled_by: meeting.scheduled_by,
            scheduled_at: meeting.scheduled_at.map(|t| t.to_rfc3339()),
            created_at: meeting.created_at.to_rfc3339(),
        }),
    ))
}

/// List meetings for an approved idea, newest first
pub async fn list_meetings(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<Vec<MeetingResponse>>> {
    let repo = Repository::new(state.db.clone());

    repo.find_approved_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::IdeaNotFound {
            id: idea_id.to_string(),
        })?;

    let meetings = repo.list_meetings_for_idea(idea_id).await?;

    Ok(Json(
        meetings
            .into_iter()
            .map(|m| MeetingResponse {
                id: m.id,
                idea_id: m.idea_id,
                room_name: m.room_name,
                scheduled_by: m.scheduled_by,
                scheduled_at: m.scheduled_at.map(|t| t.to_rfc3339()),
                created_at: m.created_at.to_rfc3339(),
            })
            .collect(),
    ))
}

/// Issue a signed join token for a meeting's video room
pub async fn jaas_token(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(meeting_id): Path<Uuid>,
) -> Result<Json<MeetingTokenResponse>> {
    let issuer = state.video.as_ref().ok_or_else(|| AppError::Configuration {
        message: "Video provider is not configured".to_string(),
    })?;

    let repo = Repository::new(state.db.clone());
    let meeting = repo
        .find_meeting_by_id(meeting_id)
        .await?
        .ok_or_else(|| AppError::MeetingNotFound {
            id: meeting_id.to_string(),
        })?;

    let token = issuer.issue(&meeting.room_name, &user.user)?;

    metrics::record_meeting_token();

    tracing::info!(
        meeting_id = %meeting_id,
        user_id = %user.user.id,
        "Meeting join token issued"
    );

    Ok(Json(MeetingTokenResponse {
        token,
        room_name: meeting.room_name,
    }))
}
