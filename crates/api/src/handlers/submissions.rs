//! Idea submission handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::CurrentUser;
use crate::AppState;
use odrlab_common::{
    db::Repository,
    errors::{AppError, Result},
    metrics,
    moderation::ReviewState,
};

/// New idea submission request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitIdeaRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: String,

    #[validate(length(max = 500))]
    pub idea_caption: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub description: String,

    #[validate(length(max = 5000))]
    pub odr_experience: Option<String>,

    /// The submitter must consent to community review before queueing
    #[serde(default)]
    pub consent: bool,
}

/// Response after queueing a submission
#[derive(Serialize)]
pub struct SubmitIdeaResponse {
    pub submission_id: Uuid,
    pub status: ReviewState,
}

/// One of the caller's own submissions
#[derive(Serialize)]
pub struct MySubmissionResponse {
    pub id: Uuid,
    pub title: String,
    pub caption: Option<String>,
    pub status: ReviewState,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub reviewed_at: Option<String>,
}

/// Queue a new idea for moderation
pub async fn submit_idea(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<SubmitIdeaRequest>,
) -> Result<(StatusCode, Json<SubmitIdeaResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    if !request.consent {
        return Err(AppError::Validation {
            message: "Consent to community review is required".to_string(),
            field: Some("consent".to_string()),
        });
    }

    let repo = Repository::new(state.db.clone());
    let submission = repo
        .create_submission(
            user.user.id,
            request.title,
            request.idea_caption,
            request.description,
            request.odr_experience,
        )
        .await?;

    metrics::record_submission();

    tracing::info!(
        submission_id = %submission.id,
        owner_id = %user.user.id,
        "Idea submitted for review"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitIdeaResponse {
            submission_id: submission.id,
            status: submission.review_state(),
        }),
    ))
}

/// List the caller's submissions with their review outcomes
pub async fn my_submissions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<MySubmissionResponse>>> {
    let repo = Repository::new(state.db.clone());
    let submissions = repo.list_submissions_by_owner(user.user.id).await?;

    Ok(Json(
        submissions
            .into_iter()
            .map(|s| MySubmissionResponse {
                id: s.id,
                title: s.title.clone(),
                caption: s.caption.clone(),
                status: s.review_state(),
                rejection_reason: s.rejection_reason.clone(),
                created_at: s.created_at.to_rfc3339(),
                reviewed_at: s.reviewed_at.map(|t| t.to_rfc3339()),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SubmitIdeaRequest {
        SubmitIdeaRequest {
            title: "Smart mediation queue".to_string(),
            idea_caption: None,
            description: "Route disputes to mediators by topic".to_string(),
            odr_experience: Some("Two years of court annexed ODR".to_string()),
            consent: true,
        }
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut request = valid_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut request = valid_request();
        request.description = String::new();
        assert!(request.validate().is_err());
    }
}
