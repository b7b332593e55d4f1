//! Self-service profile handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::extract::CurrentUser;
use crate::handlers::ProfileResponse;
use crate::AppState;
use odrlab_common::{
    db::{ProfileUpdate, Repository},
    errors::{AppError, Result},
};

/// Profile update request; omitted fields are left untouched.
/// Email and role are immutable through this endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(length(max = 200))]
    pub city: Option<String>,

    #[validate(length(max = 200))]
    pub country: Option<String>,

    #[validate(length(max = 300))]
    pub institution: Option<String>,

    #[validate(length(max = 200))]
    pub highest_education: Option<String>,

    #[validate(length(max = 2000))]
    pub usage_note: Option<String>,
}

/// Get the caller's profile
pub async fn get_me(user: CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user.user))
}

/// Update the caller's profile
pub async fn update_me(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let updated = repo
        .update_user_profile(
            user.user.id,
            ProfileUpdate {
                name: request.name,
                phone: request.phone,
                city: request.city,
                country: request.country,
                institution: request.institution,
                highest_education: request.highest_education,
                usage_note: request.usage_note,
            },
        )
        .await?;

    tracing::info!(user_id = %updated.id, "Profile updated");

    Ok(Json(ProfileResponse::from(&updated)))
}
