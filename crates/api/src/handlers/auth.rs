//! Credential and session handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::CurrentUser;
use crate::handlers::ProfileResponse;
use crate::AppState;
use odrlab_common::{
    auth::{hash_password, verify_password},
    db::models::UserRole,
    db::{NewUser, Repository},
    errors::{AppError, Result},
};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Defaults to innovator; admin accounts are provisioned, not self-made
    #[serde(default)]
    pub role: Option<String>,

    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub usage_note: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Session token plus the profile it belongs to
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: ProfileResponse,
}

fn parse_signup_role(role: Option<&str>) -> Result<UserRole> {
    match role {
        None => Ok(UserRole::Innovator),
        Some("admin") => Err(AppError::Validation {
            message: "The admin role cannot be self-assigned".to_string(),
            field: Some("role".to_string()),
        }),
        Some(other) => Ok(UserRole::from(other.to_string())),
    }
}

/// Create an account and open a session
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let role = parse_signup_role(request.role.as_deref())?;
    let password_hash = hash_password(&request.password)?;

    let repo = Repository::new(state.db.clone());
    let user = repo
        .create_user(NewUser {
            name: request.name,
            email: request.email.to_lowercase(),
            password_hash,
            role,
            phone: request.phone,
            city: request.city,
            country: request.country,
            institution: request.institution,
            highest_education: request.highest_education,
            usage_note: request.usage_note,
        })
        .await?;

    let token = state.jwt.issue_session(&user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: ProfileResponse::from(&user),
        }),
    ))
}

/// Verify credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    // A missing account and a wrong password answer identically.
    let user = repo
        .find_user_by_email(&request.email.to_lowercase())
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid email or password".to_string(),
        })?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Unauthorized {
            message: "Invalid email or password".to_string(),
        });
    }

    let token = state.jwt.issue_session(&user)?;

    tracing::info!(user_id = %user.id, "Session opened");

    Ok(Json(AuthResponse {
        token,
        user: ProfileResponse::from(&user),
    }))
}

/// Return the authenticated profile for UI hydration
pub async fn session(user: CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user.user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_role_defaults_to_innovator() {
        assert_eq!(parse_signup_role(None).unwrap(), UserRole::Innovator);
    }

    #[test]
    fn test_signup_role_admin_rejected() {
        let err = parse_signup_role(Some("admin")).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_signup_role_mentor_accepted() {
        assert_eq!(parse_signup_role(Some("mentor")).unwrap(), UserRole::Mentor);
    }

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            role: None,
            phone: None,
            city: None,
            country: None,
            institution: None,
            highest_education: None,
            usage_note: None,
        };
        assert!(request.validate().is_err());
    }
}
