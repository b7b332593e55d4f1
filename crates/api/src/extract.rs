//! Request extractors
//!
//! The authentication guard lives here: every protected handler receives a
//! `CurrentUser` produced by this extractor and nothing else. The guard
//! validates the bearer token, then hydrates the live user row so handlers
//! act on the current role rather than the one frozen into the token.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use odrlab_common::{
    auth::{extract_bearer, SessionClaims},
    db::models::{User, UserRole},
    db::Repository,
    errors::{AppError, Result},
};

use crate::AppState;

/// The authenticated caller attached to a request
#[derive(Debug)]
pub struct CurrentUser {
    /// Live user record from the store
    pub user: User,

    /// Raw decoded token claims; handlers should prefer `user`
    pub claims: SessionClaims,
}

impl CurrentUser {
    /// Require the admin role
    pub fn require_admin(&self) -> Result<()> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: "Admin role required".to_string(),
            })
        }
    }

    /// Require a specific role; admin satisfies any role requirement
    pub fn require_role(&self, role: UserRole) -> Result<()> {
        if self.user.user_role() == role || self.user.is_admin() {
            Ok(())
        } else {
            Err(AppError::RoleRequired {
                role: String::from(role),
            })
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authentication required".to_string(),
            })?;

        let token = extract_bearer(auth_header).ok_or_else(|| AppError::Unauthorized {
            message: "Authentication required".to_string(),
        })?;

        let claims = state.jwt.validate_token(token)?;
        let user_id = claims.user_id()?;

        // A stale token may outlive its account.
        let repo = Repository::new(state.db.clone());
        let user = repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound {
                id: claims.sub.clone(),
            })?;

        Ok(CurrentUser { user, claims })
    }
}
