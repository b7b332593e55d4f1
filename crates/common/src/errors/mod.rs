//! Error types for ODR Lab services
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,

    // Authentication errors (2xxx)
    Unauthorized,
    InvalidToken,
    ExpiredToken,

    // Authorization errors (3xxx)
    Forbidden,
    RoleRequired,

    // Resource errors (4xxx)
    NotFound,
    UserNotFound,
    IdeaNotFound,
    SubmissionNotFound,
    CommentNotFound,
    MeetingNotFound,

    // Conflict errors (5xxx)
    Conflict,
    AlreadyReviewed,
    AlreadyCollaborator,
    AlreadyMentor,
    DuplicateEmail,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,
    TransactionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,

            // Auth (2xxx)
            ErrorCode::Unauthorized => 2001,
            ErrorCode::InvalidToken => 2002,
            ErrorCode::ExpiredToken => 2003,

            // Authz (3xxx)
            ErrorCode::Forbidden => 3001,
            ErrorCode::RoleRequired => 3002,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::UserNotFound => 4002,
            ErrorCode::IdeaNotFound => 4003,
            ErrorCode::SubmissionNotFound => 4004,
            ErrorCode::CommentNotFound => 4005,
            ErrorCode::MeetingNotFound => 4006,

            // Conflicts (5xxx)
            ErrorCode::Conflict => 5001,
            ErrorCode::AlreadyReviewed => 5002,
            ErrorCode::AlreadyCollaborator => 5003,
            ErrorCode::AlreadyMentor => 5004,
            ErrorCode::DuplicateEmail => 5005,

            // Database (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,
            ErrorCode::TransactionError => 7003,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    // Authorization errors
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Role '{role}' required")]
    RoleRequired { role: String },

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Idea not found: {id}")]
    IdeaNotFound { id: String },

    #[error("Submission not found: {id}")]
    SubmissionNotFound { id: String },

    #[error("Comment not found: {id}")]
    CommentNotFound { id: String },

    #[error("Meeting not found: {id}")]
    MeetingNotFound { id: String },

    // Conflict errors
    #[error("Submission already reviewed: {id}")]
    AlreadyReviewed { id: String },

    #[error("Already a collaborator on this idea")]
    AlreadyCollaborator,

    #[error("Already a mentor on this idea")]
    AlreadyMentor,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Conflict: {message}")]
    Conflict { message: String },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidToken => ErrorCode::InvalidToken,
            AppError::ExpiredToken => ErrorCode::ExpiredToken,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::RoleRequired { .. } => ErrorCode::RoleRequired,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::UserNotFound { .. } => ErrorCode::UserNotFound,
            AppError::IdeaNotFound { .. } => ErrorCode::IdeaNotFound,
            AppError::SubmissionNotFound { .. } => ErrorCode::SubmissionNotFound,
            AppError::CommentNotFound { .. } => ErrorCode::CommentNotFound,
            AppError::MeetingNotFound { .. } => ErrorCode::MeetingNotFound,
            AppError::AlreadyReviewed { .. } => ErrorCode::AlreadyReviewed,
            AppError::AlreadyCollaborator => ErrorCode::AlreadyCollaborator,
            AppError::AlreadyMentor => ErrorCode::AlreadyMentor,
            AppError::DuplicateEmail => ErrorCode::DuplicateEmail,
            AppError::Conflict { .. } => ErrorCode::Conflict,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } | AppError::MissingField { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. } | AppError::InvalidToken | AppError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            AppError::Forbidden { .. } | AppError::RoleRequired { .. } => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. }
            | AppError::UserNotFound { .. }
            | AppError::IdeaNotFound { .. }
            | AppError::SubmissionNotFound { .. }
            | AppError::CommentNotFound { .. }
            | AppError::MeetingNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::AlreadyReviewed { .. }
            | AppError::AlreadyCollaborator
            | AppError::AlreadyMentor
            | AppError::DuplicateEmail
            | AppError::Conflict { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
///
/// The `error` field is the human-readable message; `code` identifies the
/// failure for client-side handling.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = match &self {
            // Never leak store internals to the client.
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::IdeaNotFound { id: "test".into() };
        assert_eq!(err.code(), ErrorCode::IdeaNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::Validation {
            message: "Invalid title".into(),
            field: Some("title".into()),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_conflict_errors() {
        assert_eq!(
            AppError::AlreadyCollaborator.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::AlreadyReviewed { id: "s1".into() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::DuplicateEmail.code(), ErrorCode::DuplicateEmail);
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(AppError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::RoleRequired {
                role: "mentor".into()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_server_error() {
        let err = AppError::Internal {
            message: "Something went wrong".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_codes_grouped_by_class() {
        assert_eq!(ErrorCode::ValidationError.as_code() / 1000, 1);
        assert_eq!(ErrorCode::ExpiredToken.as_code() / 1000, 2);
        assert_eq!(ErrorCode::RoleRequired.as_code() / 1000, 3);
        assert_eq!(ErrorCode::IdeaNotFound.as_code() / 1000, 4);
        assert_eq!(ErrorCode::AlreadyReviewed.as_code() / 1000, 5);
    }
}
